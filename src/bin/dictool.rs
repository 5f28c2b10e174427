use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use lexbreak::engine::{cjk, sea};
use lexbreak::{BreakEngine, BreakKind, DictionaryMatcher, ValueTransform};

#[derive(Parser)]
#[command(name = "dictool", about = "Compile and inspect lexbreak dictionaries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a word list into a dictionary blob
    Compile {
        /// Input word list: one `word<TAB>weight` per line, weight optional
        input: PathBuf,
        /// Output dictionary file
        output: PathBuf,
        /// Offset-transform base (e.g. 0x0E00 for Thai); omit for a
        /// char-keyed dictionary
        #[arg(long, value_parser = parse_u32)]
        offset: Option<u32>,
        /// Weight for words that do not carry one
        #[arg(long, default_value = "100")]
        default_weight: i32,
    },
    /// Print header and trie statistics for a dictionary file
    Info {
        dict_file: PathBuf,
    },
    /// Segment text with a script engine and print break offsets
    Segment {
        dict_file: PathBuf,
        #[arg(long, value_enum)]
        script: ScriptChoice,
        text: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScriptChoice {
    Thai,
    Lao,
    Khmer,
    Burmese,
    Cjk,
}

fn parse_u32(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Command::Compile {
            input,
            output,
            offset,
            default_weight,
        } => compile(&input, &output, offset, default_weight),
        Command::Info { dict_file } => info(&dict_file),
        Command::Segment {
            dict_file,
            script,
            text,
        } => segment(&dict_file, script, &text),
    }
}

fn die(msg: String) -> ! {
    eprintln!("{msg}");
    process::exit(1);
}

fn compile(input: &PathBuf, output: &PathBuf, offset: Option<u32>, default_weight: i32) {
    let transform = match offset {
        Some(base) => ValueTransform::Offset(base),
        None => ValueTransform::Identity,
    };
    let contents =
        fs::read_to_string(input).unwrap_or_else(|e| die(format!("cannot read word list: {e}")));

    let mut words: Vec<(&str, i32)> = Vec::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let word = parts.next().unwrap_or_default();
        let weight = match parts.next() {
            Some(w) => w
                .parse()
                .unwrap_or_else(|e| die(format!("line {}: bad weight: {e}", lineno + 1))),
            None => default_weight,
        };
        words.push((word, weight));
    }

    let matcher = DictionaryMatcher::from_words(words.iter().copied(), transform)
        .unwrap_or_else(|e| die(format!("compile failed: {e}")));
    matcher
        .save(output)
        .unwrap_or_else(|e| die(format!("cannot write {}: {e}", output.display())));
    println!(
        "{} words -> {} ({} trie nodes)",
        words.len(),
        output.display(),
        matcher.trie().node_count()
    );
}

fn info(dict_file: &PathBuf) {
    let matcher = DictionaryMatcher::open(dict_file)
        .unwrap_or_else(|e| die(format!("cannot open dictionary: {e}")));
    println!("kind:      {:?}", matcher.trie_kind());
    println!("transform: {:?}", matcher.transform());
    println!("nodes:     {}", matcher.trie().node_count());
    println!("edges:     {}", matcher.trie().edge_count());
}

fn segment(dict_file: &PathBuf, script: ScriptChoice, text: &str) {
    let matcher = DictionaryMatcher::open(dict_file)
        .unwrap_or_else(|e| die(format!("cannot open dictionary: {e}")));
    let engine = match script {
        ScriptChoice::Thai => sea::thai(matcher),
        ScriptChoice::Lao => sea::lao(matcher),
        ScriptChoice::Khmer => sea::khmer(matcher),
        ScriptChoice::Burmese => sea::burmese(matcher),
        ScriptChoice::Cjk => cjk::cjk(matcher),
    };

    let mut breaks = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let c = match lexbreak::cursor::current(text, pos) {
            Some(c) => c,
            None => break,
        };
        if engine.handles(c, BreakKind::Word) {
            let out = engine.find_breaks(text, 0, text.len(), pos, false, BreakKind::Word, &mut breaks);
            pos = out.pos.max(lexbreak::cursor::next(text, pos));
        } else {
            pos = lexbreak::cursor::next(text, pos);
        }
    }

    println!("breaks: {breaks:?}");
    let mut last = 0;
    for &b in breaks.iter().chain(std::iter::once(&text.len())) {
        if b > last {
            println!("  {last:>5}..{b:<5} {:?}", &text[last..b]);
        }
        last = b;
    }
}
