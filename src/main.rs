use anyhow::{Context, Result};
use clap::Parser;
use rulefilter::corpus::{clean_sentences, guess_format, open_reader, read_tokenized};
use rulefilter::{
    Corpus, DEFAULT_MAX_NGRAM, FilterConfig, InputFormat, Matcher, OccurrenceIndex, RuleFilter,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Filter a rule table (on stdin) down to the rules that could be used in
/// parsing INPUT, and write the result to stdout.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Prune non-initial rules where count is below N
    #[arg(
        short = 'c',
        long = "min-non-initial-rule-count",
        value_name = "N",
        default_value_t = 0.0
    )]
    min_count: f64,

    /// Format of input file: word, penn, egret or guess
    #[arg(short, long, default_value = "guess")]
    format: InputFormat,

    /// Longest n-gram to index
    #[arg(
        short = 'n',
        long,
        value_name = "N",
        default_value_t = DEFAULT_MAX_NGRAM,
        value_parser = parse_order
    )]
    max_ngram: usize,

    /// Read the rule table from this file (plain or .gz) instead of stdin
    #[arg(short = 't', long)]
    rule_table: Option<PathBuf>,

    /// Write the filtered table to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report progress and statistics on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Input text for filtering
    src: PathBuf,
}

fn parse_order(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("n-gram order must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load and clean the input text
    let reader = open_reader(&args.src)
        .with_context(|| format!("failed to open input text {}", args.src.display()))?;
    let lines = read_tokenized(reader)
        .with_context(|| format!("failed to read input text {}", args.src.display()))?;
    let format = match args.format {
        InputFormat::Guess => guess_format(&lines),
        format => format,
    };
    let corpus = Corpus::from_sentences(clean_sentences(lines, format));
    if args.verbose {
        eprintln!(
            "Read {} sentences ({} tokens, {} distinct words) as {}",
            corpus.len(),
            corpus.token_count(),
            corpus.vocab_size(),
            format
        );
    }

    let index = OccurrenceIndex::build(corpus.sentences(), args.max_ngram);
    if args.verbose {
        eprintln!("Indexed {} distinct n-grams up to n = {}", index.len(), index.max_n());
    }

    let config = FilterConfig {
        min_non_initial_count: args.min_count,
    };
    let mut filter = RuleFilter::new(Matcher::new(&corpus, &index), config);

    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let stats = match &args.rule_table {
        Some(path) => {
            let reader = open_reader(path)
                .with_context(|| format!("failed to open rule table {}", path.display()))?;
            filter.filter(reader, output)
        }
        None => filter.filter(io::stdin().lock(), output),
    }
    .context("failed to filter rule table")?;

    if args.verbose {
        eprintln!("Filtered {}", stats);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order() {
        assert_eq!(parse_order("3"), Ok(3));
        assert!(parse_order("0").is_err());
        assert!(parse_order("x").is_err());
        assert!(parse_order("-1").is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["filter-rule-table", "input.txt"]).unwrap();
        assert_eq!(args.format, InputFormat::Guess);
        assert_eq!(args.max_ngram, DEFAULT_MAX_NGRAM);
        assert_eq!(args.min_count, 0.0);
        assert_eq!(args.rule_table, None);
        assert!(!args.verbose);
        assert_eq!(args.src, PathBuf::from("input.txt"));
    }

    #[test]
    fn test_args_flags() {
        let args = Args::try_parse_from([
            "filter-rule-table",
            "-f",
            "penn",
            "-n",
            "4",
            "--min-non-initial-rule-count",
            "2.5",
            "-t",
            "rules.gz",
            "input.tree",
        ])
        .unwrap();
        assert_eq!(args.format, InputFormat::Penn);
        assert_eq!(args.max_ngram, 4);
        assert_eq!(args.min_count, 2.5);
        assert_eq!(args.rule_table, Some(PathBuf::from("rules.gz")));
    }

    #[test]
    fn test_args_rejected() {
        assert!(Args::try_parse_from(["filter-rule-table", "-f", "conll", "input.txt"]).is_err());
        assert!(Args::try_parse_from(["filter-rule-table", "-n", "0", "input.txt"]).is_err());
        assert!(Args::try_parse_from(["filter-rule-table"]).is_err());
    }
}
