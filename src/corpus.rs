//! Input corpus loading
//!
//! Reads the sentences a rule table is filtered against: one sentence per
//! line, whitespace-tokenized. Plain and gzip-compressed files are both
//! accepted. Parser output in Penn bracketed or Egret format can be reduced
//! to its words before indexing.

use bstr::ByteSlice;
use flate2::read::MultiGzDecoder;
use lasso::{Rodeo, Spur};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// A sentence as a sequence of interned words
pub type Sentence = Vec<Spur>;

/// Error while loading a corpus
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Corpus error: {0}")]
    Io(#[from] io::Error),

    #[error("Corpus error: unknown input format: {0} (expected word, penn, egret or guess)")]
    UnknownFormat(String),
}

/// Layout of the input corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Plain tokenized words
    Word,
    /// Penn Treebank bracketed trees, one per line
    Penn,
    /// Egret parser output: a `sentence N :` header before each tree
    Egret,
    /// Pick one of the above from the first line
    #[default]
    Guess,
}

impl FromStr for InputFormat {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "word" => Ok(Self::Word),
            "penn" => Ok(Self::Penn),
            "egret" => Ok(Self::Egret),
            "guess" => Ok(Self::Guess),
            other => Err(CorpusError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Word => "word",
            Self::Penn => "penn",
            Self::Egret => "egret",
            Self::Guess => "guess",
        };
        f.write_str(name)
    }
}

/// Open a file for line reading, decompressing it if the name ends in `.gz`
pub fn open_reader(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read whitespace-tokenized lines
///
/// Bytes that are not valid UTF-8 are replaced, so tokens compare the same
/// way rule-table terminals do.
pub fn read_tokenized<R: BufRead>(mut reader: R) -> io::Result<Vec<Vec<String>>> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let tokens: Vec<String> = buf
            .fields()
            .map(|field| field.to_str_lossy().into_owned())
            .collect();
        lines.push(tokens);
    }
    Ok(lines)
}

/// Decide the format of a corpus from its first line
///
/// Falls back to `Word` whenever the Egret and Penn heuristics fail,
/// including for an empty corpus or an empty first line.
pub fn guess_format(lines: &[Vec<String>]) -> InputFormat {
    let Some(first) = lines.first() else {
        return InputFormat::Word;
    };
    if first.len() == 3 && first[0] == "sentence" && first[1] == "1" && first[2] == ":" {
        InputFormat::Egret
    } else if first.first().is_some_and(|token| token.starts_with('(')) {
        InputFormat::Penn
    } else {
        InputFormat::Word
    }
}

/// Reduce tokenized lines to plain word sentences
///
/// `Guess` is resolved with [`guess_format`] first.
pub fn clean_sentences(lines: Vec<Vec<String>>, format: InputFormat) -> Vec<Vec<String>> {
    match format {
        InputFormat::Guess => {
            let format = guess_format(&lines);
            clean_sentences(lines, format)
        }
        InputFormat::Word => lines,
        InputFormat::Penn => lines
            .into_iter()
            .map(|line| {
                line.into_iter()
                    .filter(|token| token.ends_with(')'))
                    .map(|token| token.trim_end_matches(')').to_string())
                    .collect::<Vec<_>>()
            })
            .filter(|sentence| !sentence.is_empty())
            .collect(),
        // Every header keeps the line after it, even when that line is
        // itself a header; a header on the last line keeps nothing
        InputFormat::Egret => lines
            .iter()
            .enumerate()
            .filter(|(_, line)| is_egret_header(line))
            .filter_map(|(i, _)| lines.get(i + 1).cloned())
            .collect(),
    }
}

fn is_egret_header(line: &[String]) -> bool {
    line.len() == 3 && line[0] == "sentence" && line[2] == ":"
}

/// The input sentences together with their vocabulary
#[derive(Debug, Default)]
pub struct Corpus {
    vocab: Rodeo,
    sentences: Vec<Sentence>,
}

impl Corpus {
    /// Create an empty corpus
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from already tokenized sentences
    pub fn from_sentences<I, S, W>(sentences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let mut corpus = Self::new();
        for sentence in sentences {
            corpus.push_sentence(sentence);
        }
        corpus
    }

    /// Read and clean a corpus from any line source
    pub fn from_reader<R: BufRead>(reader: R, format: InputFormat) -> Result<Self, CorpusError> {
        let lines = read_tokenized(reader)?;
        Ok(Self::from_sentences(clean_sentences(lines, format)))
    }

    /// Read and clean a corpus from a plain or gzipped file
    pub fn from_file(path: &Path, format: InputFormat) -> Result<Self, CorpusError> {
        Self::from_reader(open_reader(path)?, format)
    }

    /// Append a sentence, interning its words
    pub fn push_sentence<S, W>(&mut self, words: S) -> usize
    where
        S: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let sentence = words
            .into_iter()
            .map(|word| self.vocab.get_or_intern(word.as_ref()))
            .collect();
        self.sentences.push(sentence);
        self.sentences.len() - 1
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn sentence(&self, id: usize) -> Option<&Sentence> {
        self.sentences.get(id)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Number of distinct words
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Total number of tokens over all sentences
    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(Vec::len).sum()
    }

    /// Look up the key of a word, if it occurs anywhere in the corpus
    pub fn word_key(&self, word: &str) -> Option<Spur> {
        self.vocab.get(word)
    }

    /// Look up the keys of a word sequence
    ///
    /// Returns `None` as soon as one word is missing from the vocabulary:
    /// such a sequence cannot occur in any sentence.
    pub fn lookup<W: AsRef<str>>(&self, words: &[W]) -> Option<Vec<Spur>> {
        words.iter().map(|word| self.word_key(word.as_ref())).collect()
    }

    pub fn resolve(&self, key: Spur) -> &str {
        self.vocab.resolve(&key)
    }
}
