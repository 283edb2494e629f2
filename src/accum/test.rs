use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::Accumulator;
use crate::lexer::{InvokeError, Lex};
use crate::prepare::Preprocessor;
use crate::TokenStream;

struct Fixed {
    id: &'static str,
    tokens: Option<Vec<&'static str>>,
}

impl Lex for Fixed {
    fn id(&self) -> &str {
        self.id
    }

    fn lex(&self, _prepared: &Path) -> Result<TokenStream, InvokeError> {
        match &self.tokens {
            Some(tokens) => {
                Ok(tokens.iter().map(|t| t.to_string()).collect())
            }
            None => Err(InvokeError::Spawn {
                id: self.id.to_string(),
                source: io::Error::other("refused"),
            }),
        }
    }
}

fn source(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, "x\n").unwrap();
    path
}

#[test]
fn run_returns_the_stream_and_records_a_timing() {
    let dir = TempDir::new().unwrap();
    let src = source(&dir, "a.c");
    let mut accum = Accumulator::new(
        Fixed {
            id: "fixed",
            tokens: Some(vec!["INT", "PLUS"]),
        },
        Preprocessor::PassThrough,
    );
    let stream = accum.run(&src).unwrap();
    assert_eq!(stream, ["INT", "PLUS"]);
    assert!(accum.timing(&src) >= 0.0);
}

#[test]
fn failure_substitutes_an_empty_stream() {
    let dir = TempDir::new().unwrap();
    let src = source(&dir, "a.c");
    let mut accum = Accumulator::new(
        Fixed {
            id: "broken",
            tokens: None,
        },
        Preprocessor::PassThrough,
    );
    let stream = accum.run(&src).unwrap();
    assert!(stream.is_empty());
    // The failed attempt still leaves its timing entry.
    assert!(accum.timing(&src) >= 0.0);
}

#[test]
fn timings_are_keyed_by_the_original_source_path() {
    let dir = TempDir::new().unwrap();
    let src = source(&dir, "a.c");
    let mut accum = Accumulator::new(
        Fixed {
            id: "fixed",
            tokens: Some(vec!["TOKEN"]),
        },
        Preprocessor::Normalize,
    );
    accum.run(&src).unwrap();
    // Normalize hands the lexer a temp path; the record uses the source.
    assert!(accum.timing(&src) >= 0.0);
}

#[test]
fn one_entry_per_source() {
    let dir = TempDir::new().unwrap();
    let a = source(&dir, "a.c");
    let b = source(&dir, "b.c");
    let mut accum = Accumulator::new(
        Fixed {
            id: "fixed",
            tokens: Some(vec!["TOKEN"]),
        },
        Preprocessor::PassThrough,
    );
    accum.run(&a).unwrap();
    accum.run(&b).unwrap();
    assert!(accum.timing(&a) >= 0.0);
    assert!(accum.timing(&b) >= 0.0);
}
