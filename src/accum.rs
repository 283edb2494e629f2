use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use log::warn;

use crate::lexer::Lex;
use crate::prepare::Preprocessor;
use crate::TokenStream;

#[cfg(test)]
mod test;

/// Runs one lexer over prepared sources and keeps its per-file timings,
/// keyed by the original (unprepared) source path. Every attempted
/// invocation leaves exactly one timing entry, failed ones included.
pub struct Accumulator<L> {
    lexer: L,
    preprocessor: Preprocessor,
    timings: HashMap<PathBuf, f64>,
}

impl<L: Lex> Accumulator<L> {
    pub fn new(lexer: L, preprocessor: Preprocessor) -> Self {
        Accumulator {
            lexer,
            preprocessor,
            timings: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        self.lexer.id()
    }

    pub fn run(&mut self, source: &Path) -> Result<TokenStream> {
        let prepared = self.preprocessor.prepare(source)?;
        let start = Instant::now();
        let stream = match self.lexer.lex(prepared.path()) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("{}", e);
                Vec::new()
            }
        };
        self.timings
            .insert(source.to_path_buf(), start.elapsed().as_secs_f64());
        Ok(stream)
    }

    /// Panics if `source` was never run.
    pub fn timing(&self, source: &Path) -> f64 {
        self.timings[source]
    }
}
