use std::fs;
use std::iter;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::{info, warn};

use crate::accum::Accumulator;
use crate::diff;
use crate::lexer::Lex;
use crate::prepare::Preprocessor;
use crate::report::{Cell, Report};
use crate::Stdout;


#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DivergencePolicy {
    /// Print the diff and keep going; partial results are still a result.
    Lenient,
    /// Fail the run on the first candidate divergence.
    Strict,
}

/// Drives the corpus through the baseline and every candidate, validating
/// each candidate stream against the baseline's as it is produced.
pub struct Harness<L> {
    baseline: Accumulator<L>,
    candidates: Vec<Accumulator<L>>,
    policy: DivergencePolicy,
    stdout: Stdout,
}

impl<L: Lex> Harness<L> {
    pub fn new(
        baseline: L,
        candidates: Vec<L>,
        preprocessor: Preprocessor,
        policy: DivergencePolicy,
        stdout: Stdout,
    ) -> Self {
        Harness {
            baseline: Accumulator::new(baseline, preprocessor),
            candidates: candidates
                .into_iter()
                .map(|lexer| Accumulator::new(lexer, preprocessor))
                .collect(),
            policy,
            stdout,
        }
    }

    pub fn run(&mut self, corpus: &[PathBuf]) -> Result<Report> {
        for source in corpus {
            info!("lexing {}", source.display());
            let base = self.baseline.run(source)?;
            for candidate in &mut self.candidates {
                let stream = candidate.run(source)?;
                let matched = {
                    let mut out = self.stdout.borrow_mut();
                    diff::compare(
                        &base,
                        &stream,
                        self.baseline.id(),
                        candidate.id(),
                        &mut *out,
                    )?
                };
                if !matched {
                    warn!(
                        "{} diverges from {} on {}",
                        candidate.id(),
                        self.baseline.id(),
                        source.display()
                    );
                    if self.policy == DivergencePolicy::Strict {
                        bail!(
                            "{} diverged from {} on {}",
                            candidate.id(),
                            self.baseline.id(),
                            source.display()
                        );
                    }
                }
            }
        }
        self.build_report(corpus)
    }

    fn build_report(&self, corpus: &[PathBuf]) -> Result<Report> {
        let lexers: Vec<&Accumulator<L>> =
            iter::once(&self.baseline).chain(&self.candidates).collect();

        let mut header = vec!["source".to_string(), "size".to_string()];
        header.extend(lexers.iter().map(|l| l.id().to_string()));
        let mut report = Report::new(header);

        let mut totals = vec![0.0; lexers.len()];
        for source in corpus {
            let size = fs::metadata(source)
                .with_context(|| format!("cannot stat {}", source.display()))?
                .len();
            let mut row = vec![
                Cell::Text(source.display().to_string()),
                Cell::Bytes(size),
            ];
            for (idx, lexer) in lexers.iter().enumerate() {
                let seconds = lexer.timing(source);
                totals[idx] += seconds;
                row.push(Cell::Seconds(seconds));
            }
            report.push_row(row);
        }

        let mut row =
            vec![Cell::Text("all".to_string()), Cell::Text("+++".to_string())];
        row.extend(totals.into_iter().map(Cell::Seconds));
        report.push_row(row);
        Ok(report)
    }
}
