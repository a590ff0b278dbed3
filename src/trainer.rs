//! Core training loop: repeated count/select/commit passes over the corpus.

use std::path::Path;
use std::time::Instant;

use log::info;

use crate::config::TrainerConfig;
use crate::corpus::read_input;
use crate::error::Result;
use crate::metrics::{PassMetrics, StopReason, TrainingMetrics};
use crate::pairs::PairCounter;
use crate::stream::TokenStream;
use crate::vocab::{MergeRule, VocabWriter, BASE_VOCAB};

/// High-level façade configuring and executing a training run.
#[derive(Debug, Clone)]
pub struct Trainer {
    cfg: TrainerConfig,
}

/// Artifacts returned after a training run completes.
///
/// The committed rules are also on disk at this point; they are returned so
/// library callers can consume the vocabulary without re-reading the file.
#[must_use]
#[derive(Debug, Clone)]
pub struct TrainerArtifacts {
    /// Committed merge rules in commit order.
    pub rules: Vec<MergeRule>,
    /// Metrics captured during the run.
    pub metrics: TrainingMetrics,
}

impl Trainer {
    /// Creates a new trainer for the supplied configuration.
    #[must_use]
    pub fn new(cfg: TrainerConfig) -> Self {
        Self { cfg }
    }

    /// Returns an immutable reference to the underlying configuration.
    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.cfg
    }

    /// Runs the full training loop, committing each selected rule to
    /// `vocab_path` before the next pass begins.
    ///
    /// Every pass reloads every input file from raw bytes and re-applies the
    /// entire committed rule set before counting; nothing is cached across
    /// passes.  Missing input files are skipped with a warning and the run
    /// proceeds on the remainder.  The run stops once `target_vocab_size`
    /// is reached or no repeating pair remains, whichever comes first.
    pub fn train<P: AsRef<Path>>(&self, vocab_path: &Path, inputs: &[P]) -> Result<TrainerArtifacts> {
        self.cfg.validate()?;
        let max_rules = usize::from(self.cfg.max_rules());
        let mut counter = PairCounter::new();
        let mut writer = VocabWriter::create(vocab_path, self.cfg.target_vocab_size)?;
        let mut metrics = TrainingMetrics::new(max_rules);
        let training_start = Instant::now();

        for pass in 1..=max_rules {
            let pass_start = Instant::now();
            for input in inputs {
                let path = input.as_ref();
                let Some(bytes) = read_input(path)? else {
                    continue;
                };
                if self.cfg.show_progress {
                    info!("pass {pass}: counting pairs in {}", path.display());
                }
                let mut stream = TokenStream::from_bytes(&bytes);
                stream.apply(writer.rules());
                counter.accumulate(&stream);
            }

            let Some((pair, frequency)) = counter.best_pair() else {
                metrics.stop_reason = StopReason::Exhausted;
                info!(
                    "early stopping: no repeating pair left; vocabulary size {}",
                    usize::from(BASE_VOCAB) + usize::from(writer.len())
                );
                break;
            };
            let distinct_pairs = counter.distinct_pairs();

            let rule = writer.commit(pair)?;
            counter.clear();

            if self.cfg.show_progress {
                info!(
                    "pass {pass:>5}: merged ({}, {}) -> {} freq {frequency:>8} distinct_pairs {distinct_pairs:>8}",
                    rule.b1, rule.b2, rule.rep
                );
            }
            metrics.passes.push(PassMetrics {
                pass,
                best_frequency: frequency,
                distinct_pairs,
                elapsed: pass_start.elapsed(),
            });
        }

        metrics.total_duration = training_start.elapsed();
        let rules = writer.rules().to_vec();
        writer.finalize()?;

        if self.cfg.show_progress {
            info!(
                "committed {} rules in {:.2?}; vocabulary size {}",
                rules.len(),
                metrics.total_duration,
                usize::from(BASE_VOCAB) + rules.len()
            );
        }
        Ok(TrainerArtifacts { rules, metrics })
    }
}
