//! Incremental byte pair encoding (BPE) vocabulary training library and CLI.
//!
//! The crate exposes both a library API and an `ibpe` command line interface
//! for training BPE vocabularies over raw byte corpora.  Each selected merge
//! rule is committed to a binary vocabulary file before the next pass begins,
//! so a run's progress can be inspected with `ibpe status` (or
//! [`status::read_snapshot`]) while training is still underway.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ibpe::{Trainer, TrainerConfig};
//!
//! # fn main() -> ibpe::Result<()> {
//! let cfg = TrainerConfig::new(1024);
//! let trainer = Trainer::new(cfg);
//! let artifacts = trainer.train(Path::new("corpus.vocab"), &["corpus/a.bin", "corpus/b.bin"])?;
//! println!("committed {} merge rules", artifacts.rules.len());
//! # Ok(())
//! # }
//! ```
//!
//! The CLI is enabled by default through the `cli` feature.  Users targeting
//! the library portion only can disable default features to avoid the CLI
//! dependencies: `ibpe = { version = "...", default-features = false }`.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    clippy::all,
    rust_2018_idioms,
    future_incompatible,
    unused_lifetimes,
    unreachable_pub
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::doc_markdown
)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod metrics;
pub mod pairs;
pub mod status;
pub mod stream;
pub mod trainer;
pub mod vocab;

pub use config::TrainerConfig;
pub use error::{IbpeError, Result};
pub use metrics::{PassMetrics, StopReason, TrainingMetrics};
pub use status::VocabSnapshot;
pub use stream::TokenStream;
pub use trainer::{Trainer, TrainerArtifacts};
pub use vocab::{MergeRule, Pair, TokenId, VocabWriter};
