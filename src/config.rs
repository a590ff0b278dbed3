//! Configuration controlling vocabulary training runs.

use serde::{Deserialize, Serialize};

use crate::error::{IbpeError, Result};
use crate::vocab::BASE_VOCAB;

/// Configuration for a BPE vocabulary training run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainerConfig {
    /// Target vocabulary size including the 256 base byte tokens.
    pub target_vocab_size: u16,
    /// Enables per-file and per-pass logging through the `log` facade.
    pub show_progress: bool,
}

impl TrainerConfig {
    /// Creates a configuration for the given target vocabulary size.
    #[must_use]
    pub fn new(target_vocab_size: u16) -> Self {
        Self {
            target_vocab_size,
            ..Self::default()
        }
    }

    /// Validates the invariants required for training.
    ///
    /// The target must exceed the byte alphabet; every representable token id
    /// (raw byte or assigned replacement) then stays strictly below it, which
    /// also bounds the pair table.
    pub fn validate(&self) -> Result<()> {
        if self.target_vocab_size <= BASE_VOCAB {
            return Err(IbpeError::InvalidConfig(format!(
                "target_vocab_size ({}) must exceed the {BASE_VOCAB}-entry byte alphabet",
                self.target_vocab_size
            )));
        }
        Ok(())
    }

    /// Maximum number of merge rules the run may commit.
    #[must_use]
    pub fn max_rules(&self) -> u16 {
        self.target_vocab_size.saturating_sub(BASE_VOCAB)
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            target_vocab_size: 1024,
            show_progress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_vocab_at_or_below_byte_alphabet() {
        for size in [0, 255, 256] {
            let cfg = TrainerConfig::new(size);
            let err = cfg.validate().expect_err("validation should fail");
            assert!(matches!(err, IbpeError::InvalidConfig(_)));
        }
    }

    #[test]
    fn validate_accepts_smallest_useful_vocab() {
        let cfg = TrainerConfig::new(257);
        cfg.validate().expect("257 leaves room for one merge");
        assert_eq!(cfg.max_rules(), 1);
    }

    #[test]
    fn max_rules_spans_the_merge_range() {
        assert_eq!(TrainerConfig::new(258).max_rules(), 2);
        assert_eq!(TrainerConfig::new(u16::MAX).max_rules(), u16::MAX - 256);
    }
}
