use serde::{Serialize, Deserialize};

/// Per-epoch training statistics collected by `train_loop`.
///
/// One value is recorded per completed epoch; the binary prints them as the
/// final per-epoch summary table after training ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean per-element squared error over all batches in this epoch.
    pub mean_loss: f64,
    /// Samples whose predicted argmax matched the target argmax.
    pub correct: usize,
    /// Samples where the argmax comparison failed.
    pub incorrect: usize,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

impl EpochStats {
    /// Running training accuracy as a percentage.
    pub fn accuracy(&self) -> f64 {
        let total = self.correct + self.incorrect;
        if total == 0 {
            return 0.0;
        }
        self.correct as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_is_correct_fraction() {
        let stats = EpochStats {
            epoch: 1,
            total_epochs: 10,
            mean_loss: 0.1,
            correct: 75,
            incorrect: 25,
            elapsed_ms: 0,
        };
        assert_eq!(stats.accuracy(), 75.0);
    }

    #[test]
    fn accuracy_of_empty_epoch_is_zero() {
        let stats = EpochStats {
            epoch: 1,
            total_epochs: 1,
            mean_loss: 0.0,
            correct: 0,
            incorrect: 0,
            elapsed_ms: 0,
        };
        assert_eq!(stats.accuracy(), 0.0);
    }
}
