use serde::{Serialize, Deserialize};

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`         — total number of full passes over the training data
/// - `batch_size`     — samples per mini-batch; use `1` for online SGD
/// - `progress_every` — print one dot per this many batches; `0` disables
///                      the dots entirely (useful in tests)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub progress_every: usize,
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize, progress_every: usize) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            progress_every,
        }
    }
}
