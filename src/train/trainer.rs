use std::io::{self, Write};
use std::time::Instant;

use rand::seq::SliceRandom;

use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Batch losses at or above this value abort the whole run. Sigmoid outputs
/// against one-hot targets keep the per-element mean squared error below 1,
/// so reaching the limit (or producing a non-finite loss) means the weights
/// have blown up.
pub const DIVERGENCE_LIMIT: f64 = 1.0;

/// How a training run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainOutcome {
    /// All requested epochs ran to completion.
    Completed,
    /// The divergence guard tripped; training stopped mid-epoch.
    Diverged {
        epoch: usize,
        batch: usize,
        loss: f64,
    },
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs of shuffled mini-batch
/// gradient descent and returns the per-epoch statistics together with the
/// run outcome.
///
/// # Arguments
/// - `network`   — mutable reference to the network; modified in place
/// - `inputs`    — training samples, one per **column** (`input_size` × N)
/// - `targets`   — one-hot targets, one per column (`output_size` × N)
/// - `optimizer` — SGD optimizer (carries the learning rate)
/// - `config`    — epoch count, batch size, progress-dot interval
///
/// Each epoch visits every sample exactly once in a freshly shuffled order.
/// Progress is printed directly to stdout: one dot per `progress_every`
/// batches inside an epoch, one summary line per completed epoch with the
/// running loss and argmax accuracy.
///
/// # Early termination
/// If any batch loss is non-finite or reaches `DIVERGENCE_LIMIT`, training
/// stops immediately and the partial statistics are returned with
/// `TrainOutcome::Diverged`.
///
/// # Panics
/// Panics if `inputs` is empty, the input/target column counts differ, or
/// `batch_size == 0`.
pub fn train_loop(
    network: &mut Network,
    inputs: &Matrix,
    targets: &Matrix,
    optimizer: &Sgd,
    config: &TrainConfig,
) -> (Vec<EpochStats>, TrainOutcome) {
    assert!(inputs.cols > 0, "inputs must not be empty");
    assert_eq!(
        inputs.cols, targets.cols,
        "inputs and targets must have equal sample counts"
    );
    assert!(config.batch_size > 0, "batch_size must be at least 1");

    let mut all_stats = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        if config.progress_every > 0 {
            print!("{:>5}  [", epoch);
            flush_stdout();
        }

        let (stats, diverged) = run_one_epoch(
            network,
            inputs,
            targets,
            optimizer,
            config,
            epoch,
            t_start,
        );

        if config.progress_every > 0 {
            println!(
                "]  loss {:>9.6}  acc {:>6.2}%  ({} correct, {} incorrect)",
                stats.mean_loss,
                stats.accuracy(),
                stats.correct,
                stats.incorrect
            );
        }

        if let Some(outcome) = diverged {
            all_stats.push(stats);
            return (all_stats, outcome);
        }
        all_stats.push(stats);
    }

    (all_stats, TrainOutcome::Completed)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Runs one full epoch of mini-batch gradient descent. Returns the epoch
/// statistics and, if the divergence guard tripped, the outcome to report.
fn run_one_epoch(
    network: &mut Network,
    inputs: &Matrix,
    targets: &Matrix,
    optimizer: &Sgd,
    config: &TrainConfig,
    epoch: usize,
    t_start: Instant,
) -> (EpochStats, Option<TrainOutcome>) {
    let n = inputs.cols;

    // Fresh full permutation each epoch.
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rand::thread_rng());

    let mut total_loss = 0.0;
    let mut batches = 0usize;
    let mut correct = 0usize;
    let mut incorrect = 0usize;

    for batch_indices in indices.chunks(config.batch_size) {
        let batch = inputs.columns(batch_indices);
        let batch_targets = targets.columns(batch_indices);

        let pass = network.forward(&batch);
        let loss = MseLoss::batch_loss(&pass.output, &batch_targets);
        total_loss += loss;
        batches += 1;

        // Running argmax accuracy over the samples seen so far this epoch.
        for col in 0..batch.cols {
            if pass.output.argmax_column(col) == batch_targets.argmax_column(col) {
                correct += 1;
            } else {
                incorrect += 1;
            }
        }

        // NaN fails every ordered comparison, so test finiteness first.
        if !loss.is_finite() || loss >= DIVERGENCE_LIMIT {
            let stats = epoch_stats(epoch, config, total_loss, batches, correct, incorrect, t_start);
            let outcome = TrainOutcome::Diverged {
                epoch,
                batch: batches,
                loss,
            };
            return (stats, Some(outcome));
        }

        let error = MseLoss::derivative(&pass.output, &batch_targets);
        let (w1_grad, w2_grad) = network.backward(&batch, &pass, &error);
        optimizer.step(network, w1_grad, w2_grad);

        if config.progress_every > 0 && batches % config.progress_every == 0 {
            print!(".");
            flush_stdout();
        }
    }

    let stats = epoch_stats(epoch, config, total_loss, batches, correct, incorrect, t_start);
    (stats, None)
}

fn epoch_stats(
    epoch: usize,
    config: &TrainConfig,
    total_loss: f64,
    batches: usize,
    correct: usize,
    incorrect: usize,
    t_start: Instant,
) -> EpochStats {
    EpochStats {
        epoch,
        total_epochs: config.epochs,
        mean_loss: if batches > 0 {
            total_loss / batches as f64
        } else {
            0.0
        },
        correct,
        incorrect,
        elapsed_ms: t_start.elapsed().as_millis() as u64,
    }
}

fn flush_stdout() {
    // Best effort; a broken stdout is not worth aborting training over.
    let _ = io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Four linearly separable samples: class 0 when the first input
    /// dominates, class 1 otherwise.
    fn toy_dataset() -> (Matrix, Matrix) {
        let inputs = Matrix::from_data(vec![
            vec![1.0, 0.9, 0.1, 0.0],
            vec![0.0, 0.1, 0.9, 1.0],
        ]);
        let targets = Matrix::from_data(vec![
            vec![1.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 1.0],
        ]);
        (inputs, targets)
    }

    fn quiet_config(epochs: usize, batch_size: usize) -> TrainConfig {
        TrainConfig::new(epochs, batch_size, 0)
    }

    #[test]
    fn loss_decreases_on_toy_dataset() {
        let (inputs, targets) = toy_dataset();
        let mut rng = StdRng::seed_from_u64(10);
        let mut network = Network::new(2, 4, 2, 0.01, &mut rng);
        let optimizer = Sgd::new(2.0);

        let (stats, outcome) =
            train_loop(&mut network, &inputs, &targets, &optimizer, &quiet_config(500, 2));

        assert_eq!(outcome, TrainOutcome::Completed);
        assert_eq!(stats.len(), 500);

        let first = stats.first().unwrap().mean_loss;
        let last = stats.last().unwrap().mean_loss;
        assert!(
            last < first,
            "loss should decrease: first {} vs last {}",
            first,
            last
        );
        // The toy problem is easy; after 500 epochs every sample classifies.
        let final_stats = stats.last().unwrap();
        assert_eq!(final_stats.incorrect, 0);
    }

    #[test]
    fn stats_count_every_sample_once_per_epoch() {
        let (inputs, targets) = toy_dataset();
        let mut rng = StdRng::seed_from_u64(11);
        let mut network = Network::new(2, 3, 2, 0.01, &mut rng);
        let optimizer = Sgd::new(0.5);

        // Batch size 3 does not divide 4; the last batch is a partial one.
        let (stats, _) =
            train_loop(&mut network, &inputs, &targets, &optimizer, &quiet_config(3, 3));

        for epoch_stats in &stats {
            assert_eq!(epoch_stats.correct + epoch_stats.incorrect, 4);
        }
    }

    #[test]
    fn non_finite_weights_trip_the_divergence_guard() {
        let (inputs, targets) = toy_dataset();
        let mut rng = StdRng::seed_from_u64(12);
        let mut network = Network::new(2, 3, 2, 0.01, &mut rng);
        network.weights_l1_l2.data[0][0] = f64::NAN;
        let optimizer = Sgd::new(0.5);

        let (stats, outcome) =
            train_loop(&mut network, &inputs, &targets, &optimizer, &quiet_config(5, 2));

        match outcome {
            TrainOutcome::Diverged { epoch, batch, loss } => {
                assert_eq!(epoch, 1);
                assert_eq!(batch, 1);
                assert!(loss.is_nan());
            }
            TrainOutcome::Completed => panic!("expected divergence"),
        }
        assert_eq!(stats.len(), 1);
    }

    #[test]
    #[should_panic(expected = "batch_size must be at least 1")]
    fn zero_batch_size_panics() {
        let (inputs, targets) = toy_dataset();
        let mut rng = StdRng::seed_from_u64(13);
        let mut network = Network::new(2, 3, 2, 0.01, &mut rng);
        let optimizer = Sgd::new(0.5);
        train_loop(&mut network, &inputs, &targets, &optimizer, &quiet_config(1, 0));
    }
}
