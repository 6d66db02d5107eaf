//! Trains a 784 → 100 → 10 sigmoid network on the MNIST training set with
//! mini-batch gradient descent and manually derived backprop.
//!
//! Expects the raw IDX files at mnist_data/. All hyperparameters are the
//! constants below; there are no CLI flags.

use mnist_feedforward::data::{one_hot, whiten_rows};
use mnist_feedforward::display::format_distribution;
use mnist_feedforward::idx;
use mnist_feedforward::math::stats::mean;
use mnist_feedforward::{train_loop, Network, Sgd, TrainConfig, TrainOutcome};

use rand::rngs::StdRng;
use rand::SeedableRng;

const TRAIN_IMAGES_PATH: &str = "mnist_data/train-images-idx3-ubyte";
const TRAIN_LABELS_PATH: &str = "mnist_data/train-labels-idx1-ubyte";

const HIDDEN_SIZE: usize = 100;
const N_CLASSES: usize = 10;
const INIT_SCALE: f64 = 0.01;
const RNG_SEED: u64 = 10;

const EPOCHS: usize = 10;
const BATCH_SIZE: usize = 10;
const LEARNING_RATE: f64 = 0.5;
// One dot per 200 batches ≈ every 2,000 samples out of 60,000.
const PROGRESS_EVERY: usize = 200;

fn main() {
    if let Err(message) = run() {
        eprintln!("error: {}", message);
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    println!("mnist-feedforward: two-layer MNIST trainer\n");

    // --- Load data ---
    let mut images = idx::load_images(TRAIN_IMAGES_PATH)?;
    let labels = idx::load_labels(TRAIN_LABELS_PATH)?;

    if images.rows != labels.len() {
        return Err(format!(
            "IDX file mismatch: image file holds {} samples but label file holds {}.",
            images.rows,
            labels.len()
        ));
    }
    println!(
        "loaded {} samples of {} pixels each",
        images.rows, images.cols
    );

    // --- Whitening ---
    let raw_means: Vec<f64> = images.data.iter().map(|row| mean(row)).collect();
    println!("per-sample pixel means, raw:      {}", format_distribution(&raw_means));

    whiten_rows(&mut images);

    let whitened_means: Vec<f64> = images.data.iter().map(|row| mean(row)).collect();
    println!(
        "per-sample pixel means, whitened: {}\n",
        format_distribution(&whitened_means)
    );

    // Columns are samples from here on.
    let inputs = images.transpose();
    let targets = one_hot(&labels, N_CLASSES)?;

    // --- Build network ---
    let input_size = inputs.rows;
    let mut rng = StdRng::seed_from_u64(RNG_SEED);
    let mut network = Network::new(input_size, HIDDEN_SIZE, N_CLASSES, INIT_SCALE, &mut rng);

    println!(
        "network: {} -> {} -> {} (sigmoid, no biases)",
        input_size, HIDDEN_SIZE, N_CLASSES
    );

    let optimizer = Sgd::new(LEARNING_RATE);
    let config = TrainConfig::new(EPOCHS, BATCH_SIZE, PROGRESS_EVERY);

    let config_json = serde_json::to_string_pretty(&config)
        .map_err(|e| format!("cannot render run configuration: {}", e))?;
    println!("run configuration (lr = {}):\n{}\n", LEARNING_RATE, config_json);

    // --- Train ---
    let (stats, outcome) = train_loop(&mut network, &inputs, &targets, &optimizer, &config);

    if let TrainOutcome::Diverged { epoch, batch, loss } = outcome {
        println!(
            "\ntraining aborted: loss {} at epoch {}, batch {} reached the divergence limit",
            loss, epoch, batch
        );
    }

    // --- Final per-epoch summary ---
    println!(
        "\n{:>6}  {:>12}  {:>10}  {:>10}  {:>10}",
        "Epoch", "Mean Loss", "Accuracy", "Correct", "Time (ms)"
    );
    println!("{}", "-".repeat(56));
    for epoch_stats in &stats {
        println!(
            "{:>6}  {:>12.6}  {:>9.2}%  {:>10}  {:>10}",
            epoch_stats.epoch,
            epoch_stats.mean_loss,
            epoch_stats.accuracy(),
            epoch_stats.correct,
            epoch_stats.elapsed_ms
        );
    }

    Ok(())
}
