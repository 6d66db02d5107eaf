pub mod math;
pub mod activation;
pub mod data;
pub mod display;
pub mod loss;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use data::idx;
pub use loss::mse::MseLoss;
pub use network::network::Network;
pub use optim::sgd::Sgd;
pub use train::trainer::{train_loop, TrainOutcome};
pub use train::epoch_stats::EpochStats;
pub use train::train_config::TrainConfig;
