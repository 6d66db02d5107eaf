pub mod distribution;

pub use distribution::format_distribution;
