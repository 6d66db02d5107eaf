use crate::math::matrix::Matrix;
use crate::math::stats::{mean, sample_stddev};

/// Floor applied to the per-row standard deviation so a constant row (e.g. an
/// all-black image) whitens to zeros instead of NaN.
const STDDEV_FLOOR: f64 = 1e-12;

/// Normalizes every sample row in place to zero mean and unit variance
/// (sample stddev, N-1 denominator).
pub fn whiten_rows(images: &mut Matrix) {
    for row in &mut images.data {
        let m = mean(row);
        let s = sample_stddev(row).max(STDDEV_FLOOR);

        for x in row.iter_mut() {
            *x = (*x - m) / s;
        }
    }
}
