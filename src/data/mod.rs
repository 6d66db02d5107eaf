pub mod idx;
pub mod whiten;

pub use idx::{load_images, load_labels};
pub use whiten::whiten_rows;

use crate::math::matrix::Matrix;

/// One-hot encodes class labels into an `n_classes` × N matrix: column `i`
/// holds a single 1.0 at row `labels[i]`.
///
/// A label outside `[0, n_classes)` is an explicit error rather than a
/// silent out-of-bounds write.
pub fn one_hot(labels: &[u8], n_classes: usize) -> Result<Matrix, String> {
    let mut res = Matrix::zeros(n_classes, labels.len());

    for (i, &label) in labels.iter().enumerate() {
        let class = label as usize;
        if class >= n_classes {
            return Err(format!(
                "label at index {}: class {} is out of range for n_classes={}.",
                i, class, n_classes
            ));
        }
        res.data[class][i] = 1.0;
    }

    Ok(res)
}
