use crate::math::matrix::Matrix;

pub struct MseLoss;

impl MseLoss {
    /// Mean squared error over every element of a batch: columns are samples,
    /// rows are output units.
    ///
    /// For sigmoid outputs against one-hot targets every squared difference
    /// lies in [0, 1], so the batch loss does too — which is what makes the
    /// training loop's divergence limit of 1.0 meaningful.
    pub fn batch_loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        assert_eq!(predicted.rows, expected.rows);
        assert_eq!(predicted.cols, expected.cols);

        let n = (predicted.rows * predicted.cols) as f64;
        let total: f64 = predicted
            .data
            .iter()
            .zip(expected.data.iter())
            .flat_map(|(row_p, row_e)| {
                row_p.iter().zip(row_e.iter()).map(|(p, e)| (p - e) * (p - e))
            })
            .sum();
        total / n
    }

    /// Element-wise gradient of the summed squared error: 2·(predicted − expected).
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Matrix {
        assert_eq!(predicted.rows, expected.rows);
        assert_eq!(predicted.cols, expected.cols);

        let data = predicted
            .data
            .iter()
            .zip(expected.data.iter())
            .map(|(row_p, row_e)| {
                row_p
                    .iter()
                    .zip(row_e.iter())
                    .map(|(p, e)| 2.0 * (p - e))
                    .collect()
            })
            .collect();
        Matrix::from_data(data)
    }
}
