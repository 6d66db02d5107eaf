use crate::activation::sigmoid::{sigmoid, sigmoid_derivative};
use crate::math::matrix::Matrix;
use rand::Rng;

/// A fixed two-layer fully-connected network with sigmoid activations and no
/// biases. Samples are columns: a mini-batch of B inputs is an
/// `input_size` × B matrix.
pub struct Network {
    /// Input → hidden weights, `hidden_size` × `input_size`.
    pub weights_l0_l1: Matrix,
    /// Hidden → output weights, `output_size` × `hidden_size`.
    pub weights_l1_l2: Matrix,
}

/// Activations and activation derivatives retained from a forward pass,
/// everything `backward()` needs besides the input batch itself.
pub struct ForwardPass {
    /// σ(z1), `hidden_size` × B.
    pub hidden: Matrix,
    /// σ′(z1), evaluated at the pre-activation.
    pub hidden_derivative: Matrix,
    /// σ(z2), `output_size` × B.
    pub output: Matrix,
    /// σ′(z2).
    pub output_derivative: Matrix,
}

impl Network {
    /// Builds a network with uniform small random weights in `[0, init_scale)`.
    pub fn new(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        init_scale: f64,
        rng: &mut impl Rng,
    ) -> Network {
        Network {
            weights_l0_l1: Matrix::uniform(hidden_size, input_size, init_scale, rng),
            weights_l1_l2: Matrix::uniform(output_size, hidden_size, init_scale, rng),
        }
    }

    /// Forward pass over a whole mini-batch (columns are samples).
    pub fn forward(&self, batch: &Matrix) -> ForwardPass {
        let z1 = self.weights_l0_l1.clone() * batch.clone();
        let hidden = z1.map(sigmoid);
        let hidden_derivative = z1.map(sigmoid_derivative);

        let z2 = self.weights_l1_l2.clone() * hidden.clone();
        let output = z2.map(sigmoid);
        let output_derivative = z2.map(sigmoid_derivative);

        ForwardPass {
            hidden,
            hidden_derivative,
            output,
            output_derivative,
        }
    }

    /// Backpropagates `output_error` (∂L/∂a2, shape `output_size` × B)
    /// through both layers and returns `(w1_grad, w2_grad)`, each averaged
    /// over the batch.
    pub fn backward(
        &self,
        batch: &Matrix,
        pass: &ForwardPass,
        output_error: &Matrix,
    ) -> (Matrix, Matrix) {
        let inv_batch = 1.0 / batch.cols as f64;

        // δ2 = ∂L/∂a2 ⊙ σ'(z2)
        let output_delta = output_error.hadamard(&pass.output_derivative);
        let w2_grad = (output_delta.clone() * pass.hidden.transpose()).map(|x| x * inv_batch);

        // δ1 = (W2ᵀ · δ2) ⊙ σ'(z1)
        let hidden_delta =
            (self.weights_l1_l2.transpose() * output_delta).hadamard(&pass.hidden_derivative);
        let w1_grad = (hidden_delta * batch.transpose()).map(|x| x * inv_batch);

        (w1_grad, w2_grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::mse::MseLoss;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn forward_shapes_match_architecture() {
        let mut rng = StdRng::seed_from_u64(1);
        let network = Network::new(4, 3, 2, 0.01, &mut rng);

        let batch = Matrix::zeros(4, 5);
        let pass = network.forward(&batch);

        assert_eq!(pass.hidden.rows, 3);
        assert_eq!(pass.hidden.cols, 5);
        assert_eq!(pass.output.rows, 2);
        assert_eq!(pass.output.cols, 5);
        // Zero input means zero hidden pre-activation, so σ(0) = 0.5 exactly.
        assert!(pass.hidden.data.iter().flatten().all(|&x| x == 0.5));
        // Outputs stay in the open unit interval.
        assert!(pass.output.data.iter().flatten().all(|&x| x > 0.0 && x < 1.0));
    }

    #[test]
    fn backward_gradient_shapes() {
        let mut rng = StdRng::seed_from_u64(2);
        let network = Network::new(4, 3, 2, 0.01, &mut rng);

        let batch = Matrix::uniform(4, 6, 1.0, &mut rng);
        let targets = Matrix::zeros(2, 6);
        let pass = network.forward(&batch);
        let error = MseLoss::derivative(&pass.output, &targets);
        let (w1_grad, w2_grad) = network.backward(&batch, &pass, &error);

        assert_eq!((w1_grad.rows, w1_grad.cols), (3, 4));
        assert_eq!((w2_grad.rows, w2_grad.cols), (2, 3));
    }

    /// Batch-mean of the per-sample summed squared error, after nudging one
    /// weight by `delta`. The weight is restored before returning.
    ///
    /// `backward()` returns gradients of exactly this quantity, which is
    /// `batch_loss * output_count` (batch_loss also divides by the number of
    /// output units).
    fn perturbed_loss(
        network: &mut Network,
        batch: &Matrix,
        targets: &Matrix,
        layer: usize,
        i: usize,
        j: usize,
        delta: f64,
    ) -> f64 {
        let weights = if layer == 0 {
            &mut network.weights_l0_l1
        } else {
            &mut network.weights_l1_l2
        };
        weights.data[i][j] += delta;

        let pass = network.forward(batch);
        let loss = MseLoss::batch_loss(&pass.output, targets) * targets.rows as f64;

        let weights = if layer == 0 {
            &mut network.weights_l0_l1
        } else {
            &mut network.weights_l1_l2
        };
        weights.data[i][j] -= delta;

        loss
    }

    /// Compares analytic gradients against central finite differences of the
    /// loss on a tiny network.
    #[test]
    fn backward_matches_finite_differences() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut network = Network::new(2, 3, 2, 0.5, &mut rng);

        let batch = Matrix::from_data(vec![vec![0.3, -1.2], vec![0.9, 0.4]]);
        let targets = Matrix::from_data(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);

        let pass = network.forward(&batch);
        let error = MseLoss::derivative(&pass.output, &targets);
        let (w1_grad, w2_grad) = network.backward(&batch, &pass, &error);

        let eps = 1e-6;
        for layer in 0..2 {
            let analytic = if layer == 0 { &w1_grad } else { &w2_grad };
            for i in 0..analytic.rows {
                for j in 0..analytic.cols {
                    let plus =
                        perturbed_loss(&mut network, &batch, &targets, layer, i, j, eps);
                    let minus =
                        perturbed_loss(&mut network, &batch, &targets, layer, i, j, -eps);
                    let numeric = (plus - minus) / (2.0 * eps);
                    assert!(
                        (numeric - analytic.data[i][j]).abs() < 1e-6,
                        "layer {} weight [{}][{}]: numeric {} vs analytic {}",
                        layer,
                        i,
                        j,
                        numeric,
                        analytic.data[i][j]
                    );
                }
            }
        }
    }
}
