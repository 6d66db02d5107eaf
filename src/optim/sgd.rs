use crate::math::matrix::Matrix;
use crate::network::network::Network;

pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one gradient-descent update to both weight matrices.
    pub fn step(&self, network: &mut Network, w1_grad: Matrix, w2_grad: Matrix) {
        let lr = self.learning_rate;
        network.weights_l0_l1 = network.weights_l0_l1.clone() - w1_grad.map(|x| x * lr);
        network.weights_l1_l2 = network.weights_l1_l2.clone() - w2_grad.map(|x| x * lr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn step_moves_weights_against_gradient() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut network = Network::new(1, 2, 1, 0.01, &mut rng);
        let before = network.weights_l0_l1.clone();

        let w1_grad = Matrix::from_data(vec![vec![1.0], vec![-1.0]]);
        let w2_grad = Matrix::zeros(1, 2);
        Sgd::new(0.1).step(&mut network, w1_grad, w2_grad);

        assert!((network.weights_l0_l1.data[0][0] - (before.data[0][0] - 0.1)).abs() < 1e-12);
        assert!((network.weights_l0_l1.data[1][0] - (before.data[1][0] + 0.1)).abs() < 1e-12);
    }
}
