use super::LossFn;

/// Squared error of a single scalar prediction, `0.5 * (y_pred - y)^2`.
///
/// The `0.5` makes the derivative the plain residual.
#[derive(Default, Clone, Copy, Debug)]
pub struct Mse;

impl Mse {
    /// Returns a new `Mse`.
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for Mse {
    fn loss(&self, y_pred: f32, y: f32) -> f32 {
        let diff = y_pred - y;
        0.5 * diff * diff
    }

    fn loss_prime(&self, y_pred: f32, y: f32) -> f32 {
        y_pred - y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_squared_error() {
        assert_eq!(Mse.loss(0.0, 2.0), 2.0);
        assert_eq!(Mse.loss(3.0, 2.0), 0.5);
        assert_eq!(Mse.loss_prime(0.0, 2.0), -2.0);
    }
}
