//! Per record feature transforms applied by the first two stages.

use comms::INPUT_DIM;

/// Per feature mean the dataset is centred with.
pub const FEATURE_MEAN: [f32; INPUT_DIM] = [0.0; INPUT_DIM];

/// Per feature standard deviation the dataset is scaled with.
pub const FEATURE_STD: [f32; INPUT_DIM] = [1.0; INPUT_DIM];

/// Standardizes features as `(x - mean) / std`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    mean: [f32; INPUT_DIM],
    std: [f32; INPUT_DIM],
}

impl Normalizer {
    pub fn new(mean: [f32; INPUT_DIM], std: [f32; INPUT_DIM]) -> Self {
        Self { mean, std }
    }

    pub fn normalize(&self, features: &mut [f32; INPUT_DIM]) {
        for ((x, mean), std) in features.iter_mut().zip(&self.mean).zip(&self.std) {
            *x = (*x - mean) / std;
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(FEATURE_MEAN, FEATURE_STD)
    }
}

/// Squares the last feature, a fixed nonlinearity the network cannot learn
/// on its own.
pub fn augment(features: &mut [f32; INPUT_DIM]) {
    if let Some(last) = features.last_mut() {
        *last *= *last;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_normalizer_is_identity() {
        let mut x = [0.5, -1.0, 3.25, 2.0];
        Normalizer::default().normalize(&mut x);
        assert_eq!(x, [0.5, -1.0, 3.25, 2.0]);
    }

    #[test]
    fn normalizer_centres_and_scales() {
        let normalizer = Normalizer::new([1.0, 0.0, 0.0, -2.0], [2.0, 1.0, 0.5, 1.0]);
        let mut x = [3.0, 1.0, 1.0, 0.0];
        normalizer.normalize(&mut x);
        assert_eq!(x, [1.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn augment_squares_only_the_last_feature() {
        let mut x = [-3.0, 2.0, 1.5, -3.0];
        augment(&mut x);
        assert_eq!(x, [-3.0, 2.0, 1.5, 9.0]);
    }
}
