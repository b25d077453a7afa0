/// Rectified linear unit, `max(0, z)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Relu;

impl Relu {
    pub fn f(&self, z: f32) -> f32 {
        if z > 0.0 { z } else { 0.0 }
    }

    /// The subgradient at zero is taken as 0.
    pub fn df(&self, z: f32) -> f32 {
        if z > 0.0 { 1.0 } else { 0.0 }
    }
}
