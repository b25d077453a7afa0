pub mod activations;
pub mod layers;
pub mod loss;
mod mlp;
mod model;
mod topology;

pub use mlp::Mlp;
pub use model::Model;
pub use topology::{HIDDEN_DIM, Topology};
