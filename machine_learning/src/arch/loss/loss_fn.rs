pub trait LossFn {
    fn loss(&self, y_pred: f32, y: f32) -> f32;
    fn loss_prime(&self, y_pred: f32, y: f32) -> f32;
}
