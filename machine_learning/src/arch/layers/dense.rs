use ndarray::{linalg, prelude::*};

use crate::{MlErr, Result, arch::activations::ActFn};

/// A fully connected layer evaluated one sample at a time.
///
/// The layer owns no parameters, it views a slice laid out as the weights
/// (`out x in`, row major, one row per output unit) followed by the biases.
#[derive(Clone)]
pub struct Dense {
    /// `(out, in)`
    dim: (usize, usize),
    act_fn: Option<ActFn>,
    size: usize,

    // Forward metadata
    x: Array1<f32>,
    z: Array1<f32>,
}

impl Dense {
    /// Creates a new `Dense` layer.
    ///
    /// # Arguments
    /// * `dim` - The amount of outputs and inputs of the layer.
    /// * `act_fn` - The activation applied to every output, `None` for a linear layer.
    pub fn new(dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self {
            dim,
            size: (dim.1 + 1) * dim.0,
            act_fn,
            x: Array1::zeros(dim.1),
            z: Array1::zeros(dim.0),
        }
    }

    /// Returns the size of this layer.
    ///
    /// # Returns
    /// The amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Computes the activations of this layer for `x`, caching what the
    /// backward pass needs.
    pub fn forward(&mut self, params: &[f32], x: ArrayView1<f32>) -> Result<Array1<f32>> {
        let (w, b) = self.view_params(params)?;

        self.z = w.dot(&x) + &b;
        self.x = x.to_owned();

        let Some(act_fn) = &self.act_fn else {
            return Ok(self.z.clone());
        };

        Ok(self.z.mapv(|z| act_fn.f(z)))
    }

    /// Writes this layer's gradient into `grad` given `d`, the derivative of
    /// the loss with respect to this layer's output.
    ///
    /// # Returns
    /// The derivative of the loss with respect to this layer's input.
    pub fn backward(
        &mut self,
        params: &[f32],
        grad: &mut [f32],
        mut d: Array1<f32>,
    ) -> Result<Array1<f32>> {
        if let Some(act_fn) = &self.act_fn {
            d.zip_mut_with(&self.z, |d, &z| *d *= act_fn.df(z));
        }

        let (mut dw, mut db) = self.view_grad(grad)?;
        let d_col = d.view().insert_axis(Axis(1));
        let x_row = self.x.view().insert_axis(Axis(0));
        linalg::general_mat_mul(1.0, &d_col, &x_row, 0.0, &mut dw);
        db.assign(&d);

        let (w, _) = self.view_params(params)?;
        Ok(w.t().dot(&d))
    }

    /// Gives a view of the raw gradient slice as the delta weights and delta biases of this layer.
    ///
    /// # Arguments
    /// * `grad` - A gradient slice.
    ///
    /// # Returns
    /// A tuple containing the delta weights and delta biases.
    fn view_grad<'a>(
        &self,
        grad: &'a mut [f32],
    ) -> Result<(ArrayViewMut2<'a, f32>, ArrayViewMut1<'a, f32>)> {
        let got = grad.len();
        let w_size = self.size - self.dim.0;
        if got != self.size {
            return Err(self.mismatch("dense layer gradient", got));
        }

        let (dw_raw, db_raw) = grad.split_at_mut(w_size);
        let dw = ArrayViewMut2::from_shape(self.dim, dw_raw)
            .map_err(|_| self.mismatch("dense layer gradient", got))?;
        let db = ArrayViewMut1::from_shape(self.dim.0, db_raw)
            .map_err(|_| self.mismatch("dense layer gradient", got))?;
        Ok((dw, db))
    }

    /// Gives a view of the raw parameter slice as the weights and biases of this layer.
    ///
    /// # Arguments
    /// * `params` - A slice of parameters.
    ///
    /// # Returns
    /// A tuple containing the weights and biases.
    fn view_params<'a>(
        &self,
        params: &'a [f32],
    ) -> Result<(ArrayView2<'a, f32>, ArrayView1<'a, f32>)> {
        let got = params.len();
        let w_size = self.size - self.dim.0;
        if got != self.size {
            return Err(self.mismatch("dense layer params", got));
        }

        let weights = ArrayView2::from_shape(self.dim, &params[..w_size])
            .map_err(|_| self.mismatch("dense layer params", got))?;
        let biases = ArrayView1::from_shape(self.dim.0, &params[w_size..])
            .map_err(|_| self.mismatch("dense layer params", got))?;
        Ok((weights, biases))
    }

    fn mismatch(&self, what: &'static str, got: usize) -> MlErr {
        MlErr::SizeMismatch {
            what,
            got,
            expected: self.size,
        }
    }
}
