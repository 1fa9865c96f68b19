//! A single fully connected level with step activation.

use ndarray::{Array1, Array2};
use rand::Rng;

use super::super::geometric_utils::lerp;

/// One affine layer followed by a hard threshold.
///
/// Weights are laid out `input_count × output_count`, so row `j` holds the
/// outgoing weights of input neuron `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// Weight matrix (`input_count` × `output_count`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_count`).
    pub biases: Array1<f32>,
    /// Inputs seen by the last recorded forward pass.
    pub inputs: Array1<f32>,
    /// Outputs produced by the last recorded forward pass.
    pub outputs: Array1<f32>,
}

impl Level {
    /// Creates a level with weights and biases drawn uniformly from `[-1, 1]`.
    pub fn new_random<R: Rng + ?Sized>(input_count: usize, output_count: usize, rng: &mut R) -> Self {
        let weights =
            Array2::from_shape_fn((input_count, output_count), |_| rng.random_range(-1.0..=1.0));
        let biases = Array1::from_shape_fn(output_count, |_| rng.random_range(-1.0..=1.0));
        Self::from_parts(weights, biases)
    }

    /// Creates a level from explicit parameters.
    pub fn from_parts(weights: Array2<f32>, biases: Array1<f32>) -> Self {
        let (input_count, output_count) = weights.dim();
        Self {
            weights,
            biases,
            inputs: Array1::zeros(input_count),
            outputs: Array1::zeros(output_count),
        }
    }

    /// Number of input neurons.
    pub fn input_count(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of output neurons.
    pub fn output_count(&self) -> usize {
        self.weights.ncols()
    }

    /// Computes the level's outputs without recording them.
    ///
    /// Each output is `1.0` when its weighted sum plus bias is strictly
    /// positive and `0.0` otherwise.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.dot(&self.weights);
        output += &self.biases;
        output.mapv_inplace(step);
        output
    }

    /// Computes the level's outputs and keeps the activations for inspection.
    pub fn feed_forward(&mut self, inputs: &Array1<f32>) -> Array1<f32> {
        let outputs = self.forward(inputs);
        self.inputs.assign(inputs);
        self.outputs.assign(&outputs);
        outputs
    }

    /// Pulls every weight and bias toward a fresh uniform sample by `amount`.
    pub fn mutate<R: Rng + ?Sized>(&mut self, amount: f32, rng: &mut R) {
        self.biases
            .mapv_inplace(|b| lerp(b, rng.random_range(-1.0..=1.0), amount));
        self.weights
            .mapv_inplace(|w| lerp(w, rng.random_range(-1.0..=1.0), amount));
    }
}

#[inline]
fn step(x: f32) -> f32 {
    if x > 0.0 { 1.0 } else { 0.0 }
}
