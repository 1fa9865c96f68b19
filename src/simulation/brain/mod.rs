//! Feed-forward decision network for vehicle autopilots.
//!
//! The network is a chain of [`Level`]s with step activation. It is never
//! trained with gradients; the only learning operator is [`Brain::mutate`],
//! which blends parameters toward fresh randomness.

use ndarray::{Array1, Array2};
use rand::Rng;
use thiserror::Error;

pub mod level;
pub mod record;

pub use level::Level;
pub use record::{BrainRecord, LevelRecord};

/// Number of control signals produced by a driving brain
/// (forward, left, right, reverse).
pub const CONTROL_OUTPUTS: usize = 4;

/// Errors raised when a brain layout or persisted record has the wrong shape.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    /// A layout needs at least an input and an output size.
    #[error("layout must contain at least two sizes, got {0}")]
    LayoutTooShort(usize),
    /// A layout entry is zero.
    #[error("layer size at position {index} is zero")]
    ZeroSized {
        /// Position in the layout.
        index: usize,
    },
    /// The record does not have one level per layout transition.
    #[error("expected {expected} levels, found {actual}")]
    LevelCount {
        /// Levels required by the layout.
        expected: usize,
        /// Levels present.
        actual: usize,
    },
    /// A level has the wrong number of weight rows.
    #[error("level {index} has {actual} weight rows, expected {expected}")]
    WeightRows {
        /// Level position.
        index: usize,
        /// Rows required.
        expected: usize,
        /// Rows present.
        actual: usize,
    },
    /// A weight row has the wrong number of columns.
    #[error("level {index} row {row} has {actual} weights, expected {expected}")]
    WeightColumns {
        /// Level position.
        index: usize,
        /// Row position.
        row: usize,
        /// Columns required.
        expected: usize,
        /// Columns present.
        actual: usize,
    },
    /// A level has the wrong number of biases.
    #[error("level {index} has {actual} biases, expected {expected}")]
    BiasCount {
        /// Level position.
        index: usize,
        /// Biases required.
        expected: usize,
        /// Biases present.
        actual: usize,
    },
    /// A level does not accept the previous level's output size.
    #[error("level {index} takes {actual} inputs but the previous level emits {expected}")]
    Chaining {
        /// Level position.
        index: usize,
        /// Output size of the previous level.
        expected: usize,
        /// Input size of this level.
        actual: usize,
    },
    /// A weight or bias is NaN or infinite.
    #[error("level {index} contains a non-finite parameter")]
    NonFinite {
        /// Level position.
        index: usize,
    },
    /// The brain does not take one input per sensor ray.
    #[error("brain takes {actual} inputs but the sensor has {expected} rays")]
    SensorInputs {
        /// Rays on the sensor.
        expected: usize,
        /// Inputs of the brain.
        actual: usize,
    },
    /// The brain does not emit one output per control signal.
    #[error("brain emits {actual} outputs but {expected} control signals are needed")]
    ControlOutputs {
        /// Control signals.
        expected: usize,
        /// Outputs of the brain.
        actual: usize,
    },
}

/// A chain of step-activated levels.
///
/// Level `i`'s output count always equals level `i + 1`'s input count.
#[derive(Debug, Clone, PartialEq)]
pub struct Brain {
    levels: Vec<Level>,
}

impl Brain {
    /// Creates a brain with uniform random parameters in `[-1, 1]`.
    ///
    /// `layout` lists neuron counts from input to output, e.g. `[5, 6, 4]`.
    pub fn new_random<R: Rng + ?Sized>(layout: &[usize], rng: &mut R) -> Result<Self, ShapeError> {
        check_layout(layout)?;
        let levels = layout
            .windows(2)
            .map(|pair| Level::new_random(pair[0], pair[1], rng))
            .collect();
        Ok(Self { levels })
    }

    /// Wraps existing levels after checking that they chain.
    pub fn from_levels(levels: Vec<Level>) -> Result<Self, ShapeError> {
        if levels.is_empty() {
            return Err(ShapeError::LayoutTooShort(levels.len()));
        }
        for (index, pair) in levels.windows(2).enumerate() {
            if pair[0].output_count() != pair[1].input_count() {
                return Err(ShapeError::Chaining {
                    index: index + 1,
                    expected: pair[0].output_count(),
                    actual: pair[1].input_count(),
                });
            }
        }
        Ok(Self { levels })
    }

    /// Rebuilds a brain from a persisted record.
    ///
    /// The record must match `layout` exactly; any mismatch is rejected before
    /// a single parameter is copied.
    pub fn from_record(record: &BrainRecord, layout: &[usize]) -> Result<Self, ShapeError> {
        check_layout(layout)?;
        let expected_levels = layout.len() - 1;
        if record.levels.len() != expected_levels {
            return Err(ShapeError::LevelCount {
                expected: expected_levels,
                actual: record.levels.len(),
            });
        }

        for (index, (level, pair)) in record.levels.iter().zip(layout.windows(2)).enumerate() {
            let (rows, cols) = (pair[0], pair[1]);
            if level.weights.len() != rows {
                return Err(ShapeError::WeightRows {
                    index,
                    expected: rows,
                    actual: level.weights.len(),
                });
            }
            if let Some((row, weights)) =
                level.weights.iter().enumerate().find(|(_, w)| w.len() != cols)
            {
                return Err(ShapeError::WeightColumns {
                    index,
                    row,
                    expected: cols,
                    actual: weights.len(),
                });
            }
            if level.biases.len() != cols {
                return Err(ShapeError::BiasCount {
                    index,
                    expected: cols,
                    actual: level.biases.len(),
                });
            }
            let finite = level.weights.iter().flatten().all(|w| w.is_finite())
                && level.biases.iter().all(|b| b.is_finite());
            if !finite {
                return Err(ShapeError::NonFinite { index });
            }
        }

        let levels = record
            .levels
            .iter()
            .zip(layout.windows(2))
            .map(|(level, pair)| {
                let weights = Array2::from_shape_fn((pair[0], pair[1]), |(r, c)| level.weights[r][c]);
                Level::from_parts(weights, Array1::from_vec(level.biases.clone()))
            })
            .collect();

        Ok(Self { levels })
    }

    /// Converts the brain into its persisted form.
    pub fn to_record(&self) -> BrainRecord {
        BrainRecord {
            levels: self
                .levels
                .iter()
                .map(|level| LevelRecord {
                    weights: level.weights.rows().into_iter().map(|row| row.to_vec()).collect(),
                    biases: level.biases.to_vec(),
                })
                .collect(),
        }
    }

    /// Levels from input to output.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Neuron counts from input to output.
    pub fn layout(&self) -> Vec<usize> {
        let mut layout = Vec::with_capacity(self.levels.len() + 1);
        if let Some(first) = self.levels.first() {
            layout.push(first.input_count());
        }
        layout.extend(self.levels.iter().map(Level::output_count));
        layout
    }

    /// Number of inputs the first level expects.
    pub fn input_count(&self) -> usize {
        self.levels.first().map_or(0, Level::input_count)
    }

    /// Runs a forward pass without recording activations.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.clone();
        for level in &self.levels {
            output = level.forward(&output);
        }
        output
    }

    /// Runs a forward pass and records every level's activations.
    pub fn feed_forward(&mut self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.clone();
        for level in &mut self.levels {
            output = level.feed_forward(&output);
        }
        output
    }

    /// Blends every parameter toward a fresh sample from `[-1, 1]`.
    ///
    /// `amount = 0` leaves the brain unchanged and `amount = 1` replaces every
    /// parameter. The shape of the brain never changes.
    pub fn mutate<R: Rng + ?Sized>(&mut self, amount: f32, rng: &mut R) {
        let amount = amount.clamp(0.0, 1.0);
        for level in &mut self.levels {
            level.mutate(amount, rng);
        }
    }

    /// Flattens all weights and biases into a single vector.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::new();
        for level in &self.levels {
            flat.extend(level.weights.iter().copied());
            flat.extend(level.biases.iter().copied());
        }
        flat
    }
}

fn check_layout(layout: &[usize]) -> Result<(), ShapeError> {
    if layout.len() < 2 {
        return Err(ShapeError::LayoutTooShort(layout.len()));
    }
    if let Some(index) = layout.iter().position(|&size| size == 0) {
        return Err(ShapeError::ZeroSized { index });
    }
    Ok(())
}
