// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Activation strategies
//!
//! A strategy maps a neuron's summed input to its output (`run`) and turns an
//! error signal into a local gradient (`teach`). Derivatives are expressed in
//! terms of the *output* value, which is what a neuron keeps in its state once
//! it has fired:
//!
//! | function | f(x)              | f'(y)       |
//! |----------|-------------------|-------------|
//! | tanh     | tanh(x)           | 1 - y²      |
//! | sigmoid  | 1 / (1 + e^-x)    | y (1 - y)   |
//! | linear   | x                 | 1           |

use ringer_config::ActivationFunction;

use crate::types::{Ensemble, NeuralError, Result};

/// Activation function bound to a hidden or output neuron
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationStrategy {
    function: ActivationFunction,
}

impl ActivationStrategy {
    pub fn new(function: ActivationFunction) -> Self {
        Self { function }
    }

    /// Build from a textual name such as `"tanh"`
    ///
    /// # Errors
    ///
    /// Unknown names are rejected with the configuration error naming them
    pub fn from_name(name: &str) -> Result<Self> {
        let function: ActivationFunction = name.parse()?;
        Ok(Self::new(function))
    }

    pub fn function(&self) -> ActivationFunction {
        self.function
    }

    /// f(x)
    #[inline]
    pub fn forward(&self, x: f64) -> f64 {
        match self.function {
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::Linear => x,
        }
    }

    /// f'(x) evaluated from y = f(x)
    #[inline]
    pub fn derivative(&self, y: f64) -> f64 {
        match self.function {
            ActivationFunction::Tanh => 1.0 - y * y,
            ActivationFunction::Sigmoid => y * (1.0 - y),
            ActivationFunction::Linear => 1.0,
        }
    }

    /// Apply f elementwise, in place
    pub fn run(&self, data: &mut Ensemble) {
        if self.function == ActivationFunction::Linear {
            return;
        }
        let strategy = *self;
        data.mapv_inplace(|x| strategy.forward(x));
    }

    /// Replace `output` with `lesson ⊙ f'(output)`
    ///
    /// # Errors
    ///
    /// `WidthMismatch` when the lesson and output widths differ; `output` is
    /// left untouched.
    pub fn teach(&self, output: &mut Ensemble, lesson: &Ensemble) -> Result<()> {
        if output.len() != lesson.len() {
            tracing::debug!(target: "ringer-npu-neural",
                "{} derivative skipped: output width {} vs lesson width {}",
                self.function.name(), output.len(), lesson.len());
            return Err(NeuralError::WidthMismatch {
                index: 0,
                expected: output.len(),
                actual: lesson.len(),
            });
        }
        let strategy = *self;
        output.zip_mut_with(lesson, |y, &e| *y = e * strategy.derivative(*y));
        Ok(())
    }

    /// Parameters needed to rebuild this strategy
    pub fn dump(&self) -> ActivationFunction {
        self.function
    }

    /// Short label used in graph renderings
    pub fn dot(&self) -> &'static str {
        match self.function {
            ActivationFunction::Tanh => "tanh",
            ActivationFunction::Sigmoid => "σ",
            ActivationFunction::Linear => "lin",
        }
    }
}

impl From<ActivationFunction> for ActivationStrategy {
    fn from(function: ActivationFunction) -> Self {
        Self::new(function)
    }
}

impl Default for ActivationStrategy {
    fn default() -> Self {
        Self::new(ActivationFunction::Tanh)
    }
}
