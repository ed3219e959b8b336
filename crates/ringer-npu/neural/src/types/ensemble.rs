// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Ensembles and patterns
//!
//! A *pattern* is one sample across all inputs (or outputs) of a network. An
//! *ensemble* is one neuron's value across every sample of a batch. Networks
//! transpose between the two at their boundary, so every neuron processes the
//! whole batch in one call.

use ndarray::Array1;

use super::error::{NeuralError, Result};

/// One neuron's values across a batch
pub type Ensemble = Array1<f64>;

/// One sample across the inputs or outputs of a network
pub type Pattern = Array1<f64>;

/// Arithmetic mean, 0 for an empty ensemble
pub fn mean(ensemble: &Ensemble) -> f64 {
    ensemble.mean().unwrap_or(0.0)
}

/// Transpose patterns of width `width` into `width` ensembles of batch length
///
/// # Errors
///
/// `WidthMismatch` naming the first pattern whose length is not `width`
pub fn patterns_to_ensembles(patterns: &[Pattern], width: usize) -> Result<Vec<Ensemble>> {
    if let Some((index, bad)) = patterns.iter().enumerate().find(|(_, p)| p.len() != width) {
        return Err(NeuralError::WidthMismatch {
            index,
            expected: width,
            actual: bad.len(),
        });
    }
    Ok((0..width)
        .map(|column| patterns.iter().map(|p| p[column]).collect())
        .collect())
}

/// Transpose ensembles (one per neuron) back into patterns (one per sample)
///
/// The batch length is taken from the shortest ensemble.
pub fn ensembles_to_patterns(ensembles: &[Ensemble]) -> Vec<Pattern> {
    let batch = ensembles.iter().map(|e| e.len()).min().unwrap_or(0);
    (0..batch)
        .map(|row| ensembles.iter().map(|e| e[row]).collect())
        .collect()
}

/// Mean squared error over every element of paired outputs and targets
///
/// Pairs beyond the shorter list are ignored, as are trailing elements of a
/// longer pattern.
pub fn mse(outputs: &[Pattern], targets: &[Pattern]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (output, target) in outputs.iter().zip(targets) {
        for (o, t) in output.iter().zip(target.iter()) {
            sum += (o - t) * (o - t);
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_transpose_both_ways() {
        let patterns = vec![array![1.0, 2.0], array![3.0, 4.0], array![5.0, 6.0]];
        let ensembles = patterns_to_ensembles(&patterns, 2).unwrap();
        assert_eq!(ensembles, vec![array![1.0, 3.0, 5.0], array![2.0, 4.0, 6.0]]);
        assert_eq!(ensembles_to_patterns(&ensembles), patterns);
    }

    #[test]
    fn test_width_mismatch_reported() {
        let patterns = vec![array![1.0, 2.0], array![3.0]];
        match patterns_to_ensembles(&patterns, 2) {
            Err(NeuralError::WidthMismatch {
                index,
                expected,
                actual,
            }) => {
                assert_eq!((index, expected, actual), (1, 2, 1));
            }
            other => panic!("expected width mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_mse() {
        let outputs = vec![array![1.0, 0.0], array![0.5, 0.5]];
        let targets = vec![array![0.0, 0.0], array![0.5, -0.5]];
        assert!((mse(&outputs, &targets) - 0.5).abs() < 1e-12);
        assert_eq!(mse(&[], &[]), 0.0);
    }

    #[test]
    fn test_mean_of_empty() {
        assert_eq!(mean(&Ensemble::zeros(0)), 0.0);
        assert!((mean(&array![1.0, 2.0, 3.0]) - 2.0).abs() < 1e-12);
    }
}
