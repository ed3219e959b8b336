// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for ringer-npu-plasticity
//!
//! Each rule drives a single weight `w` so that `w * x` fits `2 * x`.

use ndarray::array;
use ringer_config::SynapseStrategyConfig;
use ringer_npu_neural::Ensemble;
use ringer_npu_plasticity::*;

fn fit(rule: &mut dyn WeightUpdate, steps: usize) -> f64 {
    let input: Ensemble = array![1.0, 2.0, -1.0];
    let target = input.mapv(|x| 2.0 * x);
    let mut weight = 0.0;
    for _ in 0..steps {
        let lesson = &target - &input.mapv(|x| weight * x);
        weight += rule.teach(&input, &lesson);
    }
    weight
}

#[test]
fn test_backprop_fits_single_weight() {
    let mut rule = WeightUpdateStrategy::from_config(&SynapseStrategyConfig::backprop(0.1, 0.1, 0.9))
        .unwrap();
    let weight = fit(&mut rule, 100);
    assert!((weight - 2.0).abs() < 1e-3, "weight = {}", weight);
}

#[test]
fn test_rprop_fits_single_weight() {
    let mut rule = WeightUpdateStrategy::from_config(&SynapseStrategyConfig::rprop(0.1)).unwrap();
    let weight = fit(&mut rule, 200);
    assert!((weight - 2.0).abs() < 1e-2, "weight = {}", weight);
}

#[test]
fn test_dump_survives_toml() {
    let mut rule = WeightUpdateStrategy::from_name("rprop").unwrap();
    fit(&mut rule, 5);
    let text = toml::to_string(&rule.dump()).unwrap();
    let config: SynapseStrategyConfig = toml::from_str(&text).unwrap();
    let restored = WeightUpdateStrategy::from_config(&config).unwrap();
    assert_eq!(restored, rule);
}

#[test]
fn test_collapsed_rate_reloads() {
    let mut rule = WeightUpdateStrategy::from_config(&SynapseStrategyConfig::backprop(0.1, 0.1, 0.5))
        .unwrap();
    let input = array![1.0];
    for step in 0..3000 {
        let lesson = if step % 2 == 0 { array![1.0] } else { array![-1.0] };
        rule.teach(&input, &lesson);
    }

    let mut reloaded = WeightUpdateStrategy::from_config(&rule.dump()).unwrap();
    assert_eq!(reloaded, rule);
    for lesson in [array![0.5], array![-2.0], array![1.0]] {
        assert_eq!(rule.teach(&input, &lesson), reloaded.teach(&input, &lesson));
    }
    assert_eq!(reloaded.dump(), rule.dump());
}
