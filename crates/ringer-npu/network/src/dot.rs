// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Graphviz rendering of a network

use std::fmt::Write;

use crate::network::Network;

impl Network {
    /// Render the graph as a Graphviz digraph
    ///
    /// Inputs are drawn as boxes with their normalisation, hidden and output
    /// neurons as records naming their activation, edges as `(id) weight`.
    /// Every output gets an outlet node.
    pub fn dot(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph ringer {{");
        let _ = writeln!(out, "rankdir=LR ;");

        let mut neurons: Vec<_> = self.neurons().collect();
        neurons.sort_by_key(|n| n.id());
        for neuron in neurons {
            let _ = writeln!(out, "{}", neuron.dot());
        }

        let mut synapses: Vec<_> = self.synapses().collect();
        synapses.sort_by_key(|s| s.id());
        for edge in synapses.into_iter().filter_map(|s| s.dot()) {
            let _ = writeln!(out, "{}", edge);
        }

        for output in self.outputs() {
            let _ = writeln!(out, "out{} [shape=plaintext, label=\"out\"] ;", output.0);
            let _ = writeln!(out, "{}:output -> out{} ;", output.0, output.0);
        }
        out.push_str("}\n");
        out
    }
}
