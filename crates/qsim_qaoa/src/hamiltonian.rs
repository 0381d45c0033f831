//! Diagonal cost Hamiltonian
//!
//! Gantree: L3_Qaoa → CostHamiltonian
//!
//! `H_C = Σ_⟨ij⟩ w_ij Z_i Z_j (+ Σ_i h_i Z_i)` stored as its diagonal over the
//! computational basis. Basis state `z` has value
//! `Σ w_ij (-1)^{z_i + z_j} + Σ h_i (-1)^{z_i}`.
//!
//! Without linear terms `H_C` commutes with the global flip `X^{⊗N}`, so the
//! register can be reduced to the `2^{N-1}` basis states with the top qubit at
//! 0 (Z2 reduction). The reduction is a ket-only optimization.

use qsim_core::{DegreeParity, Graph, NodeId, QsimError, QsimResult, QubitId};
use std::collections::HashMap;

/// Cost Hamiltonian diagonal for one graph
/// Gantree: CostHamiltonian // 비용 해밀토니안
#[derive(Debug, Clone, PartialEq)]
pub struct CostHamiltonian {
    /// Diagonal over the simulated register (full or Z2-reduced)
    diagonal: Vec<f64>,

    /// Qubits of the full problem
    num_qubits: usize,

    /// Register keeps only states with qubit N-1 at 0
    z2_reduced: bool,

    /// Single-qubit Z terms present
    has_linear_terms: bool,

    /// Degree parity of the source graph
    degree_parity: DegreeParity,
}

impl CostHamiltonian {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Full diagonal for `Σ w_ij Z_i Z_j`
    /// Gantree: from_graph(graph,map) -> Result<Self> // 해밀토니안 생성
    pub fn from_graph(
        graph: &Graph,
        index_map: Option<&HashMap<NodeId, QubitId>>,
    ) -> QsimResult<Self> {
        Self::build(graph, index_map, &HashMap::new(), false)
    }

    /// Z2-reduced diagonal (first `2^{N-1}` basis states)
    pub fn from_graph_z2(
        graph: &Graph,
        index_map: Option<&HashMap<NodeId, QubitId>>,
    ) -> QsimResult<Self> {
        Self::build(graph, index_map, &HashMap::new(), true)
    }

    /// Full diagonal with linear fields `Σ h_i Z_i`
    pub fn with_fields(
        graph: &Graph,
        index_map: Option<&HashMap<NodeId, QubitId>>,
        fields: &HashMap<NodeId, f64>,
    ) -> QsimResult<Self> {
        Self::build(graph, index_map, fields, false)
    }

    fn build(
        graph: &Graph,
        index_map: Option<&HashMap<NodeId, QubitId>>,
        fields: &HashMap<NodeId, f64>,
        z2: bool,
    ) -> QsimResult<Self> {
        let num_qubits = graph.num_nodes();
        if num_qubits == 0 {
            return Err(QsimError::InvalidGraph("graph has no nodes".into()));
        }
        if num_qubits >= usize::BITS as usize {
            return Err(QsimError::InvalidGraph(format!(
                "{} nodes exceed the addressable register",
                num_qubits
            )));
        }

        let has_linear_terms = fields.values().any(|&h| h != 0.0);
        if z2 && has_linear_terms {
            return Err(QsimError::config(
                "Z2 reduction requires a Hamiltonian without linear terms",
            ));
        }
        if z2 && num_qubits < 2 {
            return Err(QsimError::config("Z2 reduction needs at least two qubits"));
        }

        let map = graph.resolve_index_map(index_map)?;
        let edges: Vec<(usize, usize, f64)> = graph
            .edges()
            .iter()
            .map(|&(u, v, w)| (map[&u], map[&v], w))
            .collect();
        let mut linear = Vec::with_capacity(fields.len());
        for (node, &h) in fields {
            let qubit = *map.get(node).ok_or(QsimError::UnmappedNode(*node))?;
            linear.push((qubit, h));
        }

        let len = if z2 {
            1usize << (num_qubits - 1)
        } else {
            1usize << num_qubits
        };

        let diagonal = (0..len)
            .map(|z| {
                let quadratic: f64 = edges
                    .iter()
                    .map(|&(i, j, w)| if ((z >> i) ^ (z >> j)) & 1 == 0 { w } else { -w })
                    .sum();
                let field: f64 = linear
                    .iter()
                    .map(|&(i, h)| if (z >> i) & 1 == 0 { h } else { -h })
                    .sum();
                quadratic + field
            })
            .collect();

        Ok(Self {
            diagonal,
            num_qubits,
            z2_reduced: z2,
            has_linear_terms,
            degree_parity: graph.degree_parity(),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Diagonal over the simulated register
    pub fn diagonal(&self) -> &[f64] {
        &self.diagonal
    }

    /// Qubits of the full problem
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Qubits actually simulated (`N - 1` when Z2-reduced)
    pub fn register_qubits(&self) -> usize {
        if self.z2_reduced {
            self.num_qubits - 1
        } else {
            self.num_qubits
        }
    }

    /// Check if the register is Z2-reduced
    pub fn is_z2_reduced(&self) -> bool {
        self.z2_reduced
    }

    /// Check for single-qubit Z terms
    pub fn has_linear_terms(&self) -> bool {
        self.has_linear_terms
    }

    /// Degree parity of the source graph
    pub fn degree_parity(&self) -> DegreeParity {
        self.degree_parity
    }

    /// Lowest cost over all basis states
    pub fn min_cost(&self) -> f64 {
        self.diagonal.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Highest cost over all basis states
    pub fn max_cost(&self) -> f64 {
        self.diagonal.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Diagonal over all `2^N` basis states (mirrors a reduced diagonal)
    pub fn to_full(&self) -> Vec<f64> {
        if !self.z2_reduced {
            return self.diagonal.clone();
        }
        let dim = 1usize << self.num_qubits;
        let half = dim / 2;
        (0..dim)
            .map(|z| {
                if z < half {
                    self.diagonal[z]
                } else {
                    self.diagonal[z ^ (dim - 1)]
                }
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_graphs::six_node_graph;

    #[test]
    fn test_single_edge() {
        let graph = Graph::from_edges(&[(0, 1, 2.5)]).unwrap();
        let h = CostHamiltonian::from_graph(&graph, None).unwrap();
        assert_eq!(h.diagonal(), &[2.5, -2.5, -2.5, 2.5]);
    }

    #[test]
    fn test_six_node_extremes() {
        let h = CostHamiltonian::from_graph(&six_node_graph(), None).unwrap();
        assert_eq!(h.diagonal().len(), 64);
        assert_eq!(h.min_cost(), -5.0);
        assert_eq!(h.max_cost(), 9.0);
        assert_eq!(h.degree_parity(), DegreeParity::Odd);
    }

    #[test]
    fn test_z2_mirrors_full() {
        let graph = six_node_graph();
        let full = CostHamiltonian::from_graph(&graph, None).unwrap();
        let reduced = CostHamiltonian::from_graph_z2(&graph, None).unwrap();

        assert_eq!(reduced.diagonal().len(), 32);
        assert_eq!(reduced.register_qubits(), 5);
        assert_eq!(reduced.to_full(), full.diagonal());
        assert_eq!(reduced.min_cost(), full.min_cost());
        assert_eq!(reduced.max_cost(), full.max_cost());
    }

    #[test]
    fn test_index_map_relabels_qubits() {
        let graph = Graph::from_edges(&[(10, 20, 1.0)]).unwrap();
        let mut fields = HashMap::new();
        fields.insert(20, 0.5);

        let mut map = HashMap::new();
        map.insert(10, 1);
        map.insert(20, 0);
        let h = CostHamiltonian::with_fields(&graph, Some(&map), &fields).unwrap();

        // node 20 is qubit 0: z = 0b01 flips it
        assert_eq!(h.diagonal(), &[1.5, -1.5, -0.5, 0.5]);
        assert!(h.has_linear_terms());
    }

    #[test]
    fn test_z2_rejects_linear_terms() {
        let graph = Graph::from_edges(&[(0, 1, 1.0)]).unwrap();
        let mut fields = HashMap::new();
        fields.insert(0, 1.0);
        let err = CostHamiltonian::build(&graph, None, &fields, true).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_empty_graph_rejected() {
        assert!(matches!(
            CostHamiltonian::from_graph(&Graph::new(), None),
            Err(QsimError::InvalidGraph(_))
        ));
    }

    #[test]
    fn test_bad_index_map() {
        let graph = Graph::from_edges(&[(0, 1, 1.0)]).unwrap();
        let mut map = HashMap::new();
        map.insert(0, 0);
        assert_eq!(
            CostHamiltonian::from_graph(&graph, Some(&map)),
            Err(QsimError::UnmappedNode(1))
        );
    }
}
