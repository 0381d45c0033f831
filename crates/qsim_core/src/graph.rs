//! Weighted problem graph for QSIM
//!
//! Gantree: L0_Foundation → Graph
//!
//! Undirected simple graph with a positive weight on every edge. Each node
//! becomes one qubit of the QAOA register. Nodes keep insertion order, which
//! defines the default node → qubit mapping.

use crate::error::{QsimError, QsimResult};
use crate::types::{NodeId, QubitId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Parity of the node degrees of a graph
/// Gantree: DegreeParity // 차수 홀짝성
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegreeParity {
    /// Every node has even degree
    Even,
    /// Every node has odd degree
    Odd,
    /// Degrees of both parities
    Mixed,
}

/// Weighted undirected graph
/// Gantree: Graph // 가중 그래프
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Graph {
    /// Nodes in insertion order
    nodes: Vec<NodeId>,

    /// Edges as (u, v, weight), one entry per unordered pair
    edges: Vec<(NodeId, NodeId, f64)>,

    /// Optional graph name
    name: Option<String>,
}

impl Graph {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from weighted edges
    pub fn from_edges(edges: &[(NodeId, NodeId, f64)]) -> QsimResult<Self> {
        let mut graph = Self::new();
        for &(u, v, w) in edges {
            graph.add_edge(u, v, w)?;
        }
        Ok(graph)
    }

    /// Create an unweighted ring 0-1-...-(n-1)-0
    pub fn ring(n: usize) -> Self {
        let mut graph = Self::new();
        for i in 0..n {
            graph.add_node(i);
        }
        if n > 2 {
            for i in 0..n {
                graph.edges.push((i, (i + 1) % n, 1.0));
            }
        } else if n == 2 {
            graph.edges.push((0, 1, 1.0));
        }
        graph.name = Some(format!("ring_{}", n));
        graph
    }

    /// Create an unweighted complete graph
    pub fn complete(n: usize) -> Self {
        let mut graph = Self::new();
        for i in 0..n {
            graph.add_node(i);
        }
        for i in 0..n {
            for j in i + 1..n {
                graph.edges.push((i, j, 1.0));
            }
        }
        graph.name = Some(format!("complete_{}", n));
        graph
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Add an isolated node (no-op if present)
    pub fn add_node(&mut self, node: NodeId) {
        if !self.nodes.contains(&node) {
            self.nodes.push(node);
        }
    }

    /// Add a weighted edge; re-adding an existing edge updates its weight
    /// Gantree: add_edge(u,v,w) -> Result // 간선 추가
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, weight: f64) -> QsimResult<()> {
        if u == v {
            return Err(QsimError::InvalidGraph(format!("self loop on node {}", u)));
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(QsimError::InvalidGraph(format!(
                "edge ({}, {}) has weight {}: must be positive and finite",
                u, v, weight
            )));
        }

        self.add_node(u);
        self.add_node(v);

        if let Some(edge) = self
            .edges
            .iter_mut()
            .find(|(a, b, _)| (*a == u && *b == v) || (*a == v && *b == u))
        {
            edge.2 = weight;
        } else {
            self.edges.push((u, v, weight));
        }
        Ok(())
    }

    /// Set graph name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Number of nodes (= qubits)
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Weighted edges
    pub fn edges(&self) -> &[(NodeId, NodeId, f64)] {
        &self.edges
    }

    /// Graph name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check if a node exists
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Weight of edge (u, v), if present
    pub fn weight(&self, u: NodeId, v: NodeId) -> Option<f64> {
        self.edges
            .iter()
            .find(|(a, b, _)| (*a == u && *b == v) || (*a == v && *b == u))
            .map(|&(_, _, w)| w)
    }

    /// Sum of all edge weights
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|&(_, _, w)| w).sum()
    }

    /// Check if every edge has weight exactly 1
    pub fn is_unit_weight(&self) -> bool {
        self.edges.iter().all(|&(_, _, w)| w == 1.0)
    }

    /// Check if every edge weight is an integer
    pub fn is_integer_weight(&self) -> bool {
        self.edges.iter().all(|&(_, _, w)| w.fract() == 0.0)
    }

    // ========================================================================
    // Connectivity Queries
    // ========================================================================

    /// Sorted neighbors of a node
    pub fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        let mut neighbors = HashSet::new();

        for &(u, v, _) in &self.edges {
            if u == node {
                neighbors.insert(v);
            }
            if v == node {
                neighbors.insert(u);
            }
        }

        let mut result: Vec<_> = neighbors.into_iter().collect();
        result.sort_unstable();
        result
    }

    /// Number of incident edges
    pub fn degree(&self, node: NodeId) -> usize {
        self.edges
            .iter()
            .filter(|&&(u, v, _)| u == node || v == node)
            .count()
    }

    /// Whether all nodes have even degree, all odd, or neither
    /// Gantree: degree_parity() -> DegreeParity // 홀짝 판정
    pub fn degree_parity(&self) -> DegreeParity {
        let parities: Vec<usize> = self.nodes.iter().map(|&n| self.degree(n) % 2).collect();

        if parities.iter().all(|&p| p == 0) {
            DegreeParity::Even
        } else if parities.iter().all(|&p| p == 1) {
            DegreeParity::Odd
        } else {
            DegreeParity::Mixed
        }
    }

    // ========================================================================
    // Node → Qubit Mapping
    // ========================================================================

    /// Map each node to its position in insertion order
    pub fn default_index_map(&self) -> HashMap<NodeId, QubitId> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, &node)| (node, i))
            .collect()
    }

    /// Validate an explicit node → qubit map, or build the default one
    ///
    /// An explicit map must cover every node with distinct indices in `0..N`.
    pub fn resolve_index_map(
        &self,
        map: Option<&HashMap<NodeId, QubitId>>,
    ) -> QsimResult<HashMap<NodeId, QubitId>> {
        let Some(map) = map else {
            return Ok(self.default_index_map());
        };

        let n = self.num_nodes();
        let mut seen = vec![false; n];

        for &node in &self.nodes {
            let index = *map.get(&node).ok_or(QsimError::UnmappedNode(node))?;
            if index >= n {
                return Err(QsimError::QubitOutOfRange {
                    qubit: index,
                    max: n.saturating_sub(1),
                });
            }
            if seen[index] {
                return Err(QsimError::DuplicateQubit(index));
            }
            seen[index] = true;
        }

        Ok(self
            .nodes
            .iter()
            .map(|node| (*node, map[node]))
            .collect())
    }
}

// ============================================================================
// Display
// ============================================================================

impl std::fmt::Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Graph({} nodes, {} edges{})",
            self.num_nodes(),
            self.num_edges(),
            self.name
                .as_ref()
                .map(|n| format!(", {}", n))
                .unwrap_or_default()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
