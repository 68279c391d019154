//! Multi-source shortest paths over the curriculum graph.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::graph::CurriculumGraph;

/// Entry in the search frontier.
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    /// Cost from the nearest source.
    cost: f64,
    node: NodeIndex,
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap; equal costs pop the lower index first.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A path found by the search.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Vertices from source to target, both included.
    pub vertices: Vec<NodeIndex>,
    /// Edges traversed, in order.
    pub edges: Vec<EdgeIndex>,
    /// Total traversal cost.
    pub cost: f64,
}

/// Distances and predecessor edges from one search.
#[derive(Debug, Clone, Default)]
pub struct ShortestPaths {
    distances: HashMap<NodeIndex, f64>,
    predecessors: HashMap<NodeIndex, EdgeIndex>,
}

impl ShortestPaths {
    /// Run Dijkstra from every source at once.
    pub fn search(graph: &CurriculumGraph, sources: &[NodeIndex]) -> Self {
        let mut paths = Self::default();
        let mut frontier = BinaryHeap::new();
        let mut settled = HashSet::new();

        for &source in sources {
            paths.distances.insert(source, 0.0);
            frontier.push(SearchNode {
                cost: 0.0,
                node: source,
            });
        }

        while let Some(current) = frontier.pop() {
            if !settled.insert(current.node) {
                continue;
            }

            for edge in graph.edges(current.node) {
                let next = edge.target();
                if settled.contains(&next) {
                    continue;
                }
                let cost = current.cost + edge.weight().cost();
                let better = paths
                    .distances
                    .get(&next)
                    .map_or(true, |&known| cost < known);
                if better {
                    paths.distances.insert(next, cost);
                    paths.predecessors.insert(next, edge.id());
                    frontier.push(SearchNode { cost, node: next });
                }
            }
        }

        paths
    }

    /// Cost to reach `target`, if reachable.
    pub fn distance(&self, target: NodeIndex) -> Option<f64> {
        self.distances.get(&target).copied()
    }

    /// Walk predecessor edges back from `target` to its source.
    pub fn path_to(&self, graph: &CurriculumGraph, target: NodeIndex) -> Option<Path> {
        let cost = self.distance(target)?;
        let mut vertices = vec![target];
        let mut edges = Vec::new();
        let mut current = target;

        while let Some(&edge) = self.predecessors.get(&current) {
            let (from, _) = graph.edge_endpoints(edge)?;
            edges.push(edge);
            vertices.push(from);
            current = from;
        }

        vertices.reverse();
        edges.reverse();
        Some(Path {
            vertices,
            edges,
            cost,
        })
    }
}
