//! The curriculum graph: start state, skills and projects.

use std::collections::BTreeMap;
use std::fmt;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use swagmap_core::Skill;
use swagmap_index::SkillIndex;

/// Directed graph of curriculum vertices with reinforceable edges.
pub type CurriculumGraph = DiGraph<Vertex, Edge>;

/// A vertex of the curriculum graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum Vertex {
    /// The learner's starting point: no prior knowledge.
    Start,
    /// A skill.
    Skill(Skill),
    /// A project, by name.
    Project(String),
}

impl Vertex {
    pub fn is_project(&self) -> bool {
        matches!(self, Vertex::Project(_))
    }

    /// The project name, if this is a project vertex.
    pub fn project(&self) -> Option<&str> {
        match self {
            Vertex::Project(name) => Some(name),
            _ => None,
        }
    }

    /// The skill, if this is a skill vertex.
    pub fn skill(&self) -> Option<&Skill> {
        match self {
            Vertex::Skill(skill) => Some(skill),
            _ => None,
        }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vertex::Start => f.write_str("(start)"),
            Vertex::Skill(skill) => write!(f, "skill {}", skill),
            Vertex::Project(name) => write!(f, "project {}", name),
        }
    }
}

/// Relation an edge stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// skill -> project needing it.
    Requires,
    /// project -> skill it teaches.
    Provides,
    /// project -> parent project.
    Extends,
    /// start -> project that needs nothing.
    Entry,
}

/// Edge payload: its kind and a weight that only grows during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub kind: EdgeKind,
    pub weight: f64,
}

impl Edge {
    fn new(kind: EdgeKind) -> Self {
        Self { kind, weight: 0.0 }
    }

    /// Search cost of traversing this edge. Shrinks as the weight grows so
    /// reinforced edges are preferred.
    pub fn cost(&self) -> f64 {
        1.0 / (1.0 + self.weight)
    }

    /// Increase the weight. Negative amounts are ignored.
    pub fn reinforce(&mut self, amount: f64) {
        if amount > 0.0 {
            self.weight += amount;
        }
    }
}

/// The graph plus lookups from names to vertices.
#[derive(Debug, Clone)]
pub struct CurriculumMap {
    pub(crate) graph: CurriculumGraph,
    pub(crate) start: NodeIndex,
    pub(crate) skills: BTreeMap<Skill, NodeIndex>,
    pub(crate) projects: BTreeMap<String, NodeIndex>,
}

impl CurriculumMap {
    /// Build the full graph of a catalogue, every edge at weight zero.
    ///
    /// Requires edges follow each project's effective requirements, so a
    /// project that inherits a prerequisite is entered through it. Provides
    /// edges follow declared skills only; inherited ones are reached through
    /// the extends edges.
    pub fn build(index: &SkillIndex) -> Self {
        let mut map = Self {
            graph: CurriculumGraph::new(),
            start: NodeIndex::end(),
            skills: BTreeMap::new(),
            projects: BTreeMap::new(),
        };
        map.start = map.graph.add_node(Vertex::Start);

        for name in index.project_names() {
            let node = map.graph.add_node(Vertex::Project(name.to_string()));
            map.projects.insert(name.to_string(), node);
        }

        for (name, definition) in index.catalogue() {
            let project = map.projects[name];

            for skill in index.skills_required_by(name) {
                let node = map.skill_node(skill.clone());
                map.graph.add_edge(node, project, Edge::new(EdgeKind::Requires));
            }
            for skill in definition.declared_provides() {
                let node = map.skill_node(skill);
                map.graph.add_edge(project, node, Edge::new(EdgeKind::Provides));
            }
            for parent in definition.parents() {
                if let Some(&parent) = map.projects.get(parent) {
                    map.graph.add_edge(project, parent, Edge::new(EdgeKind::Extends));
                }
            }
            if index.skills_required_by(name).is_empty() {
                map.graph
                    .add_edge(map.start, project, Edge::new(EdgeKind::Entry));
            }
        }

        map
    }

    /// Vertex of a skill, added unconnected if the catalogue never names it.
    pub fn skill_node(&mut self, skill: Skill) -> NodeIndex {
        if let Some(&node) = self.skills.get(&skill) {
            return node;
        }
        let node = self.graph.add_node(Vertex::Skill(skill.clone()));
        self.skills.insert(skill, node);
        node
    }

    pub fn graph(&self) -> &CurriculumGraph {
        &self.graph
    }

    /// The start vertex.
    pub fn start(&self) -> NodeIndex {
        self.start
    }

    /// Vertex of a skill, if present.
    pub fn skill(&self, skill: &Skill) -> Option<NodeIndex> {
        self.skills.get(skill).copied()
    }

    /// Vertex of a project, if present.
    pub fn project(&self, name: &str) -> Option<NodeIndex> {
        self.projects.get(name).copied()
    }

    /// Outgoing edges of one kind.
    pub(crate) fn outgoing(&self, node: NodeIndex, kind: EdgeKind) -> Vec<EdgeIndex> {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .filter(|edge| edge.weight().kind == kind)
            .map(|edge| edge.id())
            .collect()
    }

    /// Weight of the first edge from `from` to `to`, if any.
    pub fn weight_between(&self, from: NodeIndex, to: NodeIndex) -> Option<f64> {
        self.graph
            .find_edge(from, to)
            .and_then(|edge| self.graph.edge_weight(edge))
            .map(|edge| edge.weight)
    }
}
