//! Result of a planning run.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use swagmap_core::Skill;
use swagmap_index::SkillIndex;

use crate::graph::{CurriculumGraph, CurriculumMap, Edge, Vertex};

/// How a planning run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Every requirement of every selected project is met.
    Complete,
    /// Nothing left to route to, but some targets have no path from the start.
    Stalled,
    /// The pass cap was hit with requirements still open.
    PassCapReached,
}

/// An ordered curriculum from the start state to a goal skill.
#[derive(Debug, Clone)]
pub struct CurriculumPlan {
    pub(crate) map: CurriculumMap,
    pub(crate) goal: NodeIndex,
    pub(crate) selected: BTreeSet<NodeIndex>,
    pub(crate) order: Vec<String>,
    pub(crate) unreachable: BTreeSet<Skill>,
    pub(crate) status: PlanStatus,
    pub(crate) passes: usize,
}

impl CurriculumPlan {
    pub fn status(&self) -> PlanStatus {
        self.status
    }

    /// True when the plan met every requirement within the pass cap.
    pub fn is_complete(&self) -> bool {
        self.status == PlanStatus::Complete
    }

    /// Number of search passes run.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Skills that could not be reached from the start.
    pub fn unreachable(&self) -> &BTreeSet<Skill> {
        &self.unreachable
    }

    /// Selected projects, prerequisites first.
    pub fn projects(&self) -> &[String] {
        &self.order
    }

    /// Selected skills in lexicographic order.
    pub fn skills(&self) -> Vec<&Skill> {
        let mut skills: Vec<&Skill> = self
            .selected_vertices()
            .filter_map(|(_, vertex)| vertex.skill())
            .collect();
        skills.sort();
        skills
    }

    pub fn contains_project(&self, name: &str) -> bool {
        self.map
            .project(name)
            .map_or(false, |node| self.selected.contains(&node))
    }

    pub fn contains_skill(&self, skill: &Skill) -> bool {
        self.map
            .skill(skill)
            .map_or(false, |node| self.selected.contains(&node))
    }

    /// The whole graph with its final weights.
    pub fn graph(&self) -> &CurriculumGraph {
        self.map.graph()
    }

    /// Name lookups into the graph.
    pub fn map(&self) -> &CurriculumMap {
        &self.map
    }

    /// The goal vertex.
    pub fn goal(&self) -> NodeIndex {
        self.goal
    }

    /// Selected vertex indices.
    pub fn selected(&self) -> &BTreeSet<NodeIndex> {
        &self.selected
    }

    /// Selected vertices with their indices.
    pub fn selected_vertices(&self) -> impl Iterator<Item = (NodeIndex, &Vertex)> {
        self.selected
            .iter()
            .map(move |&node| (node, &self.map.graph()[node]))
    }

    /// Edges whose endpoints are both selected.
    pub fn selected_edges(&self) -> Vec<(NodeIndex, NodeIndex, &Edge)> {
        self.map
            .graph()
            .edge_references()
            .filter(|edge| {
                self.selected.contains(&edge.source()) && self.selected.contains(&edge.target())
            })
            .map(|edge| (edge.source(), edge.target(), edge.weight()))
            .collect()
    }
}

/// Order selected projects so that providers come before the projects
/// requiring what they teach. Ties go by name; a dependency cycle is broken
/// by taking the smallest remaining name.
///
/// `petgraph::algo::toposort` fails on cycles and leaves ties in index
/// order, so this runs Kahn's algorithm over name-keyed maps instead.
pub(crate) fn learning_order(index: &SkillIndex, projects: &BTreeSet<String>) -> Vec<String> {
    let mut dependencies: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for project in projects {
        let needs = dependencies.entry(project.as_str()).or_default();
        for skill in index.skills_required_by(project) {
            for provider in projects {
                if provider != project && index.skills_provided_by(provider).contains(skill) {
                    needs.insert(provider.as_str());
                }
            }
        }
    }

    let mut order = Vec::with_capacity(projects.len());
    while !dependencies.is_empty() {
        let next = dependencies
            .iter()
            .find(|(_, needs)| needs.is_empty())
            .map(|(name, _)| *name)
            .or_else(|| dependencies.keys().next().copied());
        let Some(next) = next else {
            break;
        };
        dependencies.remove(next);
        for needs in dependencies.values_mut() {
            needs.remove(next);
        }
        order.push(next.to_string());
    }
    order
}
