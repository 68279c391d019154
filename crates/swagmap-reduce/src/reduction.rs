//! Result types of a reduction run.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use swagmap_core::{CoverageView, Skill, SkillDescriptor};
use swagmap_index::SkillIndex;

use crate::engine;

/// Configuration for the reduction engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReductionConfig {
    /// Maximum number of scoring passes. `None` uses the size of the initial
    /// working set, which is always enough to converge.
    pub max_passes: Option<usize>,
}

impl ReductionConfig {
    /// Cap the number of scoring passes.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }
}

/// How one project in the working set stands against the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStanding {
    /// Skills on the view's side that are in the target set.
    pub relevant: BTreeSet<Skill>,

    /// Skills on the view's side outside the target set.
    pub irrelevant: BTreeSet<Skill>,

    /// Relevant skills bucketed by how many working projects hold them.
    pub overlap: BTreeMap<usize, BTreeSet<Skill>>,

    /// Share of the project's skills that are relevant; 0 without any.
    pub relevance: f64,

    /// Sum over buckets of (frequency - 1) * bucket size.
    pub redundancy: usize,

    /// Signed redundancy: positive when the project holds a unique skill.
    pub score: i64,
}

impl ProjectStanding {
    /// Whether some relevant skill is held by this project alone.
    pub fn has_unique_skill(&self) -> bool {
        self.overlap.contains_key(&1)
    }

    /// Relevant skills nobody else in the working set holds.
    pub fn unique_skills(&self) -> Option<&BTreeSet<Skill>> {
        self.overlap.get(&1)
    }

    /// Every skill on the view's side.
    pub fn breadth(&self) -> usize {
        self.relevant.len() + self.irrelevant.len()
    }
}

/// A project dropped from the working set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Removal {
    /// Name of the removed project.
    pub project: String,

    /// Its score when it was picked.
    pub score: i64,

    /// Pass number (starting at 1) within the run that removed it.
    pub pass: usize,

    /// Its overlap buckets when it was picked.
    pub overlap: BTreeMap<usize, BTreeSet<Skill>>,
}

/// Outcome of reducing a target skill set to a project subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reduction {
    pub(crate) view: CoverageView,
    pub(crate) selected: BTreeSet<String>,
    pub(crate) orphans: BTreeSet<Skill>,
    pub(crate) targets: BTreeSet<Skill>,
    pub(crate) standings: BTreeMap<String, ProjectStanding>,
    pub(crate) holders: BTreeMap<Skill, BTreeSet<String>>,
    pub(crate) removals: Vec<Removal>,
    pub(crate) initial_candidates: usize,
    pub(crate) passes: usize,
    pub(crate) converged: bool,
}

impl Reduction {
    pub(crate) fn new(view: CoverageView) -> Self {
        Self {
            view,
            selected: BTreeSet::new(),
            orphans: BTreeSet::new(),
            targets: BTreeSet::new(),
            standings: BTreeMap::new(),
            holders: BTreeMap::new(),
            removals: Vec::new(),
            initial_candidates: 0,
            passes: 0,
            converged: true,
        }
    }

    /// Add target skills and reduce again, starting from the projects kept
    /// so far. Projects removed earlier return only as candidates for the
    /// new skills.
    ///
    /// The removal log keeps growing; `passes` and `initial_candidates`
    /// describe the latest run.
    pub fn add_targets(
        &mut self,
        index: &SkillIndex,
        targets: impl Into<SkillDescriptor>,
        config: &ReductionConfig,
    ) {
        engine::refine(self, index, targets, config);
    }

    /// The view this reduction was computed under.
    pub fn view(&self) -> CoverageView {
        self.view
    }

    /// Projects left in the working set.
    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// Target skills no project covers.
    pub fn orphans(&self) -> &BTreeSet<Skill> {
        &self.orphans
    }

    /// Target skills at least one project covers.
    pub fn targets(&self) -> &BTreeSet<Skill> {
        &self.targets
    }

    /// Standing of a selected project in the final working set.
    pub fn standing(&self, project: &str) -> Option<&ProjectStanding> {
        self.standings.get(project)
    }

    /// Standings of every selected project.
    pub fn standings(&self) -> &BTreeMap<String, ProjectStanding> {
        &self.standings
    }

    /// Other selected projects that also hold `skill`.
    pub fn shared_with(&self, project: &str, skill: &Skill) -> Vec<&str> {
        self.holders
            .get(skill)
            .map(|holders| {
                holders
                    .iter()
                    .filter(|name| name.as_str() != project)
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Selected projects with their scores, highest score first.
    pub fn ranked(&self) -> Vec<(&str, i64)> {
        let mut ranked: Vec<(&str, i64)> = self
            .standings
            .iter()
            .map(|(name, standing)| (name.as_str(), standing.score))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    /// Projects removed, in removal order.
    pub fn removals(&self) -> &[Removal] {
        &self.removals
    }

    /// Size of the working set right after seeding.
    pub fn initial_candidates(&self) -> usize {
        self.initial_candidates
    }

    /// Number of scoring passes run.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// False when the pass cap stopped the run while removals were pending.
    pub fn is_converged(&self) -> bool {
        self.converged
    }

    /// Split into the selected projects and orphan skills.
    pub fn into_parts(self) -> (BTreeSet<String>, BTreeSet<Skill>) {
        (self.selected, self.orphans)
    }
}
