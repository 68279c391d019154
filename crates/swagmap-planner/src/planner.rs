//! Reinforced shortest-path curriculum planner.
//!
//! Starting from `{start, goal}`, each pass routes from the start to every
//! skill the current selection still needs, adds every vertex on those paths
//! and strengthens the edges it used. Strengthened edges are cheaper to
//! traverse, so later passes converge on projects that were already chosen.

use std::collections::BTreeSet;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use swagmap_core::{Result, Skill, SwagmapError};
use swagmap_index::SkillIndex;
use tracing::{debug, info, warn};

use crate::dijkstra::{Path, ShortestPaths};
use crate::graph::{CurriculumMap, EdgeKind, Vertex};
use crate::plan::{learning_order, CurriculumPlan, PlanStatus};

/// Configuration for the planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Maximum number of search passes before an emergency stop.
    pub max_passes: usize,

    /// Added to every provides edge of a project when it joins the plan.
    pub provides_reinforcement: f64,

    /// Added to every edge a chosen path traverses.
    pub path_reinforcement: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_passes: 10,
            provides_reinforcement: 10.0,
            path_reinforcement: 50.0,
        }
    }
}

impl PlannerConfig {
    /// Set the pass cap.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }
}

/// Outcome of a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Paths were added; `added` vertices joined the selection.
    Progressed { added: usize },
    /// The run is over.
    Finished(PlanStatus),
}

/// Plans curricula over one index.
pub struct PathPlanner<'a> {
    index: &'a SkillIndex,
    config: PlannerConfig,
}

impl<'a> PathPlanner<'a> {
    /// Create a planner with default configuration.
    pub fn new(index: &'a SkillIndex) -> Self {
        Self {
            index,
            config: PlannerConfig::default(),
        }
    }

    /// Create a planner with custom configuration.
    pub fn with_config(index: &'a SkillIndex, config: PlannerConfig) -> Self {
        Self { index, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PlannerConfig) {
        self.config = config;
    }

    /// Plan a curriculum reaching `goal`.
    ///
    /// With `start` the learner is taken to already know that skill: it is a
    /// search source alongside the start state and never needs a provider.
    pub fn plan(&self, goal: &str, start: Option<&str>) -> Result<CurriculumPlan> {
        let mut session = self.session(goal, start)?;
        loop {
            if let StepOutcome::Finished(_) = session.step() {
                return Ok(session.finish());
            }
        }
    }

    /// Prepare a run that can be advanced one pass at a time.
    pub fn session(&self, goal: &str, start: Option<&str>) -> Result<PlanningSession<'a>> {
        let goal = parse_single(goal)?;
        let known = start.map(parse_single).transpose()?;

        let mut map = CurriculumMap::build(self.index);
        let goal_node = map.skill_node(goal.clone());
        let mut sources = vec![map.start()];
        if let Some(known) = &known {
            sources.push(map.skill_node(known.clone()));
        }

        let selected: BTreeSet<NodeIndex> =
            sources.iter().copied().chain([goal_node]).collect();

        info!(
            "Planning a path to '{}' from {}",
            goal,
            known
                .as_ref()
                .map_or("no prior knowledge".to_string(), |s| format!("'{}'", s))
        );

        Ok(PlanningSession {
            index: self.index,
            config: self.config.clone(),
            map,
            goal: goal_node,
            sources,
            known,
            selected,
            unreachable: BTreeSet::new(),
            passes: 0,
            status: None,
        })
    }
}

fn parse_single(descriptor: &str) -> Result<Skill> {
    Skill::parse_one(descriptor).ok_or_else(|| SwagmapError::EmptyGoal {
        descriptor: descriptor.to_string(),
    })
}

/// A planning run in progress.
///
/// Edge weights only increase and the selection only grows.
pub struct PlanningSession<'a> {
    index: &'a SkillIndex,
    config: PlannerConfig,
    map: CurriculumMap,
    goal: NodeIndex,
    sources: Vec<NodeIndex>,
    known: Option<Skill>,
    selected: BTreeSet<NodeIndex>,
    unreachable: BTreeSet<NodeIndex>,
    passes: usize,
    status: Option<PlanStatus>,
}

impl<'a> PlanningSession<'a> {
    /// Run one pass.
    pub fn step(&mut self) -> StepOutcome {
        if let Some(status) = self.status {
            return StepOutcome::Finished(status);
        }

        let open = self.open_targets();
        if open.is_empty() {
            let status = if self.unreachable.is_empty() {
                PlanStatus::Complete
            } else {
                PlanStatus::Stalled
            };
            return self.finish_with(status);
        }
        if self.passes >= self.config.max_passes {
            warn!(
                "Emergency stop after {} passes with {} requirement(s) still open",
                self.passes,
                open.len()
            );
            return self.finish_with(PlanStatus::PassCapReached);
        }

        self.passes += 1;
        let paths = ShortestPaths::search(self.map.graph(), &self.sources);
        let mut found = Vec::new();
        for target in open {
            match paths.path_to(self.map.graph(), target) {
                Some(path) => found.push(path),
                None => {
                    warn!("No path from the start to {}", self.map.graph()[target]);
                    self.unreachable.insert(target);
                }
            }
        }

        let mut added = 0;
        for path in &found {
            added += self.apply(path);
        }
        debug!(
            "Pass {}: {} path(s), {} vertex(es) added",
            self.passes,
            found.len(),
            added
        );
        StepOutcome::Progressed { added }
    }

    /// Finish the run and build the plan.
    pub fn finish(mut self) -> CurriculumPlan {
        while self.status.is_none() {
            self.step();
        }
        let status = self.status.unwrap_or(PlanStatus::PassCapReached);

        let projects: BTreeSet<String> = self
            .selected
            .iter()
            .filter_map(|&node| self.map.graph()[node].project())
            .map(str::to_string)
            .collect();
        let order = learning_order(self.index, &projects);
        let unreachable = self
            .unreachable
            .iter()
            .filter_map(|&node| self.map.graph()[node].skill())
            .cloned()
            .collect();

        info!(
            "Plan {:?} after {} pass(es): {} project(s)",
            status,
            self.passes,
            order.len()
        );

        CurriculumPlan {
            map: self.map,
            goal: self.goal,
            selected: self.selected,
            order,
            unreachable,
            status,
            passes: self.passes,
        }
    }

    /// Vertices selected so far.
    pub fn selected(&self) -> &BTreeSet<NodeIndex> {
        &self.selected
    }

    /// The graph with its current weights.
    pub fn map(&self) -> &CurriculumMap {
        &self.map
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    fn finish_with(&mut self, status: PlanStatus) -> StepOutcome {
        self.status = Some(status);
        StepOutcome::Finished(status)
    }

    /// Skill vertices the selection still needs: selected skills nobody
    /// selected teaches, plus requirements of selected projects that are
    /// not selected yet or that nobody selected teaches. Known and
    /// unreachable skills are left out.
    fn open_targets(&self) -> BTreeSet<NodeIndex> {
        let graph = self.map.graph();
        let mut satisfied: BTreeSet<&Skill> = self.known.iter().collect();
        for &node in &self.selected {
            if let Vertex::Project(name) = &graph[node] {
                satisfied.extend(self.index.skills_provided_by(name));
            }
        }

        let mut open = BTreeSet::new();
        for &node in &self.selected {
            match &graph[node] {
                Vertex::Skill(skill) if !satisfied.contains(skill) => {
                    open.insert(node);
                }
                Vertex::Project(name) => {
                    for skill in self.index.skills_required_by(name) {
                        let Some(target) = self.map.skill(skill) else {
                            continue;
                        };
                        if !self.selected.contains(&target) || !satisfied.contains(skill) {
                            open.insert(target);
                        }
                    }
                }
                _ => {}
            }
        }

        open.retain(|node| !self.unreachable.contains(node));
        open
    }

    /// Add a path to the selection and reinforce its edges. Returns the
    /// number of newly selected vertices.
    fn apply(&mut self, path: &Path) -> usize {
        let mut added = 0;
        for &node in &path.vertices {
            if !self.selected.insert(node) {
                continue;
            }
            added += 1;
            if self.map.graph()[node].is_project() {
                for edge in self.map.outgoing(node, EdgeKind::Provides) {
                    self.map.graph[edge].reinforce(self.config.provides_reinforcement);
                }
            }
        }
        for &edge in &path.edges {
            self.map.graph[edge].reinforce(self.config.path_reinforcement);
        }
        debug!(
            "Path to {} via {} edge(s), cost {:.3}",
            self.map.graph()[*path.vertices.last().unwrap_or(&self.goal)],
            path.edges.len(),
            path.cost
        );
        added
    }
}

/// Plan a curriculum with a given pass cap.
pub fn plan_path_to(
    index: &SkillIndex,
    goal: &str,
    start: Option<&str>,
    max_passes: usize,
) -> Result<CurriculumPlan> {
    let config = PlannerConfig::default().with_max_passes(max_passes);
    PathPlanner::with_config(index, config).plan(goal, start)
}
