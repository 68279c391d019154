//! Resolver tying the index, the reduction engine and the planner together.

use swagmap_core::{Catalogue, CoverageView, Result, SkillDescriptor};
use swagmap_index::SkillIndex;
use swagmap_planner::{CurriculumPlan, PathPlanner, PlannerConfig};
use swagmap_reduce::{reduce, Reduction, ReductionConfig};
use tracing::debug;

/// Answers curriculum questions over one catalogue.
///
/// The resolver owns its index; runs only read it, so a resolver can be
/// shared between threads once built.
#[derive(Debug, Clone)]
pub struct Resolver {
    index: SkillIndex,
    reduction: ReductionConfig,
    planner: PlannerConfig,
}

impl Resolver {
    /// Index a catalogue with default configuration.
    pub fn new(catalogue: Catalogue) -> Result<Self> {
        Ok(Self {
            index: SkillIndex::new(catalogue)?,
            reduction: ReductionConfig::default(),
            planner: PlannerConfig::default(),
        })
    }

    /// Use a custom reduction configuration.
    pub fn with_reduction_config(mut self, config: ReductionConfig) -> Self {
        self.reduction = config;
        self
    }

    /// Use a custom planner configuration.
    pub fn with_planner_config(mut self, config: PlannerConfig) -> Self {
        self.planner = config;
        self
    }

    /// Merge more projects into the catalogue and reindex.
    pub fn add_projects(&mut self, catalogue: Catalogue) -> Result<()> {
        self.index.add_projects(catalogue)
    }

    pub fn index(&self) -> &SkillIndex {
        &self.index
    }

    /// The fewest projects that together assess the target skills.
    pub fn assessments_for(&self, targets: impl Into<SkillDescriptor>) -> Reduction {
        reduce(&self.index, targets, CoverageView::Assessment, &self.reduction)
    }

    /// The fewest projects that together teach the target skills.
    pub fn lessons_for(&self, targets: impl Into<SkillDescriptor>) -> Reduction {
        reduce(&self.index, targets, CoverageView::Teaching, &self.reduction)
    }

    /// Extend an earlier reduction with more target skills.
    pub fn add_targets(&self, reduction: &mut Reduction, targets: impl Into<SkillDescriptor>) {
        reduction.add_targets(&self.index, targets, &self.reduction);
    }

    /// An ordered curriculum from `start` (or no prior knowledge) to `goal`.
    ///
    /// `max_passes` overrides the configured pass cap for this run.
    pub fn plan_path_to(
        &self,
        goal: &str,
        start: Option<&str>,
        max_passes: Option<usize>,
    ) -> Result<CurriculumPlan> {
        let mut config = self.planner.clone();
        if let Some(max_passes) = max_passes {
            config.max_passes = max_passes;
        }
        debug!("Planning with {:?}", config);
        PathPlanner::with_config(&self.index, config).plan(goal, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use swagmap_core::{catalogue_from_json, Skill, SwagmapError};
    use swagmap_planner::PlanStatus;

    fn resolver(catalogue: serde_json::Value) -> Resolver {
        Resolver::new(catalogue_from_json(catalogue).unwrap()).unwrap()
    }

    fn skill(descriptor: &str) -> Skill {
        Skill::parse_one(descriptor).unwrap()
    }

    fn names(reduction: &Reduction) -> Vec<&str> {
        reduction.selected().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_provider_and_assessor() {
        let resolver = resolver(json!({
            "A": { "provides": ["x"], "requires": [] },
            "B": { "requires": ["x"] }
        }));

        assert_eq!(names(&resolver.assessments_for("x")), vec!["B"]);
        assert_eq!(names(&resolver.lessons_for("x")), vec!["A"]);
    }

    #[test]
    fn test_broader_provider_wins() {
        let resolver = resolver(json!({
            "A": { "provides": ["x", "y"] },
            "B": { "provides": ["x"] },
            "C": { "requires": ["x"] }
        }));

        let lessons = resolver.lessons_for("x");
        assert_eq!(names(&lessons), vec!["A"]);
        assert_eq!(lessons.removals()[0].project, "B");
    }

    #[test]
    fn test_orphan_target() {
        let resolver = resolver(json!({
            "A": { "provides": ["x"] },
            "B": { "requires": ["x"] }
        }));

        for reduction in [resolver.assessments_for("x, z"), resolver.lessons_for("x, z")] {
            assert!(reduction.orphans().contains(&skill("z")));
            assert_eq!(reduction.selected().len(), 1);
        }
        let only_orphan = resolver.assessments_for("z");
        assert!(only_orphan.selected().is_empty());
    }

    #[test]
    fn test_extend_earlier_lessons() {
        let resolver = resolver(json!({
            "A": { "provides": ["x", "y"] },
            "B": { "provides": ["x"] },
            "C": { "provides": ["w"] }
        }));

        let mut lessons = resolver.lessons_for("x");
        assert_eq!(names(&lessons), vec!["A"]);
        resolver.add_targets(&mut lessons, "w, q");
        assert_eq!(names(&lessons), vec!["A", "C"]);
        assert!(lessons.orphans().contains(&skill("q")));
    }

    #[test]
    fn test_path_through_prerequisite() {
        let resolver = resolver(json!({
            "P": { "provides": "g", "requires": "h" },
            "P2": { "provides": "h" }
        }));

        let plan = resolver.plan_path_to("g", None, None).unwrap();
        assert_eq!(plan.status(), PlanStatus::Complete);
        assert_eq!(plan.projects(), ["P2".to_string(), "P".to_string()]);
    }

    #[test]
    fn test_pass_cap_override() {
        let resolver = resolver(json!({
            "P": { "provides": "g", "requires": "h" },
            "P2": { "provides": "h" }
        }));

        let plan = resolver.plan_path_to("g", None, Some(0)).unwrap();
        assert_eq!(plan.status(), PlanStatus::PassCapReached);
        assert!(!plan.is_complete());
    }

    #[test]
    fn test_python_basics_curriculum() {
        let resolver = resolver(json!({
            "hello world": {
                "provides": ["Script: executable", "Output: print"],
                "description": "Print a greeting."
            },
            "guessing game": {
                "provides": ["Control: if, else", "Math: arithmetic"],
                "requires": ["Output: print"],
                "extends": "hello world"
            },
            "calculator": {
                "provides": ["Math: arithmetic, modulo", "Input: CLI menu"],
                "requires": ["Control: if, else", "Output: print"]
            },
            "journal": {
                "provides": ["File: open, write, close", "Output: file"],
                "requires": ["Control: if", "Input: CLI menu"]
            },
            "error log": {
                "provides": ["Output: stderr", "Exception: define, raise, catch"],
                "requires": ["File: open, write, close", "Control: if, else"]
            },
            "final exam": {
                "requires": [
                    "Control: if, else",
                    "Output: print, file, stderr",
                    "Exception: raise, catch",
                    "Math: modulo"
                ]
            }
        }));

        let assessments = resolver.assessments_for(["control: if", "output:file"]);
        assert_eq!(names(&assessments), vec!["final exam"]);
        assert!(assessments.is_converged());

        let lessons = resolver.lessons_for(["Control: if, else", "Math: modulo", "Output: stderr"]);
        assert!(lessons.orphans().is_empty());
        assert_eq!(names(&lessons), vec!["calculator", "error log", "guessing game"]);

        let plan = resolver.plan_path_to("exception: catch", None, None).unwrap();
        assert!(plan.is_complete());
        let order = plan.projects();
        assert_eq!(order.last().map(String::as_str), Some("error log"));
        let position = |name: &str| order.iter().position(|p| p == name).unwrap();
        assert!(position("journal") < position("error log"));
        assert!(position("calculator") < position("journal"));
        assert!(!plan.contains_project("final exam"));
    }

    #[test]
    fn test_add_projects_extends_resolver() {
        let mut resolver = resolver(json!({ "A": { "provides": "x" } }));
        assert!(resolver.lessons_for("y").selected().is_empty());

        resolver
            .add_projects(catalogue_from_json(json!({ "B": { "provides": "y" } })).unwrap())
            .unwrap();
        assert_eq!(names(&resolver.lessons_for("y")), vec!["B"]);
        assert_eq!(resolver.index().len(), 2);
    }

    #[test]
    fn test_missing_parent_is_hard_failure() {
        let err = Resolver::new(
            catalogue_from_json(json!({ "A": { "extends": "ghost" } })).unwrap(),
        )
        .unwrap_err();
        assert!(err.is_lookup_failure());
        assert!(matches!(err, SwagmapError::UnknownParent { .. }));
    }
}
