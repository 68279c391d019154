//! Greedy minimal-cover reduction.
//!
//! The working set starts as every project that covers some target skill.
//! Each pass scores the projects by how much of their coverage is duplicated
//! elsewhere and drops the project without a skill of its own whose loss
//! costs the least shared practice, until every remaining project is needed
//! for at least one skill.

use std::collections::{BTreeMap, BTreeSet};

use swagmap_core::{parse_skills, CoverageView, Skill, SkillDescriptor, SkillSide};
use swagmap_index::SkillIndex;
use tracing::{debug, info, warn};

use crate::reduction::{ProjectStanding, Reduction, ReductionConfig, Removal};

/// Pick the projects that assess the target skills.
pub fn assessments_for(index: &SkillIndex, targets: impl Into<SkillDescriptor>) -> Reduction {
    reduce(index, targets, CoverageView::Assessment, &ReductionConfig::default())
}

/// Pick the projects that teach the target skills.
pub fn lessons_for(index: &SkillIndex, targets: impl Into<SkillDescriptor>) -> Reduction {
    reduce(index, targets, CoverageView::Teaching, &ReductionConfig::default())
}

/// Reduce the projects covering `targets` under `view`.
pub fn reduce(
    index: &SkillIndex,
    targets: impl Into<SkillDescriptor>,
    view: CoverageView,
    config: &ReductionConfig,
) -> Reduction {
    let mut reduction = Reduction::new(view);
    refine(&mut reduction, index, targets, config);
    reduction
}

/// Seed `reduction` with more target skills and run the removal loop again,
/// starting from the projects it kept.
pub(crate) fn refine(
    reduction: &mut Reduction,
    index: &SkillIndex,
    targets: impl Into<SkillDescriptor>,
    config: &ReductionConfig,
) {
    let view = reduction.view;
    let side = view.side();
    let mut working = std::mem::take(&mut reduction.selected);

    for skill in parse_skills(targets) {
        let candidates = index.projects_with(&skill, side);
        if candidates.is_empty() {
            warn!("Orphan skill '{}': no project covers it ({:?} view)", skill, view);
            reduction.orphans.insert(skill);
        } else {
            debug!("{} candidate(s) for '{}'", candidates.len(), skill);
            working.extend(candidates.iter().cloned());
            reduction.orphans.remove(&skill);
            reduction.targets.insert(skill);
        }
    }

    let initial_candidates = working.len();
    let max_passes = config.max_passes.unwrap_or(initial_candidates);
    info!(
        "Reducing {} candidate project(s) for {} target skill(s) ({:?} view, {} orphaned)",
        initial_candidates,
        reduction.targets.len(),
        view,
        reduction.orphans.len()
    );

    let mut scored = Scoring::compute(index, &working, &reduction.targets, side);
    let mut passes = 0;

    while passes < max_passes {
        passes += 1;
        let Some((project, standing)) = scored.removal_candidate() else {
            break;
        };
        debug!(
            "Pass {}: removing '{}' (score {}, redundancy {})",
            passes, project, standing.score, standing.redundancy
        );
        let removal = Removal {
            project: project.to_string(),
            score: standing.score,
            pass: passes,
            overlap: standing.overlap.clone(),
        };
        working.remove(&removal.project);
        reduction.removals.push(removal);
        scored = Scoring::compute(index, &working, &reduction.targets, side);
    }

    let converged = scored.removal_candidate().is_none();
    if !converged {
        warn!(
            "Reduction stopped at the pass cap ({}) with removable projects left",
            max_passes
        );
    }
    info!(
        "Selected {} of {} project(s) in {} pass(es)",
        working.len(),
        initial_candidates,
        passes
    );

    reduction.selected = working;
    reduction.standings = scored.standings;
    reduction.holders = scored.holders;
    reduction.initial_candidates = initial_candidates;
    reduction.passes = passes;
    reduction.converged = converged;
}

/// Standings of one working set.
struct Scoring {
    standings: BTreeMap<String, ProjectStanding>,
    holders: BTreeMap<Skill, BTreeSet<String>>,
}

impl Scoring {
    fn compute(
        index: &SkillIndex,
        working: &BTreeSet<String>,
        targets: &BTreeSet<Skill>,
        side: SkillSide,
    ) -> Self {
        let mut split: BTreeMap<&str, (BTreeSet<Skill>, BTreeSet<Skill>)> = BTreeMap::new();
        let mut holders: BTreeMap<Skill, BTreeSet<String>> = BTreeMap::new();

        for project in working {
            let (relevant, irrelevant): (BTreeSet<Skill>, BTreeSet<Skill>) = index
                .skills_of(project, side)
                .iter()
                .cloned()
                .partition(|skill| targets.contains(skill));
            for skill in &relevant {
                holders
                    .entry(skill.clone())
                    .or_default()
                    .insert(project.clone());
            }
            split.insert(project.as_str(), (relevant, irrelevant));
        }

        let standings = split
            .into_iter()
            .map(|(project, (relevant, irrelevant))| {
                let mut overlap: BTreeMap<usize, BTreeSet<Skill>> = BTreeMap::new();
                for skill in &relevant {
                    let frequency = holders.get(skill).map_or(1, BTreeSet::len);
                    overlap.entry(frequency).or_default().insert(skill.clone());
                }
                let standing = score(relevant, irrelevant, overlap);
                (project.to_string(), standing)
            })
            .collect();

        Self { standings, holders }
    }

    /// The project to drop next among those without a unique skill: the
    /// least redundant one (negative score closest to zero), then the one
    /// with the fewest skills overall, then by name.
    fn removal_candidate(&self) -> Option<(&str, &ProjectStanding)> {
        self.standings
            .iter()
            .filter(|(_, standing)| standing.score < 0)
            .min_by_key(|(name, standing)| {
                (standing.redundancy, standing.breadth(), name.as_str())
            })
            .map(|(name, standing)| (name.as_str(), standing))
    }
}

fn score(
    relevant: BTreeSet<Skill>,
    irrelevant: BTreeSet<Skill>,
    overlap: BTreeMap<usize, BTreeSet<Skill>>,
) -> ProjectStanding {
    let redundancy: usize = overlap
        .iter()
        .map(|(frequency, skills)| (frequency - 1) * skills.len())
        .sum();

    let relevance = if relevant.is_empty() {
        0.0
    } else {
        relevant.len() as f64 / (relevant.len() + irrelevant.len()) as f64
    };

    let sign = if overlap.contains_key(&1) { 1 } else { -1 };
    let score = sign * redundancy as i64;

    ProjectStanding {
        relevant,
        irrelevant,
        overlap,
        relevance,
        redundancy,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use swagmap_core::{catalogue_from_json, Catalogue, ProjectDefinition};

    fn index(catalogue: serde_json::Value) -> SkillIndex {
        SkillIndex::new(catalogue_from_json(catalogue).unwrap()).unwrap()
    }

    fn skill(descriptor: &str) -> Skill {
        Skill::parse_one(descriptor).unwrap()
    }

    fn selected(reduction: &Reduction) -> Vec<&str> {
        reduction.selected().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_assessment_and_teaching_views() {
        let index = index(json!({
            "a": { "provides": "x" },
            "b": { "requires": "x" }
        }));

        let assessments = assessments_for(&index, "x");
        assert_eq!(selected(&assessments), vec!["b"]);
        assert_eq!(assessments.view(), CoverageView::Assessment);

        let lessons = lessons_for(&index, "x");
        assert_eq!(selected(&lessons), vec!["a"]);
        assert!(lessons.is_converged());
    }

    #[test]
    fn test_redundant_provider_is_dropped() {
        let index = index(json!({
            "a": { "provides": "x, y" },
            "b": { "provides": "x" },
            "c": { "requires": "x" }
        }));

        let lessons = lessons_for(&index, "x");
        assert_eq!(selected(&lessons), vec!["a"]);
        assert_eq!(lessons.removals().len(), 1);
        assert_eq!(lessons.removals()[0].project, "b");
        assert_eq!(lessons.removals()[0].score, -1);
        assert_eq!(lessons.initial_candidates(), 2);
    }

    #[test]
    fn test_orphan_skill_reported() {
        let index = index(json!({
            "a": { "provides": "x" },
            "b": { "requires": "x" }
        }));

        let assessments = assessments_for(&index, vec!["x", "z"]);
        assert_eq!(selected(&assessments), vec!["b"]);
        assert!(assessments.orphans().contains(&skill("z")));
        assert!(!assessments.targets().contains(&skill("z")));

        let (projects, orphans) = assessments.into_parts();
        assert_eq!(projects.len(), 1);
        assert_eq!(orphans.len(), 1);
    }

    #[test]
    fn test_every_project_keeps_a_unique_skill() {
        let index = index(json!({
            "if-else": { "requires": "control: if, else" },
            "loops": { "requires": "control: for, while" },
            "everything": { "requires": "control: if, else, for, while" },
            "ifs": { "requires": "control: if" }
        }));

        let assessments = assessments_for(&index, "control: if, else, for, while");
        assert_eq!(selected(&assessments), vec!["everything"]);
        for (name, standing) in assessments.standings() {
            assert!(standing.has_unique_skill(), "{} has no unique skill", name);
            assert!(standing.score >= 0);
        }
    }

    #[test]
    fn test_complementary_projects_both_kept() {
        let index = index(json!({
            "p": { "requires": "a, b" },
            "q": { "requires": "b, c" }
        }));

        let assessments = assessments_for(&index, "a, b, c");
        assert_eq!(selected(&assessments), vec!["p", "q"]);
        let p = assessments.standing("p").unwrap();
        assert_eq!(p.redundancy, 1);
        assert_eq!(p.score, 1);
        assert_eq!(p.unique_skills().unwrap().len(), 1);
        assert_eq!(assessments.shared_with("p", &skill("b")), vec!["q"]);
        assert!(assessments.shared_with("p", &skill("a")).is_empty());
    }

    #[test]
    fn test_least_redundant_goes_first() {
        let index = index(json!({
            "wide": { "requires": "a, b, c" },
            "ab": { "requires": "a, b" },
            "c": { "requires": "c" }
        }));

        let assessments = assessments_for(&index, "a, b, c");
        // "c" shares one skill, "ab" two: "c" is cheaper to lose.
        assert_eq!(assessments.removals()[0].project, "c");
        assert_eq!(assessments.removals()[0].score, -1);
        assert_eq!(assessments.removals()[1].project, "ab");
        assert_eq!(selected(&assessments), vec!["wide"]);
    }

    #[test]
    fn test_ties_break_by_name() {
        let index = index(json!({
            "beta": { "requires": "x" },
            "alpha": { "requires": "x" },
            "gamma": { "requires": "x" }
        }));

        let assessments = assessments_for(&index, "x");
        let removed: Vec<&str> = assessments
            .removals()
            .iter()
            .map(|r| r.project.as_str())
            .collect();
        assert_eq!(removed, vec!["alpha", "beta"]);
        assert_eq!(selected(&assessments), vec!["gamma"]);
    }

    #[test]
    fn test_relevance_reported() {
        let index = index(json!({
            "p": { "requires": "a, b, c, d" }
        }));

        let assessments = assessments_for(&index, "a");
        let p = assessments.standing("p").unwrap();
        assert_eq!(p.relevant.len(), 1);
        assert_eq!(p.irrelevant.len(), 3);
        assert!((p.relevance - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pass_cap_forces_stop() {
        let index = index(json!({
            "p1": { "requires": "x" },
            "p2": { "requires": "x" },
            "p3": { "requires": "x" },
            "p4": { "requires": "x" }
        }));

        let config = ReductionConfig::default().with_max_passes(1);
        let reduction = reduce(&index, "x", CoverageView::Assessment, &config);
        assert_eq!(reduction.passes(), 1);
        assert_eq!(reduction.selected().len(), 3);
        assert!(!reduction.is_converged());
    }

    #[test]
    fn test_no_targets() {
        let index = index(json!({ "p": { "requires": "x" } }));
        let reduction = assessments_for(&index, Vec::<String>::new());
        assert!(reduction.selected().is_empty());
        assert_eq!(reduction.passes(), 0);
        assert!(reduction.is_converged());
        assert!(reduction.ranked().is_empty());
    }

    #[test]
    fn test_ranked_descending() {
        let index = index(json!({
            "p": { "requires": "a, b" },
            "q": { "requires": "b, c" },
            "r": { "requires": "d" }
        }));

        let reduction = assessments_for(&index, "a, b, c, d");
        assert_eq!(reduction.ranked(), vec![("p", 1), ("q", 1), ("r", 0)]);
    }

    #[test]
    fn test_added_targets_start_from_kept_projects() {
        let index = index(json!({
            "wide": { "requires": "a, b, c" },
            "ab": { "requires": "a, b" },
            "c": { "requires": "c" },
            "d": { "requires": "d" }
        }));
        let config = ReductionConfig::default();

        let mut reduction = assessments_for(&index, "a, b");
        assert_eq!(selected(&reduction), vec!["wide"]);
        assert_eq!(reduction.removals()[0].project, "ab");

        reduction.add_targets(&index, "c", &config);
        // "ab" is not a candidate for "c", so it stays out.
        assert_eq!(selected(&reduction), vec!["wide"]);
        assert_eq!(reduction.initial_candidates(), 2);
        let removed: Vec<&str> = reduction
            .removals()
            .iter()
            .map(|r| r.project.as_str())
            .collect();
        assert_eq!(removed, vec!["ab", "c"]);
        assert_eq!(reduction.removals()[1].pass, 1);

        reduction.add_targets(&index, "d", &config);
        assert_eq!(selected(&reduction), vec!["d", "wide"]);
        assert_eq!(reduction.targets().len(), 4);
        assert!(reduction.is_converged());
    }

    #[test]
    fn test_added_targets_adopt_former_orphans() {
        let mut index = index(json!({ "a": { "provides": "x" } }));
        let config = ReductionConfig::default();

        let mut reduction = lessons_for(&index, "x, z");
        assert!(reduction.orphans().contains(&skill("z")));

        index
            .add_projects(catalogue_from_json(json!({ "b": { "provides": "z" } })).unwrap())
            .unwrap();
        reduction.add_targets(&index, "z", &config);
        assert!(reduction.orphans().is_empty());
        assert!(reduction.targets().contains(&skill("z")));
        assert_eq!(selected(&reduction), vec!["a", "b"]);
    }

    fn arb_catalogue() -> impl Strategy<Value = Catalogue> {
        let pool = ["a", "b", "c", "d", "e", "f"];
        proptest::collection::vec(
            (
                proptest::sample::subsequence(pool.to_vec(), 0..4),
                proptest::sample::subsequence(pool.to_vec(), 0..4),
            ),
            1..8,
        )
        .prop_map(|defs| {
            defs.into_iter()
                .enumerate()
                .map(|(i, (provides, requires))| {
                    let definition = ProjectDefinition::new()
                        .provides(provides)
                        .requires(requires);
                    (format!("p{}", i), definition)
                })
                .collect()
        })
    }

    fn check_invariants(reduction: &Reduction, index: &SkillIndex) -> Result<(), TestCaseError> {
        prop_assert!(reduction.passes() <= reduction.initial_candidates());
        prop_assert!(reduction.is_converged());
        for removal in reduction.removals() {
            prop_assert!(!removal.overlap.contains_key(&1));
            prop_assert!(removal.score < 0);
        }
        // Removing only projects without unique skills keeps every target covered.
        let side = reduction.view().side();
        for target in reduction.targets() {
            prop_assert!(reduction
                .selected()
                .iter()
                .any(|p| index.skills_of(p, side).contains(target)));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn test_reduction_invariants(
            catalogue in arb_catalogue(),
            targets in proptest::sample::subsequence(vec!["a", "b", "c", "d", "e", "f", "z"], 0..7),
        ) {
            let index = SkillIndex::new(catalogue).unwrap();
            check_invariants(&assessments_for(&index, targets.clone()), &index)?;
            check_invariants(&lessons_for(&index, targets), &index)?;
        }
    }
}
