//! # Swagmap
//!
//! Resolve which projects a learner needs for a set of skills.
//!
//! A [`Resolver`] holds a project catalogue and answers three questions:
//! - [`Resolver::assessments_for`] - the fewest projects that assess the skills
//! - [`Resolver::lessons_for`] - the fewest projects that teach the skills
//! - [`Resolver::plan_path_to`] - an ordered curriculum reaching a goal skill

pub mod resolver;

pub use resolver::Resolver;

pub use swagmap_core::{
    catalogue_from_json, parse_skills, Catalogue, CoverageView, ProjectDefinition, Result, Skill,
    SkillDescriptor, SwagmapError,
};
pub use swagmap_index::{EffectiveSkills, SkillIndex};
pub use swagmap_planner::{CurriculumPlan, PlanStatus, PlannerConfig};
pub use swagmap_reduce::{ProjectStanding, Reduction, ReductionConfig};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::resolver::Resolver;
    pub use swagmap_core::prelude::*;
    pub use swagmap_planner::{CurriculumPlan, PlanStatus, PlannerConfig};
    pub use swagmap_reduce::{Reduction, ReductionConfig};
}
