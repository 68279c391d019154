//! # Swagmap Planner
//!
//! Reinforced shortest-path planning of an ordered curriculum from a start
//! state to a goal skill.

pub mod dijkstra;
pub mod graph;
pub mod plan;
pub mod planner;

pub use graph::{CurriculumGraph, CurriculumMap, Edge, EdgeKind, Vertex};
pub use plan::{CurriculumPlan, PlanStatus};
pub use planner::{plan_path_to, PathPlanner, PlannerConfig, PlanningSession, StepOutcome};
