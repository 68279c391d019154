//! # Swagmap Reduce
//!
//! Greedy reduction of a target skill set to a small covering set of
//! projects, from either the assessment or the teaching side.

pub mod engine;
pub mod reduction;

pub use engine::{assessments_for, lessons_for, reduce};
pub use reduction::{ProjectStanding, Reduction, ReductionConfig, Removal};
