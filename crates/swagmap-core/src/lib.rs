//! # Swagmap Core
//!
//! Core primitives and types for swagmap.
//!
//! This crate provides the fundamental building blocks:
//! - [`Skill`] - Canonical hierarchical skill identifier
//! - [`parse_skills`] - Descriptor parser producing canonical skills
//! - [`ProjectDefinition`] - Raw catalogue record of one project
//! - [`SwagmapError`] - Error types

pub mod error;
pub mod project;
pub mod skill;
pub mod types;

// Re-exports for convenience
pub use error::{Result, SwagmapError};
pub use project::{catalogue_from_json, Catalogue, Extends, ProjectDefinition};
pub use skill::{parse_skills, Skill, SkillDescriptor};
pub use types::*;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Result, SwagmapError};
    pub use crate::project::{Catalogue, ProjectDefinition};
    pub use crate::skill::{parse_skills, Skill, SkillDescriptor};
    pub use crate::types::{CoverageView, SkillSide};
}
