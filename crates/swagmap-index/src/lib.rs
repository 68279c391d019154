//! # Swagmap Index
//!
//! Skill/project index with inheritance-aware skill resolution.

pub mod index;

pub use index::{EffectiveSkills, SkillIndex};
