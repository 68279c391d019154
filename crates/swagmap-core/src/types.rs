//! Common types used across swagmap.

use serde::{Deserialize, Serialize};

/// Which half of a project's skills is being looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillSide {
    /// Skills the project teaches.
    Provides,
    /// Skills the project assesses or needs beforehand.
    Requires,
}

/// How a target skill set is covered by projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageView {
    /// Pick projects that assess the skills (final evaluations).
    Assessment,
    /// Pick projects that teach the skills (lessons).
    Teaching,
}

impl CoverageView {
    /// The side of each project this view draws candidates and overlap from.
    pub fn side(&self) -> SkillSide {
        match self {
            CoverageView::Assessment => SkillSide::Requires,
            CoverageView::Teaching => SkillSide::Provides,
        }
    }
}
