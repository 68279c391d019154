//! Project definitions as they come out of a catalogue.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::skill::{Skill, SkillDescriptor};

/// A catalogue maps project names to their raw definitions.
pub type Catalogue = BTreeMap<String, ProjectDefinition>;

/// Raw definition of one project.
///
/// All keys are optional in the source catalogue; a missing key is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDefinition {
    /// Skills the project teaches.
    pub provides: SkillDescriptor,

    /// Skills the project assesses or needs as a prerequisite.
    pub requires: SkillDescriptor,

    /// Parent projects whose skills this project inherits.
    #[serde(skip_serializing_if = "Extends::is_empty")]
    pub extends: Extends,

    /// Opaque text, passed through unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProjectDefinition {
    /// Start an empty definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the skills this project teaches.
    pub fn provides(mut self, descriptor: impl Into<SkillDescriptor>) -> Self {
        self.provides = descriptor.into();
        self
    }

    /// Set the skills this project requires.
    pub fn requires(mut self, descriptor: impl Into<SkillDescriptor>) -> Self {
        self.requires = descriptor.into();
        self
    }

    /// Add a parent project.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends.push(parent.into());
        self
    }

    /// Set the description.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Canonical skills declared directly under `provides`.
    pub fn declared_provides(&self) -> BTreeSet<Skill> {
        self.provides.skills()
    }

    /// Canonical skills declared directly under `requires`.
    pub fn declared_requires(&self) -> BTreeSet<Skill> {
        self.requires.skills()
    }

    /// Names of the projects this one extends, in declaration order.
    pub fn parents(&self) -> &[String] {
        self.extends.names()
    }
}

/// The `extends` key: a single parent name or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ExtendsRepr", into = "Vec<String>")]
pub struct Extends(Vec<String>);

impl Extends {
    /// Parent names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, parent: String) {
        if !self.0.contains(&parent) {
            self.0.push(parent);
        }
    }
}

impl Default for Extends {
    fn default() -> Self {
        Extends(Vec::new())
    }
}

impl From<Extends> for Vec<String> {
    fn from(value: Extends) -> Self {
        value.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtendsRepr {
    One(String),
    Many(Vec<String>),
}

impl From<ExtendsRepr> for Extends {
    fn from(value: ExtendsRepr) -> Self {
        let mut extends = Extends::default();
        match value {
            ExtendsRepr::One(name) => extends.push(name),
            ExtendsRepr::Many(names) => names.into_iter().for_each(|n| extends.push(n)),
        }
        extends
    }
}

/// Deserialize a catalogue from a JSON value.
pub fn catalogue_from_json(value: serde_json::Value) -> Result<Catalogue> {
    Ok(serde_json::from_value(value)?)
}
