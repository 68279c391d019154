//! Skill identifiers and the descriptor parser.
//!
//! A skill is a colon-separated hierarchy such as `control:if`. Catalogues
//! write skills as descriptors that may share a prefix across a comma list
//! of leaves, so `"Control: if, else"` names both `control:if` and
//! `control:else`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between hierarchy levels.
pub const LEVEL_SEPARATOR: char = ':';

/// Separator between leaves sharing one prefix.
pub const LEAF_SEPARATOR: char = ',';

/// Canonical skill identifier: lowercased, trimmed, colon-joined tokens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Skill(String);

impl Skill {
    /// Parse a descriptor that must name exactly one skill.
    pub fn parse_one(descriptor: &str) -> Option<Skill> {
        let mut skills = parse_skills(descriptor);
        if skills.len() == 1 {
            skills.pop_first()
        } else {
            None
        }
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the last level, if the skill is hierarchical.
    pub fn prefix(&self) -> Option<&str> {
        self.0.rsplit_once(LEVEL_SEPARATOR).map(|(prefix, _)| prefix)
    }

    /// The last level of the hierarchy.
    pub fn leaf(&self) -> &str {
        self.0
            .rsplit_once(LEVEL_SEPARATOR)
            .map_or(self.0.as_str(), |(_, leaf)| leaf)
    }

    /// Iterate over the hierarchy levels, outermost first.
    pub fn levels(&self) -> impl Iterator<Item = &str> {
        self.0.split(LEVEL_SEPARATOR)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Skill {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A skill descriptor as written in a catalogue: one string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillDescriptor {
    /// A single descriptor string.
    One(String),
    /// An ordered list of descriptor strings.
    Many(Vec<String>),
}

impl SkillDescriptor {
    /// Iterate over the raw descriptor strings.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let items: &[String] = match self {
            SkillDescriptor::One(one) => std::slice::from_ref(one),
            SkillDescriptor::Many(many) => many,
        };
        items.iter().map(String::as_str)
    }

    /// Canonical skills named by this descriptor.
    pub fn skills(&self) -> BTreeSet<Skill> {
        let mut parsed = BTreeSet::new();
        for descriptor in self.iter() {
            parse_into(descriptor, &mut parsed);
        }
        parsed
    }
}

impl Default for SkillDescriptor {
    fn default() -> Self {
        SkillDescriptor::Many(Vec::new())
    }
}

impl From<&str> for SkillDescriptor {
    fn from(value: &str) -> Self {
        SkillDescriptor::One(value.to_string())
    }
}

impl From<String> for SkillDescriptor {
    fn from(value: String) -> Self {
        SkillDescriptor::One(value)
    }
}

impl From<&String> for SkillDescriptor {
    fn from(value: &String) -> Self {
        SkillDescriptor::One(value.clone())
    }
}

impl From<Vec<String>> for SkillDescriptor {
    fn from(value: Vec<String>) -> Self {
        SkillDescriptor::Many(value)
    }
}

impl From<Vec<&str>> for SkillDescriptor {
    fn from(value: Vec<&str>) -> Self {
        SkillDescriptor::Many(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for SkillDescriptor {
    fn from(value: &[&str]) -> Self {
        SkillDescriptor::Many(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SkillDescriptor {
    fn from(value: [&str; N]) -> Self {
        SkillDescriptor::Many(value.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&BTreeSet<Skill>> for SkillDescriptor {
    fn from(value: &BTreeSet<Skill>) -> Self {
        SkillDescriptor::Many(value.iter().map(|s| s.to_string()).collect())
    }
}

/// Parse one or more descriptors into canonical skills.
///
/// Never fails: empty leaves are skipped and duplicates collapse.
pub fn parse_skills(descriptor: impl Into<SkillDescriptor>) -> BTreeSet<Skill> {
    descriptor.into().skills()
}

fn parse_into(descriptor: &str, parsed: &mut BTreeSet<Skill>) {
    let lowered = descriptor.to_lowercase();
    let tokens: Vec<&str> = lowered.split(LEVEL_SEPARATOR).map(str::trim).collect();
    let Some((last, prefix)) = tokens.split_last() else {
        return;
    };

    for leaf in last.split(LEAF_SEPARATOR).map(str::trim) {
        if leaf.is_empty() {
            continue;
        }
        let mut canonical = String::with_capacity(lowered.len());
        for level in prefix {
            canonical.push_str(level);
            canonical.push(LEVEL_SEPARATOR);
        }
        canonical.push_str(leaf);
        parsed.insert(Skill(canonical));
    }
}
