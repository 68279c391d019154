//! Bidirectional skill/project index over a catalogue.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use swagmap_core::{Catalogue, ProjectDefinition, Result, Skill, SkillSide, SwagmapError};
use tracing::{debug, info, warn};

static NO_PROJECTS: BTreeSet<String> = BTreeSet::new();
static NO_SKILLS: BTreeSet<Skill> = BTreeSet::new();

/// Provide and require sets of one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveSkills {
    /// Skills the project teaches.
    pub provides: BTreeSet<Skill>,

    /// Skills the project assesses.
    pub requires: BTreeSet<Skill>,
}

impl EffectiveSkills {
    /// The set on one side.
    pub fn side(&self, side: SkillSide) -> &BTreeSet<Skill> {
        match side {
            SkillSide::Provides => &self.provides,
            SkillSide::Requires => &self.requires,
        }
    }

    fn absorb(&mut self, other: EffectiveSkills) {
        self.provides.extend(other.provides);
        self.requires.extend(other.requires);
    }
}

/// Catalogue of projects plus the mappings derived from it.
///
/// Every derived mapping uses the effective view: skills inherited through
/// `extends` count as the project's own. Mappings are rebuilt from scratch
/// whenever projects are added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillIndex {
    /// Raw definitions by project name.
    catalogue: Catalogue,

    /// project -> skills it provides.
    provided_by_project: BTreeMap<String, BTreeSet<Skill>>,

    /// project -> skills it requires.
    required_by_project: BTreeMap<String, BTreeSet<Skill>>,

    /// skill -> projects that provide it.
    projects_by_provided: BTreeMap<Skill, BTreeSet<String>>,

    /// skill -> projects that require it.
    projects_by_required: BTreeMap<Skill, BTreeSet<String>>,

    /// project -> projects it extends.
    parents: BTreeMap<String, BTreeSet<String>>,

    /// project -> projects that extend it.
    extenders: BTreeMap<String, BTreeSet<String>>,
}

/// Mappings produced by one full rebuild.
struct Derived {
    provided_by_project: BTreeMap<String, BTreeSet<Skill>>,
    required_by_project: BTreeMap<String, BTreeSet<Skill>>,
    projects_by_provided: BTreeMap<Skill, BTreeSet<String>>,
    projects_by_required: BTreeMap<Skill, BTreeSet<String>>,
    parents: BTreeMap<String, BTreeSet<String>>,
    extenders: BTreeMap<String, BTreeSet<String>>,
}

impl SkillIndex {
    /// Build an index over an initial catalogue.
    pub fn new(initial: Catalogue) -> Result<Self> {
        let mut index = Self::default();
        index.add_projects(initial)?;
        Ok(index)
    }

    /// Merge definitions into the catalogue and rebuild every mapping.
    ///
    /// Later definitions replace earlier ones with the same name. If the
    /// merged catalogue cannot be indexed the index is left unchanged.
    pub fn add_projects(&mut self, projects: Catalogue) -> Result<()> {
        let added = projects.len();
        let mut merged = self.catalogue.clone();
        merged.extend(projects);

        let derived = Self::derive(&merged).map_err(|err| {
            warn!(
                "Catalogue update rejected at project '{}': {}",
                err.project().unwrap_or("<unknown>"),
                err
            );
            err
        })?;
        self.catalogue = merged;
        self.install(derived);

        info!(
            "Indexed {} projects ({} added), {} skills taught, {} skills assessed",
            self.catalogue.len(),
            added,
            self.projects_by_provided.len(),
            self.projects_by_required.len()
        );
        Ok(())
    }

    /// Parsed provide/require sets of a project.
    ///
    /// With `follow_extensions` the effective skills of every parent are
    /// unioned in, depth-first. A parent already visited during this call
    /// contributes nothing again, so extension cycles terminate.
    pub fn effective_skills(&self, name: &str, follow_extensions: bool) -> Result<EffectiveSkills> {
        Self::resolve(&self.catalogue, name, follow_extensions)
    }

    /// Projects whose effective provides include `skill`.
    pub fn projects_that_teach(&self, skill: &Skill) -> &BTreeSet<String> {
        self.projects_by_provided.get(skill).unwrap_or(&NO_PROJECTS)
    }

    /// Projects whose effective requires include `skill`.
    pub fn projects_that_assess(&self, skill: &Skill) -> &BTreeSet<String> {
        self.projects_by_required.get(skill).unwrap_or(&NO_PROJECTS)
    }

    /// Projects holding `skill` on the given side.
    pub fn projects_with(&self, skill: &Skill, side: SkillSide) -> &BTreeSet<String> {
        match side {
            SkillSide::Provides => self.projects_that_teach(skill),
            SkillSide::Requires => self.projects_that_assess(skill),
        }
    }

    /// Indexed effective provides of a project (empty if unknown).
    pub fn skills_provided_by(&self, name: &str) -> &BTreeSet<Skill> {
        self.provided_by_project.get(name).unwrap_or(&NO_SKILLS)
    }

    /// Indexed effective requires of a project (empty if unknown).
    pub fn skills_required_by(&self, name: &str) -> &BTreeSet<Skill> {
        self.required_by_project.get(name).unwrap_or(&NO_SKILLS)
    }

    /// Indexed effective skills of a project on one side.
    pub fn skills_of(&self, name: &str, side: SkillSide) -> &BTreeSet<Skill> {
        match side {
            SkillSide::Provides => self.skills_provided_by(name),
            SkillSide::Requires => self.skills_required_by(name),
        }
    }

    /// Projects that `name` extends directly.
    pub fn parents_of(&self, name: &str) -> &BTreeSet<String> {
        self.parents.get(name).unwrap_or(&NO_PROJECTS)
    }

    /// Projects that extend `name` directly.
    pub fn extended_by(&self, name: &str) -> &BTreeSet<String> {
        self.extenders.get(name).unwrap_or(&NO_PROJECTS)
    }

    /// Raw definition of a project.
    pub fn project(&self, name: &str) -> Result<&ProjectDefinition> {
        self.catalogue
            .get(name)
            .ok_or_else(|| SwagmapError::UnknownProject {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.catalogue.contains_key(name)
    }

    /// Project names in lexicographic order.
    pub fn project_names(&self) -> impl Iterator<Item = &str> {
        self.catalogue.keys().map(String::as_str)
    }

    /// The raw catalogue.
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Every skill taught or assessed by some project.
    pub fn skills(&self) -> BTreeSet<&Skill> {
        self.projects_by_provided
            .keys()
            .chain(self.projects_by_required.keys())
            .collect()
    }

    /// Number of projects.
    pub fn len(&self) -> usize {
        self.catalogue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogue.is_empty()
    }

    fn install(&mut self, derived: Derived) {
        self.provided_by_project = derived.provided_by_project;
        self.required_by_project = derived.required_by_project;
        self.projects_by_provided = derived.projects_by_provided;
        self.projects_by_required = derived.projects_by_required;
        self.parents = derived.parents;
        self.extenders = derived.extenders;
    }

    fn derive(catalogue: &Catalogue) -> Result<Derived> {
        let mut derived = Derived {
            provided_by_project: BTreeMap::new(),
            required_by_project: BTreeMap::new(),
            projects_by_provided: BTreeMap::new(),
            projects_by_required: BTreeMap::new(),
            parents: BTreeMap::new(),
            extenders: BTreeMap::new(),
        };

        for (name, definition) in catalogue {
            let skills = Self::resolve(catalogue, name, true)?;

            for skill in &skills.provides {
                derived
                    .projects_by_provided
                    .entry(skill.clone())
                    .or_default()
                    .insert(name.clone());
            }
            for skill in &skills.requires {
                derived
                    .projects_by_required
                    .entry(skill.clone())
                    .or_default()
                    .insert(name.clone());
            }
            derived
                .provided_by_project
                .insert(name.clone(), skills.provides);
            derived
                .required_by_project
                .insert(name.clone(), skills.requires);

            let parents = derived.parents.entry(name.clone()).or_default();
            for parent in definition.parents() {
                parents.insert(parent.clone());
                derived
                    .extenders
                    .entry(parent.clone())
                    .or_default()
                    .insert(name.clone());
            }
        }

        Ok(derived)
    }

    fn resolve(catalogue: &Catalogue, name: &str, follow_extensions: bool) -> Result<EffectiveSkills> {
        let definition = catalogue
            .get(name)
            .ok_or_else(|| SwagmapError::UnknownProject {
                name: name.to_string(),
            })?;

        let mut skills = EffectiveSkills {
            provides: definition.declared_provides(),
            requires: definition.declared_requires(),
        };

        if follow_extensions {
            let mut on_path = vec![name.to_string()];
            let mut visited = BTreeSet::from([name.to_string()]);
            for parent in definition.parents() {
                let inherited =
                    Self::resolve_parent(catalogue, name, parent, &mut on_path, &mut visited)?;
                skills.absorb(inherited);
            }
        }

        Ok(skills)
    }

    fn resolve_parent(
        catalogue: &Catalogue,
        child: &str,
        name: &str,
        on_path: &mut Vec<String>,
        visited: &mut BTreeSet<String>,
    ) -> Result<EffectiveSkills> {
        if on_path.iter().any(|n| n == name) {
            warn!(
                "Extension cycle: '{}' extends '{}' which is already being resolved ({})",
                child,
                name,
                on_path.join(" -> ")
            );
            return Ok(EffectiveSkills::default());
        }
        if !visited.insert(name.to_string()) {
            return Ok(EffectiveSkills::default());
        }

        let definition = catalogue
            .get(name)
            .ok_or_else(|| SwagmapError::UnknownParent {
                project: child.to_string(),
                parent: name.to_string(),
            })?;
        debug!("Resolving '{}' through parent '{}'", child, name);

        let mut skills = EffectiveSkills {
            provides: definition.declared_provides(),
            requires: definition.declared_requires(),
        };

        on_path.push(name.to_string());
        for parent in definition.parents() {
            let inherited = Self::resolve_parent(catalogue, name, parent, on_path, visited)?;
            skills.absorb(inherited);
        }
        on_path.pop();

        Ok(skills)
    }
}
