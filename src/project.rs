//! # Project Handle
//!
//! A [`Project`] owns everything the resolution engine needs for one
//! project: the typed key set, the template registry, and the storage
//! root resolver. It is constructed once from a parsed configuration,
//! is immutable afterwards, and is safe to share across threads.
//!
//! The registry is an explicit value rather than process-global state:
//! two projects with different configurations can coexist in one
//! process without seeing each other's templates.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use crate::config::{self, StudioConfig};
use crate::error::{Error, Result};
use crate::key::{FieldValue, Fields, KeyRef};
use crate::roots::{Platform, RootResolver, StorageRoot};
use crate::scan;
use crate::template::{Template, TemplatePath, TemplateString};

/// A project session handle: keys, templates and storage roots, built
/// once from the studio configuration.
#[derive(Debug)]
pub struct Project {
    roots: RootResolver,
    keys: BTreeMap<String, KeyRef>,
    templates: BTreeMap<String, Template>,
}

impl Project {
    /// Load a project from a configuration file on disk.
    pub fn load(path: &Path) -> Result<Project> {
        let text = std::fs::read_to_string(path)?;
        Project::from_yaml(&text)
    }

    /// Build a project from configuration YAML.
    pub fn from_yaml(yaml_content: &str) -> Result<Project> {
        Project::from_config(config::parse(yaml_content)?)
    }

    /// Build a project from an already-parsed configuration. All key and
    /// template definitions are validated here; a malformed definition
    /// aborts the load.
    pub fn from_config(config: StudioConfig) -> Result<Project> {
        let mut roots = BTreeMap::new();
        for (name, paths) in config.roots {
            roots.insert(name.clone(), StorageRoot::new(&name, paths));
        }
        let roots = RootResolver::new(roots)?;

        let mut keys: BTreeMap<String, KeyRef> = BTreeMap::new();
        for (name, spec) in &config.keys {
            keys.insert(name.clone(), Arc::new(spec.build(name)?));
        }

        let platform = Platform::current();
        let mut templates = BTreeMap::new();
        for (name, spec) in &config.paths {
            let (definition, root_name) = spec.parts();
            if roots.get(root_name).is_none() {
                return Err(Error::Definition {
                    template: name.clone(),
                    message: format!("references undefined storage root '{}'", root_name),
                });
            }
            let root_path = roots
                .root_path_for(root_name, platform)
                .map(Path::to_path_buf);
            let template = TemplatePath::new(name, definition, &keys, root_name, root_path)?;
            templates.insert(name.clone(), Template::Path(template));
        }
        for (name, definition) in &config.strings {
            if templates.contains_key(name) {
                return Err(Error::ConfigParse {
                    message: format!("template '{}' is defined in both 'paths' and 'strings'", name),
                    hint: Some("template names share one namespace; rename one of them".to_string()),
                });
            }
            let template = TemplateString::new(name, definition, &keys)?;
            templates.insert(name.clone(), Template::Str(template));
        }

        debug!(
            "project loaded: {} keys, {} templates, {} roots",
            keys.len(),
            templates.len(),
            roots.names().count()
        );
        Ok(Project {
            roots,
            keys,
            templates,
        })
    }

    /// The storage root resolver for this project.
    pub fn roots(&self) -> &RootResolver {
        &self.roots
    }

    /// The full key registry, by name.
    pub fn keys(&self) -> &BTreeMap<String, KeyRef> {
        &self.keys
    }

    /// Look up a template by name.
    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// All templates, in name order.
    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    /// All template names, sorted.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Find the template a concrete path (or name) was rendered from.
    ///
    /// Templates are tried in name order and the first match wins; a path
    /// outside every configured root, or matching no template, yields
    /// `None` rather than an error.
    pub fn template_from_path(&self, input: &str) -> Option<&Template> {
        self.fields_from_path(input).map(|(template, _)| template)
    }

    /// Like [`Project::template_from_path`], but also returns the
    /// recovered field mapping.
    pub fn fields_from_path(&self, input: &str) -> Option<(&Template, Fields)> {
        self.templates.values().find_map(|template| {
            template
                .fields_from(input)
                .map(|fields| (template, fields))
        })
    }

    /// Enumerate every path on disk matching `template` with the given
    /// fields, treating `skip_keys` (and keys absent from `fields`) as
    /// wildcards. Every result parses back through the template; paths
    /// that merely match the glob shape are discarded.
    pub fn paths_from_template(
        &self,
        template: &TemplatePath,
        fields: &Fields,
        skip_keys: &[&str],
    ) -> Result<Vec<PathBuf>> {
        scan::scan_paths(template, fields, skip_keys)
    }

    /// Produce the single abstract path standing for a group of files
    /// that differ only in their abstract dimensions (frame number,
    /// stereo eye).
    ///
    /// Abstract keys without a concrete value are treated as skipped for
    /// an on-disk scan; when the scan finds nothing there is nothing to
    /// abstract over and `None` is returned. Otherwise each unresolved
    /// abstract key renders as its canonical placeholder (`%04d`, `%V`,
    /// or the `FORMAT:` form the caller supplied). Found files only
    /// confirm existence and never donate a frame number.
    pub fn abstract_path_from_template(
        &self,
        template: &TemplatePath,
        fields: &Fields,
    ) -> Result<Option<PathBuf>> {
        let mut skip_keys: Vec<&str> = Vec::new();
        let mut render_fields = fields.clone();

        for (name, key) in template.keys() {
            if !key.is_abstract() {
                continue;
            }
            let unresolved = matches!(
                fields.get(name),
                None | Some(FieldValue::Any) | Some(FieldValue::FrameSpec(_))
            );
            if !unresolved {
                continue;
            }
            skip_keys.push(name);
            match fields.get(name) {
                // A caller-supplied FORMAT token renders as requested.
                Some(FieldValue::FrameSpec(_)) => {}
                _ => match key.abstract_placeholder() {
                    Some(placeholder) => {
                        render_fields.insert(name.clone(), placeholder);
                    }
                    None => {
                        render_fields.remove(name.as_str());
                    }
                },
            }
        }

        let mut search_fields = fields.clone();
        for name in &skip_keys {
            search_fields.remove(*name);
        }
        let found = scan::scan_paths(template, &search_fields, &skip_keys)?;
        if found.is_empty() {
            debug!(
                "template '{}': nothing on disk to abstract over",
                template.name()
            );
            return Ok(None);
        }

        template.apply_fields(&render_fields).map(Some)
    }
}
