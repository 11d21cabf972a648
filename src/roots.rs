//! # Storage Roots
//!
//! A project may span several named storage roots (the primary project
//! area, a renders volume, a reference library), each with its own
//! absolute prefix per platform. This module resolves which root a path
//! belongs to and supplies per-platform prefixes to path templates.
//!
//! Root lookup order is stable: the `primary` root is always consulted
//! first, then the alternates in alphabetical order. The first root whose
//! prefix is an exact path-component prefix of the input wins.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The name every configuration must give its main storage root.
pub const PRIMARY_ROOT: &str = "primary";

/// A supported operating-system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Mac,
    Windows,
}

impl Platform {
    /// The platform the current process is running on.
    pub fn current() -> Platform {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Platform::Linux => "linux",
            Platform::Mac => "mac",
            Platform::Windows => "windows",
        };
        write!(f, "{}", label)
    }
}

/// A named storage root with per-platform absolute prefixes.
///
/// A root may legitimately be undefined on some platforms (a Windows-only
/// capture volume, say); templates anchored to it simply cannot resolve
/// paths on those platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRoot {
    name: String,
    paths: BTreeMap<Platform, PathBuf>,
}

impl StorageRoot {
    pub fn new(name: &str, paths: BTreeMap<Platform, PathBuf>) -> Self {
        StorageRoot {
            name: name.to_string(),
            paths,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configured prefix for a given platform, if any.
    pub fn path_for(&self, platform: Platform) -> Option<&Path> {
        self.paths.get(&platform).map(PathBuf::as_path)
    }

    /// The configured prefix for the platform the process runs on.
    pub fn current_path(&self) -> Option<&Path> {
        self.path_for(Platform::current())
    }
}

/// Resolves paths against the project's set of named storage roots.
#[derive(Debug, Clone)]
pub struct RootResolver {
    roots: BTreeMap<String, StorageRoot>,
}

impl RootResolver {
    /// Build a resolver from named roots. A root named `primary` is
    /// required; it anchors templates that do not name a root explicitly
    /// and is always consulted first during path resolution.
    pub fn new(roots: BTreeMap<String, StorageRoot>) -> Result<Self> {
        if !roots.contains_key(PRIMARY_ROOT) {
            return Err(Error::ConfigParse {
                message: format!("no '{}' storage root is defined", PRIMARY_ROOT),
                hint: Some(format!(
                    "add a '{}' entry to the 'roots:' mapping",
                    PRIMARY_ROOT
                )),
            });
        }
        Ok(RootResolver { roots })
    }

    pub fn get(&self, name: &str) -> Option<&StorageRoot> {
        self.roots.get(name)
    }

    /// Root names in resolution order: primary first, alternates
    /// alphabetically.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(PRIMARY_ROOT)
            .chain(self.roots.keys().map(String::as_str).filter(|n| *n != PRIMARY_ROOT))
    }

    /// The configured prefix for a root on a given platform.
    pub fn root_path_for(&self, name: &str, platform: Platform) -> Option<&Path> {
        self.roots.get(name)?.path_for(platform)
    }

    /// Determine which root a path lives under on the current platform.
    ///
    /// Returns the root name and the remainder of the path relative to the
    /// root prefix, or `None` when no configured root is a path-component
    /// prefix of the input. An unmanaged path is an expected outcome, not
    /// an error.
    pub fn resolve(&self, path: &Path) -> Option<(&str, PathBuf)> {
        for name in self.names().collect::<Vec<_>>() {
            let root = &self.roots[name];
            if let Some(prefix) = root.current_path() {
                if let Ok(remainder) = path.strip_prefix(prefix) {
                    return Some((root.name(), remainder.to_path_buf()));
                }
            }
        }
        None
    }
}
