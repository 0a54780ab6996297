// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::{Path, PathBuf};

use path_clean::clean;

pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

/// Where the configuration file was looked up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Given on the command line. It is an error for it not to exist.
    Explicit(PathBuf),
    /// Found in the working directory or one of its parents
    Found(PathBuf),
    /// Default location in the user's config folder. It may not exist.
    Default(PathBuf),
}

impl ConfigLocation {
    pub fn path(&self) -> &Path {
        match self {
            ConfigLocation::Explicit(path)
            | ConfigLocation::Found(path)
            | ConfigLocation::Default(path) => path,
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, ConfigLocation::Explicit(_))
    }
}

/// Look for `filename` in `path` and each of its ancestors.
pub fn find_in_parent(path: &Path, filename: &str) -> Option<PathBuf> {
    path.ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.exists())
}

pub fn resolve_config_path(
    find_in_parent: FindInParent,
    cwd: &Path,
    default_config_dir: &Path,
    default_filename: &str,
    cli_file: Option<&Path>,
) -> ConfigLocation {
    if let Some(cli_file) = cli_file {
        if cli_file.is_absolute() {
            return ConfigLocation::Explicit(cli_file.to_path_buf());
        }
        return ConfigLocation::Explicit(clean(cwd.join(cli_file)));
    }

    if let Some(found) = find_in_parent(cwd, default_filename) {
        return ConfigLocation::Found(found);
    }

    ConfigLocation::Default(clean(default_config_dir.join(default_filename)))
}
