use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};

use crate::sqlite::DATABASE_FILE_NAME;

pub const DEFAULT_DATA_DIR_NAME: &str = "data";
pub const BACKUP_DIR_NAME: &str = "backups";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    pub cwd: PathBuf,
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub backup_dir: PathBuf,
}

impl RuntimePaths {
    /// Paths rooted at an already resolved data directory.
    #[must_use]
    pub fn for_data_dir(cwd: &Path, data_dir: &Path) -> Self {
        let data_dir = normalize_lexical(data_dir);
        Self {
            cwd: normalize_lexical(cwd),
            database_path: data_dir.join(DATABASE_FILE_NAME),
            backup_dir: data_dir.join(BACKUP_DIR_NAME),
            data_dir,
        }
    }
}

/// Directory the default `data/` lives in: the parent of the directory
/// holding `executable`, so `<root>/bin/analyze-data` reads
/// `<root>/data/veritabani.db` regardless of the working directory.
pub fn install_root(executable: &Path) -> Result<PathBuf> {
    if !executable.is_absolute() {
        bail!("executable path must be absolute: {}", executable.display());
    }

    let executable = normalize_lexical(executable);
    let Some(bin_dir) = executable.parent() else {
        bail!(
            "executable path has no parent directory: {}",
            executable.display()
        );
    };
    let root = bin_dir.parent().unwrap_or(bin_dir);
    Ok(normalize_lexical(root))
}

/// `data_root` holds the default `data/` directory; relative `--data-dir`
/// overrides resolve against `cwd`.
pub fn resolve_runtime_paths(
    home_dir: Option<&Path>,
    cwd: &Path,
    data_root: &Path,
    data_dir_override: Option<&Path>,
) -> Result<RuntimePaths> {
    if !cwd.is_absolute() {
        bail!("cwd must be absolute: {}", cwd.display());
    }
    if !data_root.is_absolute() {
        bail!("data root must be absolute: {}", data_root.display());
    }
    if let Some(home_dir) = home_dir
        && !home_dir.is_absolute()
    {
        bail!("home_dir must be absolute: {}", home_dir.display());
    }

    let cwd = normalize_lexical(cwd);
    let data_dir = match data_dir_override {
        Some(path) => resolve_user_path(path, home_dir, &cwd)?,
        None => normalize_lexical(data_root).join(DEFAULT_DATA_DIR_NAME),
    };

    Ok(RuntimePaths::for_data_dir(&cwd, &data_dir))
}

fn resolve_user_path(path: &Path, home_dir: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path, home_dir)?;
    let resolved = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };

    Ok(normalize_lexical(&resolved))
}

fn expand_tilde(path: &Path, home_dir: Option<&Path>) -> Result<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let Some(home_dir) = home_dir else {
                bail!(
                    "cannot expand `~` without a home directory; pass --home-dir: {}",
                    path.display()
                );
            };
            let mut expanded = normalize_lexical(home_dir);
            for component in components {
                expanded.push(component.as_os_str());
            }
            Ok(expanded)
        }
        Some(Component::Normal(first))
            if first
                .to_str()
                .is_some_and(|segment| segment.starts_with('~')) =>
        {
            bail!(
                "unsupported home expansion syntax (only `~` and `~/...` are supported): {}",
                path.display()
            )
        }
        _ => Ok(path.to_path_buf()),
    }
}

fn normalize_lexical(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component.as_os_str());
                }
            }
            _ => normalized.push(component.as_os_str()),
        }
    }

    normalized
}
