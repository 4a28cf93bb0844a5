//! Locations the compendium reads from the environment.
//!
//! Two directories matter: the data directory holding one `<collection>.json`
//! per entity kind, and the defaults directory `seed` copies starter
//! collections from. The `resolve_*` functions take the raw inputs as
//! arguments; the `get_*` wrappers feed them from the process environment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Overrides the data directory.
pub const DATA_DIR_VAR: &str = "COMPENDIUM_DATA_DIR";
/// Overrides the directory of starter collections used by `seed`.
pub const DEFAULTS_DIR_VAR: &str = "COMPENDIUM_DEFAULTS_DIR";

const HOME_DATA_DIR: &str = ".config/compendium/data";
const LOCAL_DATA_DIR: &str = "./data";
const DEFAULTS_DIR_NAME: &str = "defaults";

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Data directory: `$COMPENDIUM_DATA_DIR`, else `$HOME/.config/compendium/data`,
/// else `./data`.
pub fn get_data_dir() -> PathBuf {
    resolve_data_dir(env_path(DATA_DIR_VAR), std::env::var_os("HOME"))
}

pub fn resolve_data_dir(override_dir: Option<PathBuf>, home: Option<OsString>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }
    match home.filter(|h| !h.is_empty()) {
        Some(home) => PathBuf::from(home).join(HOME_DATA_DIR),
        None => PathBuf::from(LOCAL_DATA_DIR),
    }
}

/// Starter collections shipped in the source tree.
pub fn bundled_defaults_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEFAULTS_DIR_NAME)
}

/// Defaults directory: `$COMPENDIUM_DEFAULTS_DIR`, else a `defaults/` directory
/// next to the running executable, else the copy in the source tree.
pub fn get_defaults_dir() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    resolve_defaults_dir(env_path(DEFAULTS_DIR_VAR), exe_dir.as_deref())
}

pub fn resolve_defaults_dir(override_dir: Option<PathBuf>, exe_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }
    exe_dir
        .map(|dir| dir.join(DEFAULTS_DIR_NAME))
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(bundled_defaults_dir)
}
