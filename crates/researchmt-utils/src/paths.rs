use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

/// Config file names looked up in the config directory, in order.
pub const CONFIG_FILENAMES: [&str; 2] = ["research.toml", "research.json"];

/// `~/.rmt`
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("No home directory found"))?;
    Ok(home.join(".rmt"))
}

/// First of `filenames` that exists as a file inside `dir`.
pub fn find_config_in(dir: &Path, filenames: &[&str]) -> Option<PathBuf> {
    filenames
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Find the research config in the user's home `.rmt` directory.
pub fn find_config_in_home() -> Option<PathBuf> {
    let dir = config_dir().ok()?;
    find_config_in(&dir, &CONFIG_FILENAMES)
}

/// The explicit path when given, otherwise whatever `~/.rmt` holds.
pub fn resolve_config(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => find_config_in_home(),
    }
}
