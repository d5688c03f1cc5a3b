//! Filesystem layout under `~/.deepcode-ui`.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Root data directory: `~/.deepcode-ui`.
pub fn data_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".deepcode-ui"))
}

/// Default config file: `~/.deepcode-ui/config.yaml`.
pub fn config_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("config.yaml"))
}

/// Per-project session directory: `~/.deepcode-ui/projects/<name>`.
pub fn project_dir(project_name: &str) -> Result<PathBuf> {
    Ok(data_dir()?.join("projects").join(project_name))
}

/// Gate session file: `~/.deepcode-ui/projects/<name>/session.json`.
pub fn session_path(project_name: &str) -> Result<PathBuf> {
    Ok(project_dir(project_name)?.join("session.json"))
}

/// Structured log directory: `~/.deepcode-ui/logs`.
pub fn logs_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_home_relative() {
        let session = session_path("demo").unwrap();
        let session_str = session.to_string_lossy();
        assert!(session_str.contains(".deepcode-ui"), "got: {}", session_str);
        assert!(
            session_str.ends_with("projects/demo/session.json"),
            "got: {}",
            session_str
        );
        assert!(logs_dir().unwrap().ends_with(".deepcode-ui/logs"));
        assert!(config_path().unwrap().ends_with(".deepcode-ui/config.yaml"));
    }
}
