//! External tool configuration and discovery.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub(crate) const FFMPEG: &str = "ffmpeg";
pub(crate) const FFPROBE: &str = "ffprobe";

/// Where to find the engine binaries.
///
/// When `binary_dir` is set, each tool must exist in that directory under
/// its platform-specific executable name. When unset, tools are discovered
/// on `PATH`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub binary_dir: Option<PathBuf>,
}

/// Platform-specific executable file name for a tool.
pub(crate) fn executable_name(tool: &str) -> String {
    if cfg!(windows) {
        format!("{tool}.exe")
    } else {
        tool.to_string()
    }
}

/// Resolves a tool executable, preferring the configured root over `PATH`.
///
/// A configured root is authoritative: a tool missing from it is reported
/// as [`Error::DependencyMissing`] without falling back to `PATH`.
pub(crate) fn resolve_tool(tool: &str, config: &ToolsConfig) -> Result<PathBuf> {
    match &config.binary_dir {
        Some(root) => {
            let candidate = root.join(executable_name(tool));
            if candidate.exists() {
                Ok(candidate)
            } else {
                Err(Error::dependency_missing(tool, candidate))
            }
        }
        None => which::which(tool).map_err(|_| Error::dependency_missing(tool, "PATH")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;

    #[test]
    fn executable_name_follows_platform() {
        if cfg!(windows) {
            assert_eq!(executable_name("ffmpeg"), "ffmpeg.exe");
        } else {
            assert_eq!(executable_name("ffmpeg"), "ffmpeg");
        }
    }

    #[test]
    fn configured_root_resolves_existing_tool() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join(executable_name("ffmpeg"));
        fs::write(&exe, b"").unwrap();

        let config = ToolsConfig {
            binary_dir: Some(dir.path().to_path_buf()),
        };
        assert_eq!(resolve_tool("ffmpeg", &config).unwrap(), exe);
    }

    #[test]
    fn configured_root_without_tool_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolsConfig {
            binary_dir: Some(dir.path().to_path_buf()),
        };
        let err = resolve_tool("ffmpeg", &config).unwrap_err();
        assert_matches!(err, Error::DependencyMissing { tool, .. } if tool == "ffmpeg");
    }

    #[test]
    fn path_lookup_reports_missing_tool() {
        let config = ToolsConfig::default();
        let err = resolve_tool("nonexistent_tool_12345", &config).unwrap_err();
        assert_matches!(err, Error::DependencyMissing { .. });
    }

    #[test]
    fn config_deserializes_with_and_without_root() {
        let config: ToolsConfig = serde_json::from_str(r#"{"binary_dir": "/opt/ff"}"#).unwrap();
        assert_eq!(config.binary_dir, Some(PathBuf::from("/opt/ff")));

        let config: ToolsConfig = serde_json::from_str("{}").unwrap();
        assert!(config.binary_dir.is_none());
    }
}
