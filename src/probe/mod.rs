//! Media probing via the external probing tool.
//!
//! [`Ffprobe`] shells out to the probing tool with a JSON report request
//! and condenses the answer into a [`MediaInfo`]: one video stream, an
//! optional audio stream, and the derived duration/size/ratio facts that
//! the conversion operations consume.

mod ffprobe;
mod types;

pub use types::MediaInfo;

use crate::builder;
use crate::error::{Error, Result};
use crate::tools::{self, ToolsConfig};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Wrapper around the probing tool.
#[derive(Debug)]
pub struct Ffprobe {
    ffprobe_path: PathBuf,
}

impl Ffprobe {
    /// Resolves the probing binary up front; a missing tool is reported
    /// here, not at the first probe.
    pub fn new(config: &ToolsConfig) -> Result<Self> {
        Ok(Self {
            ffprobe_path: tools::resolve_tool(tools::FFPROBE, config)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.ffprobe_path
    }

    /// Probes a media file.
    pub fn probe(&self, media: &Path) -> Result<MediaInfo> {
        builder::ensure_input_exists(media)?;
        tracing::debug!(media = %media.display(), "probing media");

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_streams"])
            .arg(media)
            .output()?;
        if !output.status.success() {
            return Err(Error::parse_error(
                tools::FFPROBE,
                format!("probe exited with {}", output.status),
            ));
        }

        let json = String::from_utf8(output.stdout)
            .map_err(|e| Error::parse_error(tools::FFPROBE, format!("invalid UTF-8: {e}")))?;
        ffprobe::parse_media_info(media, &json)
    }
}
