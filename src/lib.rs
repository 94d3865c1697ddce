//! # ffshell
//!
//! Typed command-line assembly and process supervision for the FFmpeg
//! tools.
//!
//! This crate provides functionality for:
//! - Building engine argument strings from typed, kind-unique tokens
//! - Supervising conversion runs with stop/kill control and progress
//!   reporting
//! - Probing media files with ffprobe to extract stream metadata
//! - Ready-made conversions: MP4/WebM/Ogv/TS targets, snapshots, joins,
//!   stream muting, audio extraction and replacement
//!
//! ## Example
//!
//! ```no_run
//! use ffshell::{ConversionOptions, Ffmpeg, Ffprobe, ToolsConfig};
//! use std::path::Path;
//!
//! let config = ToolsConfig::default();
//! let probe = Ffprobe::new(&config)?;
//! let source = probe.probe(Path::new("clip.avi"))?;
//!
//! let engine = Ffmpeg::new(&config)?;
//! engine.to_mp4(
//!     &source,
//!     Path::new("clip.mp4"),
//!     &ConversionOptions::default(),
//!     None,
//! )?;
//! # Ok::<(), ffshell::Error>(())
//! ```

mod argument;
mod builder;
mod container;
mod convert;
mod error;
pub mod probe;
mod progress;
mod supervisor;
mod tokens;
mod tools;
pub mod types;

// Re-exports
pub use argument::{Argument, Kind, KindSet};
pub use builder::{build_arguments, build_arguments_filtered, build_arguments_with_io};
pub use container::ArgumentContainer;
pub use convert::ConversionOptions;
pub use error::{Error, Result};
pub use probe::{Ffprobe, MediaInfo};
pub use supervisor::{Ffmpeg, ProgressHook, RunState};
pub use tools::ToolsConfig;
pub use types::{
    AudioCodec, AudioQuality, Channel, Filter, Speed, VideoCodec, VideoSize, VideoType,
};
