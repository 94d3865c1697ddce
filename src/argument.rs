//! Typed command-line arguments and their identity kinds.
//!
//! An [`Argument`] pairs a validated payload with a [`Kind`] that names the
//! option it renders. Containers key uniqueness off the kind, and build
//! passes can restrict themselves to a [`KindSet`].

use crate::tokens;
use crate::types::{AudioCodec, AudioQuality, Channel, Filter, Speed, VideoCodec, VideoSize};
use std::path::PathBuf;
use std::time::Duration;

/// Identity of an argument. A container holds at most one argument of each
/// kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Input,
    Output,
    Concat,
    VideoCodec,
    AudioCodec,
    Scale,
    Size,
    Speed,
    CpuSpeed,
    Threads,
    Seek,
    FrameOutputCount,
    FrameRate,
    StartNumber,
    Loop,
    Shortest,
    Copy,
    ForceFormat,
    BitStreamFilter,
    Override,
}

/// A set of [`Kind`]s packed into a bitmask.
///
/// Used to tell a build pass which middle arguments to keep; endpoints
/// (input, concat, output) are governed by the pass itself, not the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSet(u32);

impl KindSet {
    pub const fn empty() -> Self {
        KindSet(0)
    }

    pub const fn all() -> Self {
        KindSet(u32::MAX)
    }

    pub fn of(kinds: &[Kind]) -> Self {
        kinds.iter().fold(Self::empty(), |set, &kind| set.with(kind))
    }

    #[must_use]
    pub fn with(self, kind: Kind) -> Self {
        KindSet(self.0 | (1 << kind as u32))
    }

    pub fn contains(self, kind: Kind) -> bool {
        self.0 & (1 << kind as u32) != 0
    }
}

/// One engine option with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Input(PathBuf),
    Output(PathBuf),
    Concat(Vec<PathBuf>),
    VideoCodec { codec: VideoCodec, bitrate_kbps: u32 },
    AudioCodec { codec: AudioCodec, bitrate_kbps: u32 },
    Scale(VideoSize),
    Size { width: u32, height: u32 },
    Speed(Speed),
    CpuSpeed(u32),
    Threads(u32),
    Seek(Duration),
    FrameOutputCount(u32),
    FrameRate(f64),
    StartNumber(u32),
    Loop(u32),
    Shortest(bool),
    Copy(Channel),
    ForceFormat(VideoCodec),
    BitStreamFilter { channel: Channel, filter: Filter },
    Override,
}

impl Argument {
    pub fn input(path: impl Into<PathBuf>) -> Self {
        Argument::Input(path.into())
    }

    pub fn output(path: impl Into<PathBuf>) -> Self {
        Argument::Output(path.into())
    }

    pub fn concat(paths: Vec<PathBuf>) -> Self {
        Argument::Concat(paths)
    }

    /// Codec without an explicit bitrate; the `-b:v` token is omitted.
    pub fn video_codec(codec: VideoCodec) -> Self {
        Argument::VideoCodec {
            codec,
            bitrate_kbps: 0,
        }
    }

    pub fn video_codec_with_bitrate(codec: VideoCodec, bitrate_kbps: u32) -> Self {
        Argument::VideoCodec {
            codec,
            bitrate_kbps,
        }
    }

    pub fn audio_codec(codec: AudioCodec, quality: AudioQuality) -> Self {
        Argument::AudioCodec {
            codec,
            bitrate_kbps: quality.bitrate_kbps(),
        }
    }

    pub fn audio_codec_with_bitrate(codec: AudioCodec, bitrate_kbps: u32) -> Self {
        Argument::AudioCodec {
            codec,
            bitrate_kbps,
        }
    }

    pub fn scale(target: VideoSize) -> Self {
        Argument::Scale(target)
    }

    pub fn size(width: u32, height: u32) -> Self {
        Argument::Size { width, height }
    }

    pub fn speed(preset: Speed) -> Self {
        Argument::Speed(preset)
    }

    pub fn cpu_speed(cpu_used: u32) -> Self {
        Argument::CpuSpeed(cpu_used)
    }

    pub fn threads(count: u32) -> Self {
        Argument::Threads(count)
    }

    /// One worker thread per logical core on this machine.
    pub fn multithreaded() -> Self {
        Argument::Threads(num_cpus::get() as u32)
    }

    pub fn seek(position: Duration) -> Self {
        Argument::Seek(position)
    }

    pub fn frame_output_count(count: u32) -> Self {
        Argument::FrameOutputCount(count)
    }

    pub fn frame_rate(fps: f64) -> Self {
        Argument::FrameRate(fps)
    }

    pub fn start_number(first: u32) -> Self {
        Argument::StartNumber(first)
    }

    pub fn loop_count(count: u32) -> Self {
        Argument::Loop(count)
    }

    pub fn shortest(applicable: bool) -> Self {
        Argument::Shortest(applicable)
    }

    pub fn copy(channel: Channel) -> Self {
        Argument::Copy(channel)
    }

    pub fn force_format(codec: VideoCodec) -> Self {
        Argument::ForceFormat(codec)
    }

    /// Panics on `Channel::Both`: a bitstream filter applies to exactly one
    /// stream.
    pub fn bit_stream_filter(channel: Channel, filter: Filter) -> Self {
        assert!(
            channel != Channel::Both,
            "bitstream filter requires a single channel"
        );
        Argument::BitStreamFilter { channel, filter }
    }

    pub fn overwrite() -> Self {
        Argument::Override
    }

    pub fn kind(&self) -> Kind {
        match self {
            Argument::Input(_) => Kind::Input,
            Argument::Output(_) => Kind::Output,
            Argument::Concat(_) => Kind::Concat,
            Argument::VideoCodec { .. } => Kind::VideoCodec,
            Argument::AudioCodec { .. } => Kind::AudioCodec,
            Argument::Scale(_) => Kind::Scale,
            Argument::Size { .. } => Kind::Size,
            Argument::Speed(_) => Kind::Speed,
            Argument::CpuSpeed(_) => Kind::CpuSpeed,
            Argument::Threads(_) => Kind::Threads,
            Argument::Seek(_) => Kind::Seek,
            Argument::FrameOutputCount(_) => Kind::FrameOutputCount,
            Argument::FrameRate(_) => Kind::FrameRate,
            Argument::StartNumber(_) => Kind::StartNumber,
            Argument::Loop(_) => Kind::Loop,
            Argument::Shortest(_) => Kind::Shortest,
            Argument::Copy(_) => Kind::Copy,
            Argument::ForceFormat(_) => Kind::ForceFormat,
            Argument::BitStreamFilter { .. } => Kind::BitStreamFilter,
            Argument::Override => Kind::Override,
        }
    }

    /// Renders this argument as command-line text, trailing space included
    /// except for [`Argument::Output`] and [`Argument::Override`].
    pub fn render(&self) -> String {
        match self {
            Argument::Input(path) => tokens::input(path),
            Argument::Output(path) => tokens::output(path),
            Argument::Concat(paths) => tokens::input_concat(paths),
            Argument::VideoCodec {
                codec,
                bitrate_kbps,
            } => tokens::video(*codec, *bitrate_kbps),
            Argument::AudioCodec {
                codec,
                bitrate_kbps,
            } => tokens::audio(*codec, *bitrate_kbps),
            Argument::Scale(target) => tokens::scale(*target),
            Argument::Size { width, height } => tokens::size(*width, *height),
            Argument::Speed(preset) => tokens::speed(*preset),
            Argument::CpuSpeed(cpu_used) => tokens::cpu_speed(*cpu_used),
            Argument::Threads(count) => tokens::threads(*count),
            Argument::Seek(position) => tokens::seek(*position),
            Argument::FrameOutputCount(count) => tokens::frame_output_count(*count),
            Argument::FrameRate(fps) => tokens::frame_rate(*fps),
            Argument::StartNumber(first) => tokens::start_number(*first),
            Argument::Loop(count) => tokens::loop_count(*count),
            Argument::Shortest(applicable) => tokens::shortest(*applicable),
            Argument::Copy(channel) => tokens::copy(*channel),
            Argument::ForceFormat(codec) => tokens::force_format(*codec),
            Argument::BitStreamFilter { channel, filter } => {
                tokens::bit_stream_filter(*channel, *filter)
            }
            Argument::Override => tokens::overwrite(),
        }
    }
}
