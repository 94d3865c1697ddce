//! Option enumerations shared by the argument layer and the conversion
//! operations. Each maps onto the exact lower-case name the engine expects.

/// Video encoders the argument layer can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCodec {
    /// x264 software H.264 encoder
    LibX264,
    /// libvpx VP8 encoder
    LibVpx,
    /// Theora encoder
    LibTheora,
    /// PNG image output
    Png,
    /// MPEG transport stream muxer (used with ForceFormat)
    MpegTs,
    /// Raw H.264 encoder name
    H264,
}

impl VideoCodec {
    /// Get the ffmpeg codec name.
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            VideoCodec::LibX264 => "libx264",
            VideoCodec::LibVpx => "libvpx",
            VideoCodec::LibTheora => "libtheora",
            VideoCodec::Png => "png",
            VideoCodec::MpegTs => "mpegts",
            VideoCodec::H264 => "h264",
        }
    }

    /// Get the container extension this codec conventionally produces.
    pub fn canonical_extension(&self) -> &'static str {
        match self {
            VideoCodec::LibX264 | VideoCodec::H264 => ".mp4",
            VideoCodec::LibVpx => ".webm",
            VideoCodec::LibTheora => ".ogv",
            VideoCodec::Png => ".png",
            VideoCodec::MpegTs => ".ts",
        }
    }
}

/// Audio encoders the argument layer can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCodec {
    /// AAC (Advanced Audio Coding) - widely compatible
    Aac,
    /// Vorbis encoder, used for WebM/OGV outputs
    LibVorbis,
}

impl AudioCodec {
    /// Get the ffmpeg codec name.
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            AudioCodec::Aac => "aac",
            AudioCodec::LibVorbis => "libvorbis",
        }
    }
}

/// Bitstream filters applied when remuxing between containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Convert H.264 from MP4 length-prefixed form to Annex B.
    H264Mp4ToAnnexB,
    /// Convert AAC from ADTS framing to ASC.
    AacAdtstoasc,
}

impl Filter {
    /// Get the ffmpeg filter name.
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            Filter::H264Mp4ToAnnexB => "h264_mp4toannexb",
            Filter::AacAdtstoasc => "aac_adtstoasc",
        }
    }
}

/// Stream scope for channel-specific flags (copy, disable, bitstream filter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Audio,
    Video,
    Both,
}

/// x264 encoding presets, slowest to fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    VerySlow,
    Slower,
    Slow,
    Medium,
    Fast,
    Faster,
    VeryFast,
    SuperFast,
    UltraFast,
}

impl Speed {
    /// Get the preset name the engine expects.
    pub fn preset_name(&self) -> &'static str {
        match self {
            Speed::VerySlow => "veryslow",
            Speed::Slower => "slower",
            Speed::Slow => "slow",
            Speed::Medium => "medium",
            Speed::Fast => "fast",
            Speed::Faster => "faster",
            Speed::VeryFast => "veryfast",
            Speed::SuperFast => "superfast",
            Speed::UltraFast => "ultrafast",
        }
    }
}

/// Named output heights, plus a sentinel that leaves the source untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSize {
    FullHd,
    Hd,
    Ed,
    Ld,
    /// Keep the source dimensions; no scale filter is emitted.
    Original,
}

impl VideoSize {
    /// Target height in pixels, or `None` for `Original`.
    pub fn height(&self) -> Option<u32> {
        match self {
            VideoSize::FullHd => Some(1080),
            VideoSize::Hd => Some(720),
            VideoSize::Ed => Some(480),
            VideoSize::Ld => Some(360),
            VideoSize::Original => None,
        }
    }
}

/// Audio bitrate tiers in kbit/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioQuality {
    Ultra,
    Hd,
    Normal,
    Low,
}

impl AudioQuality {
    /// Bitrate in kbit/s.
    pub fn bitrate_kbps(&self) -> u32 {
        match self {
            AudioQuality::Ultra => 320,
            AudioQuality::Hd => 256,
            AudioQuality::Normal => 128,
            AudioQuality::Low => 64,
        }
    }
}

/// Target container formats for the conversion operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoType {
    Mp4,
    Ogv,
    Ts,
    WebM,
}

impl VideoType {
    /// File extension for this container, dot included.
    pub fn extension(&self) -> &'static str {
        match self {
            VideoType::Mp4 => ".mp4",
            VideoType::Ogv => ".ogv",
            VideoType::Ts => ".ts",
            VideoType::WebM => ".webm",
        }
    }
}
