//! Probing-tool report parsing.

use super::types::MediaInfo;
use crate::error::{Error, Result};
use crate::tools;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    duration: Option<String>,
    bit_rate: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

/// Builds a [`MediaInfo`] from the probing tool's JSON report.
///
/// The first stream of each codec type describes the file. A report without
/// a fully parsable video stream is rejected; an audio stream that is
/// absent or missing facts is treated as "no audio track present".
pub(crate) fn parse_media_info(path: &Path, json: &str) -> Result<MediaInfo> {
    let report: FfprobeOutput = serde_json::from_str(json)?;

    let video = report
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| Error::parse_error(tools::FFPROBE, "no video stream in report"))?;
    let audio = report
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"));

    let video_format = video
        .codec_name
        .clone()
        .ok_or_else(|| missing_video_field("codec_name"))?;
    let duration_secs = required_video_number(video.duration.as_deref(), "duration")?;
    let bit_rate = required_video_number(video.bit_rate.as_deref(), "bit_rate")?;
    let width = video.width.ok_or_else(|| missing_video_field("width"))?;
    let height = video.height.ok_or_else(|| missing_video_field("height"))?;
    let frame_rate = video
        .r_frame_rate
        .as_deref()
        .ok_or_else(|| missing_video_field("r_frame_rate"))
        .and_then(parse_fraction)?;

    // An audio track only counts when every needed fact parses.
    let audio_facts = audio.and_then(|stream| {
        let codec = stream.codec_name.clone()?;
        let duration = parse_number(stream.duration.as_deref())?;
        let bit_rate = parse_number(stream.bit_rate.as_deref())?;
        Some((codec, duration, bit_rate))
    });

    let mut size_mb = bit_rate * duration_secs / 8_388_608.0;
    if let Some((_, audio_duration, audio_bit_rate)) = &audio_facts {
        size_mb += audio_bit_rate * audio_duration / 8_388_608.0;
    }

    Ok(MediaInfo {
        path: path.to_path_buf(),
        duration: Duration::from_secs(duration_secs as u64),
        size_mb: round2(size_mb),
        video_format,
        audio_format: audio_facts.map(|(codec, _, _)| codec),
        width,
        height,
        ratio: reduced_ratio(width, height),
        frame_rate,
    })
}

fn parse_number(field: Option<&str>) -> Option<f64> {
    field.and_then(|s| s.trim().parse().ok())
}

fn required_video_number(field: Option<&str>, name: &str) -> Result<f64> {
    parse_number(field).ok_or_else(|| missing_video_field(name))
}

fn missing_video_field(name: &str) -> Error {
    Error::parse_error(tools::FFPROBE, format!("video stream missing {name}"))
}

/// Parses the tool's `num/den` frame-rate fraction, rounded to three
/// decimals.
fn parse_fraction(value: &str) -> Result<f64> {
    let malformed = || Error::parse_error(tools::FFPROBE, format!("malformed frame rate: {value}"));
    let (num, den) = value.split_once('/').ok_or_else(malformed)?;
    let num: f64 = num.trim().parse().map_err(|_| malformed())?;
    let den: f64 = den.trim().parse().map_err(|_| malformed())?;
    if den == 0.0 {
        return Err(malformed());
    }
    Ok(round3(num / den))
}

fn reduced_ratio(width: u32, height: u32) -> String {
    let divisor = gcd(width, height);
    if divisor == 0 {
        return "0:0".to_string();
    }
    format!("{}:{}", width / divisor, height / divisor)
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }
    a
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
