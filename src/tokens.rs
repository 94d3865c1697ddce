//! Pure token formatting for the engine's command-line grammar.
//!
//! Each formatter returns exactly the text a human would type for that
//! option, with its own trailing space, so rendered tokens can be
//! concatenated directly. `output` is the exception: it is always the last
//! token and carries no trailing space. Paths are double-quoted so spaces
//! survive.

use crate::types::{AudioCodec, Channel, Filter, Speed, VideoCodec, VideoSize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub(crate) fn input(path: &Path) -> String {
    format!("-i \"{}\" ", path.display())
}

/// Joins the segment paths into the engine's concat pseudo-URL. The `|`
/// delimiter is reserved; callers validate paths before reaching here.
pub(crate) fn input_concat(paths: &[PathBuf]) -> String {
    let joined = paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("|");
    format!("-i \"concat:{joined}\" ")
}

pub(crate) fn output(path: &Path) -> String {
    format!("\"{}\"", path.display())
}

/// A zero bitrate omits the `-b:v` token entirely.
pub(crate) fn video(codec: VideoCodec, bitrate_kbps: u32) -> String {
    let mut token = format!("-codec:v {} -pix_fmt yuv420p ", codec.ffmpeg_name());
    if bitrate_kbps > 0 {
        token.push_str(&format!("-b:v {bitrate_kbps}k "));
    }
    token
}

pub(crate) fn audio(codec: AudioCodec, bitrate_kbps: u32) -> String {
    format!(
        "-codec:a {} -b:a {}k -strict experimental ",
        codec.ffmpeg_name(),
        bitrate_kbps
    )
}

/// `Original` renders nothing; named sizes pin the height and let the
/// engine infer the width from the aspect ratio.
pub(crate) fn scale(target: VideoSize) -> String {
    match target.height() {
        Some(height) => format!("-vf scale=-1:{height} "),
        None => String::new(),
    }
}

pub(crate) fn size(width: u32, height: u32) -> String {
    format!("-s {width}x{height} ")
}

pub(crate) fn speed(preset: Speed) -> String {
    format!("-preset {} ", preset.preset_name())
}

pub(crate) fn cpu_speed(cpu_used: u32) -> String {
    format!("-quality good -cpu-used {cpu_used} -deadline realtime ")
}

pub(crate) fn threads(count: u32) -> String {
    format!("-threads {count} ")
}

pub(crate) fn seek(position: Duration) -> String {
    format!("-ss {} ", format_timestamp(position))
}

pub(crate) fn frame_output_count(count: u32) -> String {
    format!("-vframes {count} ")
}

pub(crate) fn frame_rate(fps: f64) -> String {
    format!("-r {fps} ")
}

pub(crate) fn start_number(first: u32) -> String {
    format!("-start_number {first} ")
}

pub(crate) fn loop_count(count: u32) -> String {
    format!("-loop {count} ")
}

pub(crate) fn shortest(applicable: bool) -> String {
    if applicable {
        "-shortest ".to_string()
    } else {
        String::new()
    }
}

pub(crate) fn copy(channel: Channel) -> String {
    match channel {
        Channel::Audio => "-c:a copy ".to_string(),
        Channel::Video => "-c:v copy ".to_string(),
        Channel::Both => "-c copy ".to_string(),
    }
}

pub(crate) fn force_format(codec: VideoCodec) -> String {
    format!("-f {} ", codec.ffmpeg_name())
}

/// Panics on `Channel::Both`: a bitstream filter applies to exactly one
/// stream, so that value is a caller bug.
pub(crate) fn bit_stream_filter(channel: Channel, filter: Filter) -> String {
    match channel {
        Channel::Audio => format!("-bsf:a {} ", filter.ffmpeg_name()),
        Channel::Video => format!("-bsf:v {} ", filter.ffmpeg_name()),
        Channel::Both => panic!("bitstream filter requires a single channel"),
    }
}

/// Renders `-an ` / `-vn `. Panics on `Channel::Both`: disabling every
/// stream is a caller bug.
pub(crate) fn disable(channel: Channel) -> String {
    match channel {
        Channel::Audio => "-an ".to_string(),
        Channel::Video => "-vn ".to_string(),
        Channel::Both => panic!("disable requires a single channel"),
    }
}

pub(crate) fn overwrite() -> String {
    "-y".to_string()
}

/// `HH:MM:SS`, with `.mmm` appended only when the position has a
/// sub-second component.
pub(crate) fn format_timestamp(position: Duration) -> String {
    let total_secs = position.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = position.subsec_millis();
    if millis > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn input_quotes_path() {
        assert_eq!(input(Path::new("sample.mp4")), "-i \"sample.mp4\" ");
        assert_eq!(
            input(Path::new("/tmp/my clip.mp4")),
            "-i \"/tmp/my clip.mp4\" "
        );
    }

    #[test]
    fn output_has_no_trailing_space() {
        assert_eq!(output(Path::new("out.mp4")), "\"out.mp4\"");
    }

    #[test]
    fn concat_joins_with_pipe() {
        let paths = vec![PathBuf::from("a.ts"), PathBuf::from("b.ts")];
        assert_eq!(input_concat(&paths), "-i \"concat:a.ts|b.ts\" ");
    }

    #[test]
    fn video_with_and_without_bitrate() {
        assert_eq!(
            video(VideoCodec::LibX264, 0),
            "-codec:v libx264 -pix_fmt yuv420p "
        );
        assert_eq!(
            video(VideoCodec::LibX264, 2400),
            "-codec:v libx264 -pix_fmt yuv420p -b:v 2400k "
        );
    }

    #[test]
    fn audio_includes_strict_experimental() {
        assert_eq!(
            audio(AudioCodec::Aac, 128),
            "-codec:a aac -b:a 128k -strict experimental "
        );
    }

    #[test]
    fn scale_original_is_empty() {
        assert_eq!(scale(VideoSize::Original), "");
    }

    #[test]
    fn scale_named_size_pins_height() {
        assert_eq!(scale(VideoSize::Hd), "-vf scale=-1:720 ");
        assert_eq!(scale(VideoSize::FullHd), "-vf scale=-1:1080 ");
    }

    #[test]
    fn fixed_size_token() {
        assert_eq!(size(300, 169), "-s 300x169 ");
    }

    #[test]
    fn speed_and_cpu_speed() {
        assert_eq!(speed(Speed::SuperFast), "-preset superfast ");
        assert_eq!(
            cpu_speed(16),
            "-quality good -cpu-used 16 -deadline realtime "
        );
    }

    #[test]
    fn copy_per_channel() {
        assert_eq!(copy(Channel::Audio), "-c:a copy ");
        assert_eq!(copy(Channel::Video), "-c:v copy ");
        assert_eq!(copy(Channel::Both), "-c copy ");
    }

    #[test]
    fn bit_stream_filter_per_channel() {
        assert_eq!(
            bit_stream_filter(Channel::Video, Filter::H264Mp4ToAnnexB),
            "-bsf:v h264_mp4toannexb "
        );
        assert_eq!(
            bit_stream_filter(Channel::Audio, Filter::AacAdtstoasc),
            "-bsf:a aac_adtstoasc "
        );
    }

    #[test]
    #[should_panic(expected = "single channel")]
    fn bit_stream_filter_rejects_both() {
        bit_stream_filter(Channel::Both, Filter::AacAdtstoasc);
    }

    #[test]
    fn disable_per_channel() {
        assert_eq!(disable(Channel::Audio), "-an ");
        assert_eq!(disable(Channel::Video), "-vn ");
    }

    #[test]
    #[should_panic(expected = "single channel")]
    fn disable_rejects_both() {
        disable(Channel::Both);
    }

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(Duration::from_secs(7)), "00:00:07");
        assert_eq!(format_timestamp(Duration::from_secs(3661)), "01:01:01");
        assert_eq!(
            format_timestamp(Duration::from_millis(5500)),
            "00:00:05.500"
        );
    }

    #[test]
    fn seek_uses_timestamp_form() {
        assert_eq!(seek(Duration::from_secs(7)), "-ss 00:00:07 ");
    }

    #[test]
    fn frame_rate_full_precision() {
        assert_eq!(frame_rate(30.0), "-r 30 ");
        assert_eq!(frame_rate(29.97), "-r 29.97 ");
    }

    #[test]
    fn misc_tokens() {
        assert_eq!(threads(4), "-threads 4 ");
        assert_eq!(frame_output_count(1), "-vframes 1 ");
        assert_eq!(start_number(0), "-start_number 0 ");
        assert_eq!(loop_count(1), "-loop 1 ");
        assert_eq!(shortest(true), "-shortest ");
        assert_eq!(shortest(false), "");
        assert_eq!(force_format(VideoCodec::MpegTs), "-f mpegts ");
        assert_eq!(overwrite(), "-y");
    }
}
