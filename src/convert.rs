//! High-level conversion operations.
//!
//! Each operation assembles its token chain through the container/builder
//! pipeline where the chain is kind-unique and free of pre-input options,
//! and composes stringifier tokens directly where the engine's positional
//! grammar rules that out (looped inputs, duplicate inputs, stream
//! disabling). Every operation validates its file preconditions before the
//! engine spawns.

use crate::argument::Argument;
use crate::builder;
use crate::container::ArgumentContainer;
use crate::error::{Error, Result};
use crate::probe::MediaInfo;
use crate::supervisor::{Ffmpeg, ProgressHook};
use crate::tokens;
use crate::types::{
    AudioCodec, AudioQuality, Channel, Filter, Speed, VideoCodec, VideoSize, VideoType,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Video bitrate applied by the lossy web conversions, in kbit/s.
const VIDEO_BITRATE_KBPS: u32 = 2400;

/// `-cpu-used` level for the realtime VP8 and Theora encodes.
const REALTIME_CPU_USED: u32 = 16;

/// Shared tunables for the web conversion targets.
///
/// The defaults describe a fast preview encode: `superfast` preset, source
/// resolution, 128 kbit/s audio, a single encoder thread.
#[derive(Debug, Clone, Copy)]
pub struct ConversionOptions {
    /// x264 preset trading encode speed against compression.
    pub speed: Speed,
    /// Target height; `Original` keeps the source resolution.
    pub size: VideoSize,
    /// Audio bitrate tier.
    pub audio_quality: AudioQuality,
    /// Spread the encode across all CPUs instead of one thread.
    pub multithread: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            speed: Speed::SuperFast,
            size: VideoSize::Original,
            audio_quality: AudioQuality::Normal,
            multithread: false,
        }
    }
}

impl Ffmpeg {
    /// Captures a single PNG frame from `source`.
    ///
    /// `capture_time` defaults to one third of the source duration and
    /// `size` to the source dimensions. The output must end in `.png`.
    pub fn snapshot(
        &self,
        source: &MediaInfo,
        output: &Path,
        size: Option<(u32, u32)>,
        capture_time: Option<Duration>,
    ) -> Result<()> {
        let capture = capture_time.unwrap_or(source.duration / 3);
        let (width, height) = size.unwrap_or_else(|| source.dimensions());

        let mut chain = ArgumentContainer::new();
        chain.add(Argument::video_codec(VideoCodec::Png))?;
        chain.add(Argument::frame_output_count(1))?;
        chain.add(Argument::seek(capture))?;
        chain.add(Argument::size(width, height))?;
        let arguments = builder::build_arguments_with_io(&chain, &source.path, output)?;
        self.run(&arguments, output)
    }

    /// Converts `source` to H.264/AAC in an MP4 container.
    pub fn to_mp4(
        &self,
        source: &MediaInfo,
        output: &Path,
        options: &ConversionOptions,
        progress: Option<ProgressHook>,
    ) -> Result<()> {
        let mut chain = ArgumentContainer::new();
        chain.add(thread_argument(options.multithread))?;
        chain.add(Argument::scale(options.size))?;
        chain.add(Argument::video_codec_with_bitrate(
            VideoCodec::LibX264,
            VIDEO_BITRATE_KBPS,
        ))?;
        chain.add(Argument::speed(options.speed))?;
        chain.add(Argument::audio_codec(AudioCodec::Aac, options.audio_quality))?;
        let arguments = builder::build_arguments_with_io(&chain, &source.path, output)?;
        self.run_conversion(&arguments, output, source, progress)
    }

    /// Converts `source` to VP8/Vorbis in a WebM container.
    ///
    /// libvpx manages its own worker threads, so the thread-count option is
    /// not part of this chain.
    pub fn to_webm(
        &self,
        source: &MediaInfo,
        output: &Path,
        options: &ConversionOptions,
        progress: Option<ProgressHook>,
    ) -> Result<()> {
        let mut chain = ArgumentContainer::new();
        chain.add(Argument::scale(options.size))?;
        chain.add(Argument::video_codec_with_bitrate(
            VideoCodec::LibVpx,
            VIDEO_BITRATE_KBPS,
        ))?;
        chain.add(Argument::cpu_speed(REALTIME_CPU_USED))?;
        chain.add(Argument::audio_codec(
            AudioCodec::LibVorbis,
            options.audio_quality,
        ))?;
        let arguments = builder::build_arguments_with_io(&chain, &source.path, output)?;
        self.run_conversion(&arguments, output, source, progress)
    }

    /// Converts `source` to Theora/Vorbis in an Ogg container.
    pub fn to_ogv(
        &self,
        source: &MediaInfo,
        output: &Path,
        options: &ConversionOptions,
        progress: Option<ProgressHook>,
    ) -> Result<()> {
        let mut chain = ArgumentContainer::new();
        chain.add(thread_argument(options.multithread))?;
        chain.add(Argument::scale(options.size))?;
        chain.add(Argument::video_codec_with_bitrate(
            VideoCodec::LibTheora,
            VIDEO_BITRATE_KBPS,
        ))?;
        chain.add(Argument::cpu_speed(REALTIME_CPU_USED))?;
        chain.add(Argument::audio_codec(
            AudioCodec::LibVorbis,
            options.audio_quality,
        ))?;
        let arguments = builder::build_arguments_with_io(&chain, &source.path, output)?;
        self.run_conversion(&arguments, output, source, progress)
    }

    /// Remuxes `source` into an MPEG transport stream without re-encoding.
    pub fn to_ts(
        &self,
        source: &MediaInfo,
        output: &Path,
        progress: Option<ProgressHook>,
    ) -> Result<()> {
        builder::ensure_extension(output, VideoType::Ts.extension())?;

        let mut chain = ArgumentContainer::new();
        chain.add(Argument::copy(Channel::Both))?;
        chain.add(Argument::bit_stream_filter(
            Channel::Video,
            Filter::H264Mp4ToAnnexB,
        ))?;
        chain.add(Argument::force_format(VideoCodec::MpegTs))?;
        let arguments = builder::build_arguments_with_io(&chain, &source.path, output)?;
        self.run_conversion(&arguments, output, source, progress)
    }

    /// Converts `source` to the requested container format.
    pub fn convert_to(
        &self,
        format: VideoType,
        source: &MediaInfo,
        output: &Path,
        options: &ConversionOptions,
        progress: Option<ProgressHook>,
    ) -> Result<()> {
        match format {
            VideoType::Mp4 => self.to_mp4(source, output, options, progress),
            VideoType::Ogv => self.to_ogv(source, output, options, progress),
            VideoType::Ts => self.to_ts(source, output, progress),
            VideoType::WebM => self.to_webm(source, output, options, progress),
        }
    }

    /// Builds an MP4 from a still image looped under an audio track, ending
    /// when the audio does.
    pub fn poster_with_audio(&self, image: &Path, audio: &Path, output: &Path) -> Result<()> {
        builder::ensure_input_exists(image)?;
        builder::ensure_input_exists(audio)?;
        builder::ensure_output_free(output)?;
        builder::ensure_extension(output, VideoType::Mp4.extension())?;

        let mut arguments = String::new();
        arguments.push_str(&tokens::loop_count(1));
        arguments.push_str(&tokens::input(image));
        arguments.push_str(&tokens::input(audio));
        arguments.push_str(&tokens::video(VideoCodec::LibX264, VIDEO_BITRATE_KBPS));
        arguments.push_str(&tokens::audio(
            AudioCodec::Aac,
            AudioQuality::Normal.bitrate_kbps(),
        ));
        arguments.push_str(&tokens::shortest(true));
        arguments.push_str(&tokens::output(output));
        self.run(&arguments, output)
    }

    /// Concatenates `sources` into one file.
    ///
    /// Each source is first remuxed to an intermediate transport stream in
    /// a temporary directory, which is removed again even when a step
    /// fails. Source paths must not contain `|`, the concat separator.
    pub fn join(&self, output: &Path, sources: &[MediaInfo]) -> Result<()> {
        builder::ensure_output_free(output)?;
        if sources.is_empty() {
            return Err(Error::InvalidInput("no sources to join".to_owned()));
        }
        for source in sources {
            builder::ensure_input_exists(&source.path)?;
            if source.path.to_string_lossy().contains('|') {
                return Err(Error::InvalidInput(format!(
                    "source path contains '|': {}",
                    source.path.display()
                )));
            }
        }

        let staging = tempfile::tempdir()?;
        let mut segments = Vec::with_capacity(sources.len());
        for (index, source) in sources.iter().enumerate() {
            let segment = staging.path().join(format!("{index:03}.ts"));
            self.to_ts(source, &segment, None)?;
            segments.push(segment);
        }

        let mut chain = ArgumentContainer::new();
        chain.add(Argument::concat(segments))?;
        chain.add(Argument::copy(Channel::Both))?;
        chain.add(Argument::bit_stream_filter(
            Channel::Audio,
            Filter::AacAdtstoasc,
        ))?;
        chain.add(Argument::output(output))?;
        let arguments = builder::build_arguments(&chain)?;
        self.run(&arguments, output)
    }

    /// Assembles still images into an H.264 video at `frame_rate`.
    ///
    /// The images are staged as a zero-padded numbered sequence in a
    /// temporary directory so the engine can consume them as one pattern
    /// input, in slice order.
    pub fn join_image_sequence(
        &self,
        output: &Path,
        frame_rate: f64,
        frame_size: (u32, u32),
        images: &[PathBuf],
    ) -> Result<()> {
        builder::ensure_output_free(output)?;
        builder::ensure_extension(output, VideoType::Mp4.extension())?;
        if images.is_empty() {
            return Err(Error::InvalidInput("no images to join".to_owned()));
        }
        for image in images {
            builder::ensure_input_exists(image)?;
        }

        let staging = tempfile::tempdir()?;
        for (index, image) in images.iter().enumerate() {
            fs::copy(image, staging.path().join(format!("{index:09}.png")))?;
        }
        let pattern = staging.path().join("%09d.png");
        let (width, height) = frame_size;

        let mut arguments = String::new();
        arguments.push_str(&tokens::frame_rate(frame_rate));
        arguments.push_str(&tokens::size(width, height));
        arguments.push_str(&tokens::start_number(0));
        arguments.push_str(&tokens::input(&pattern));
        arguments.push_str(&tokens::frame_output_count(images.len() as u32));
        arguments.push_str(&tokens::video(VideoCodec::LibX264, 0));
        arguments.push_str(&tokens::output(output));
        self.run(&arguments, output)
    }

    /// Records an HTTP(S) M3U8 stream into an MP4 file.
    pub fn save_m3u8_stream(&self, url: &str, output: &Path) -> Result<()> {
        builder::ensure_extension(output, VideoType::Mp4.extension())?;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::InvalidInput(format!(
                "not an http(s) stream url: {url}"
            )));
        }
        builder::ensure_output_free(output)?;

        let mut chain = ArgumentContainer::new();
        chain.add(Argument::input(url))?;
        chain.add(Argument::output(output))?;
        let arguments = builder::build_arguments(&chain)?;
        self.run(&arguments, output)
    }

    /// Drops the audio stream while copying the video stream verbatim.
    ///
    /// The output must keep the source's container extension.
    pub fn mute(&self, source: &MediaInfo, output: &Path) -> Result<()> {
        builder::ensure_input_exists(&source.path)?;
        builder::ensure_output_free(output)?;
        builder::ensure_extension(output, &builder::extension_of(&source.path))?;

        let mut arguments = String::new();
        arguments.push_str(&tokens::input(&source.path));
        arguments.push_str(&tokens::copy(Channel::Both));
        arguments.push_str(&tokens::disable(Channel::Audio));
        arguments.push_str(&tokens::output(output));
        self.run(&arguments, output)
    }

    /// Extracts the audio stream into an `.mp3` file.
    pub fn extract_audio(&self, source: &MediaInfo, output: &Path) -> Result<()> {
        builder::ensure_input_exists(&source.path)?;
        builder::ensure_output_free(output)?;
        builder::ensure_extension(output, ".mp3")?;

        let mut arguments = String::new();
        arguments.push_str(&tokens::input(&source.path));
        arguments.push_str(&tokens::disable(Channel::Video));
        arguments.push_str(&tokens::output(output));
        self.run(&arguments, output)
    }

    /// Replaces the audio track of `source` with `audio`, copying the video
    /// stream and re-encoding the new audio as high-bitrate AAC.
    ///
    /// With `stop_at_shortest` the result ends when the shorter of the two
    /// streams does.
    pub fn replace_audio(
        &self,
        source: &MediaInfo,
        audio: &Path,
        output: &Path,
        stop_at_shortest: bool,
    ) -> Result<()> {
        builder::ensure_input_exists(&source.path)?;
        builder::ensure_input_exists(audio)?;
        builder::ensure_output_free(output)?;
        builder::ensure_extension(output, &builder::extension_of(&source.path))?;

        let mut arguments = String::new();
        arguments.push_str(&tokens::input(&source.path));
        arguments.push_str(&tokens::input(audio));
        arguments.push_str(&tokens::copy(Channel::Video));
        arguments.push_str(&tokens::audio(
            AudioCodec::Aac,
            AudioQuality::Hd.bitrate_kbps(),
        ));
        arguments.push_str(&tokens::shortest(stop_at_shortest));
        arguments.push_str(&tokens::output(output));
        self.run(&arguments, output)
    }

    fn run_conversion(
        &self,
        arguments: &str,
        output: &Path,
        source: &MediaInfo,
        progress: Option<ProgressHook>,
    ) -> Result<()> {
        match progress {
            Some(hook) => self.run_with_progress(arguments, output, source.duration, hook),
            None => self.run(arguments, output),
        }
    }
}

fn thread_argument(multithread: bool) -> Argument {
    if multithread {
        Argument::multithreaded()
    } else {
        Argument::threads(1)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::tools::ToolsConfig;
    use assert_matches::assert_matches;
    use std::os::unix::fs::PermissionsExt;

    /// Engine stand-in that records its argv one entry per line next to the
    /// script and writes a non-empty artifact at its final argument.
    const CAPTURE_SCRIPT: &str = r#"#!/bin/sh
dir=$(dirname "$0")
printf '%s\n' "$@" > "$dir/argv.txt"
for last in "$@"; do :; done
echo data > "$last"
"#;

    fn capture_engine(dir: &Path) -> Ffmpeg {
        let path = dir.join("ffmpeg");
        fs::write(&path, CAPTURE_SCRIPT).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        let config = ToolsConfig {
            binary_dir: Some(dir.to_path_buf()),
        };
        Ffmpeg::new(&config).unwrap()
    }

    fn captured_argv(dir: &Path) -> Vec<String> {
        fs::read_to_string(dir.join("argv.txt"))
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    fn media(path: &Path) -> MediaInfo {
        MediaInfo {
            path: path.to_path_buf(),
            duration: Duration::from_secs(9),
            size_mb: 2.12,
            video_format: "h264".to_owned(),
            audio_format: Some("aac".to_owned()),
            width: 1280,
            height: 720,
            ratio: "16:9".to_owned(),
            frame_rate: 29.97,
        }
    }

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn default_options_describe_a_fast_preview_encode() {
        let options = ConversionOptions::default();
        assert_eq!(options.speed, Speed::SuperFast);
        assert_eq!(options.size, VideoSize::Original);
        assert_eq!(options.audio_quality, AudioQuality::Normal);
        assert!(!options.multithread);
    }

    #[test]
    fn to_mp4_renders_the_canonical_chain() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.avi");
        touch(&src);
        let out = dir.path().join("out.mp4");

        engine
            .to_mp4(&media(&src), &out, &ConversionOptions::default(), None)
            .unwrap();

        let src_s = src.display().to_string();
        let out_s = out.display().to_string();
        let expected = [
            "-i",
            src_s.as_str(),
            "-threads",
            "1",
            "-codec:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-b:v",
            "2400k",
            "-preset",
            "superfast",
            "-codec:a",
            "aac",
            "-b:a",
            "128k",
            "-strict",
            "experimental",
            out_s.as_str(),
        ];
        assert_eq!(captured_argv(dir.path()), expected);
        assert!(out.exists());
    }

    #[test]
    fn to_mp4_honors_the_options() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        touch(&src);
        let out = dir.path().join("out.mp4");

        let options = ConversionOptions {
            speed: Speed::Fast,
            size: VideoSize::Hd,
            audio_quality: AudioQuality::Ultra,
            multithread: true,
        };
        engine.to_mp4(&media(&src), &out, &options, None).unwrap();

        let argv = captured_argv(dir.path());
        let cpus = num_cpus::get().to_string();
        assert_eq!(argv[2..4], ["-threads".to_owned(), cpus]);
        assert!(argv.contains(&"scale=-1:720".to_owned()));
        assert!(argv.contains(&"fast".to_owned()));
        assert!(argv.contains(&"320k".to_owned()));
    }

    #[test]
    fn to_mp4_requires_an_mp4_output() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        touch(&src);
        let out = dir.path().join("out.avi");

        let err = engine
            .to_mp4(&media(&src), &out, &ConversionOptions::default(), None)
            .unwrap_err();
        assert_matches!(err, Error::ExtensionMismatch { expected, actual } => {
            assert_eq!(expected, ".mp4");
            assert_eq!(actual, ".avi");
        });
        assert!(!dir.path().join("argv.txt").exists());
    }

    #[test]
    fn to_mp4_requires_an_existing_source() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("absent.mp4");
        let out = dir.path().join("out.mp4");

        let err = engine
            .to_mp4(&media(&src), &out, &ConversionOptions::default(), None)
            .unwrap_err();
        assert_matches!(err, Error::FileMissing { .. });
    }

    #[test]
    fn to_webm_leaves_thread_control_to_the_encoder() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        touch(&src);
        let out = dir.path().join("out.webm");

        engine
            .to_webm(&media(&src), &out, &ConversionOptions::default(), None)
            .unwrap();

        let src_s = src.display().to_string();
        let out_s = out.display().to_string();
        let expected = [
            "-i",
            src_s.as_str(),
            "-codec:v",
            "libvpx",
            "-pix_fmt",
            "yuv420p",
            "-b:v",
            "2400k",
            "-quality",
            "good",
            "-cpu-used",
            "16",
            "-deadline",
            "realtime",
            "-codec:a",
            "libvorbis",
            "-b:a",
            "128k",
            "-strict",
            "experimental",
            out_s.as_str(),
        ];
        assert_eq!(captured_argv(dir.path()), expected);
    }

    #[test]
    fn to_ogv_keeps_thread_control() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        touch(&src);
        let out = dir.path().join("out.ogv");

        engine
            .to_ogv(&media(&src), &out, &ConversionOptions::default(), None)
            .unwrap();

        let argv = captured_argv(dir.path());
        assert_eq!(argv[2..4], ["-threads".to_owned(), "1".to_owned()]);
        assert!(argv.contains(&"libtheora".to_owned()));
        assert!(argv.contains(&"-cpu-used".to_owned()));
        assert!(argv.contains(&"libvorbis".to_owned()));
    }

    #[test]
    fn to_ts_remuxes_without_reencoding() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        touch(&src);
        let out = dir.path().join("out.ts");

        engine.to_ts(&media(&src), &out, None).unwrap();

        let src_s = src.display().to_string();
        let out_s = out.display().to_string();
        let expected = [
            "-i",
            src_s.as_str(),
            "-c",
            "copy",
            "-bsf:v",
            "h264_mp4toannexb",
            "-f",
            "mpegts",
            out_s.as_str(),
        ];
        assert_eq!(captured_argv(dir.path()), expected);
    }

    #[test]
    fn convert_to_dispatches_on_format() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        touch(&src);
        let out = dir.path().join("out.ts");

        engine
            .convert_to(
                VideoType::Ts,
                &media(&src),
                &out,
                &ConversionOptions::default(),
                None,
            )
            .unwrap();

        let argv = captured_argv(dir.path());
        assert!(argv.contains(&"mpegts".to_owned()));
        assert_eq!(argv.last(), Some(&out.display().to_string()));
    }

    #[test]
    fn snapshot_defaults_derive_from_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        touch(&src);
        let out = dir.path().join("still.png");

        engine.snapshot(&media(&src), &out, None, None).unwrap();

        let src_s = src.display().to_string();
        let out_s = out.display().to_string();
        // 9 s source, so the default capture point is 3 s in.
        let expected = [
            "-i",
            src_s.as_str(),
            "-codec:v",
            "png",
            "-pix_fmt",
            "yuv420p",
            "-vframes",
            "1",
            "-ss",
            "00:00:03",
            "-s",
            "1280x720",
            out_s.as_str(),
        ];
        assert_eq!(captured_argv(dir.path()), expected);
    }

    #[test]
    fn snapshot_honors_explicit_size_and_time() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        touch(&src);
        let out = dir.path().join("still.png");

        engine
            .snapshot(
                &media(&src),
                &out,
                Some((320, 200)),
                Some(Duration::from_millis(1500)),
            )
            .unwrap();

        let argv = captured_argv(dir.path());
        assert!(argv.contains(&"00:00:01.500".to_owned()));
        assert!(argv.contains(&"320x200".to_owned()));
    }

    #[test]
    fn snapshot_requires_a_png_output() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        touch(&src);
        let out = dir.path().join("still.jpg");

        let err = engine.snapshot(&media(&src), &out, None, None).unwrap_err();
        assert_matches!(err, Error::ExtensionMismatch { expected, .. } => {
            assert_eq!(expected, ".png");
        });
    }

    #[test]
    fn poster_with_audio_loops_the_still() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let image = dir.path().join("poster.png");
        let audio = dir.path().join("track.mp3");
        touch(&image);
        touch(&audio);
        let out = dir.path().join("poster.mp4");

        engine.poster_with_audio(&image, &audio, &out).unwrap();

        let image_s = image.display().to_string();
        let audio_s = audio.display().to_string();
        let out_s = out.display().to_string();
        let expected = [
            "-loop",
            "1",
            "-i",
            image_s.as_str(),
            "-i",
            audio_s.as_str(),
            "-codec:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-b:v",
            "2400k",
            "-codec:a",
            "aac",
            "-b:a",
            "128k",
            "-strict",
            "experimental",
            "-shortest",
            out_s.as_str(),
        ];
        assert_eq!(captured_argv(dir.path()), expected);
    }

    #[test]
    fn poster_with_audio_requires_both_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let image = dir.path().join("poster.png");
        touch(&image);
        let audio = dir.path().join("absent.mp3");
        let out = dir.path().join("poster.mp4");

        let err = engine.poster_with_audio(&image, &audio, &out).unwrap_err();
        assert_matches!(err, Error::FileMissing { path } => {
            assert_eq!(path, audio);
        });
    }

    #[test]
    fn join_concatenates_transport_segments() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let first = dir.path().join("first.mp4");
        let second = dir.path().join("second.mp4");
        touch(&first);
        touch(&second);
        let out = dir.path().join("joined.mp4");

        engine
            .join(&out, &[media(&first), media(&second)])
            .unwrap();

        // The capture reflects the final invocation, the concat pass.
        let argv = captured_argv(dir.path());
        assert_eq!(argv[0], "-i");
        let concat = argv[1].strip_prefix("concat:").unwrap();
        let segments: Vec<&str> = concat.split('|').collect();
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|segment| segment.ends_with(".ts")));
        assert_eq!(argv[2..6], ["-c", "copy", "-bsf:a", "aac_adtstoasc"]);
        assert_eq!(argv.last(), Some(&out.display().to_string()));
        assert!(out.exists());
    }

    #[test]
    fn join_rejects_pipe_in_source_paths() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("a|b.mp4");
        touch(&src);
        let out = dir.path().join("joined.mp4");

        let err = engine.join(&out, &[media(&src)]).unwrap_err();
        assert_matches!(err, Error::InvalidInput(_));
    }

    #[test]
    fn join_requires_sources() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let out = dir.path().join("joined.mp4");

        assert_matches!(engine.join(&out, &[]), Err(Error::InvalidInput(_)));
    }

    #[test]
    fn join_image_sequence_stages_a_numbered_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let frames: Vec<PathBuf> = (0..3)
            .map(|index| {
                let frame = dir.path().join(format!("frame-{index}.png"));
                touch(&frame);
                frame
            })
            .collect();
        let out = dir.path().join("sequence.mp4");

        engine
            .join_image_sequence(&out, 25.0, (640, 480), &frames)
            .unwrap();

        let argv = captured_argv(dir.path());
        assert_eq!(argv[0..6], ["-r", "25", "-s", "640x480", "-start_number", "0"]);
        assert_eq!(argv[6], "-i");
        assert!(argv[7].ends_with("%09d.png"));
        assert_eq!(argv[8..10], ["-vframes", "3"]);
        assert!(argv.contains(&"libx264".to_owned()));
        assert!(!argv.contains(&"-b:v".to_owned()));
        assert_eq!(argv.last(), Some(&out.display().to_string()));
    }

    #[test]
    fn join_image_sequence_requires_frames() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let out = dir.path().join("sequence.mp4");

        assert_matches!(
            engine.join_image_sequence(&out, 25.0, (640, 480), &[]),
            Err(Error::InvalidInput(_))
        );
    }

    #[test]
    fn save_m3u8_stream_requires_an_http_url() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let out = dir.path().join("stream.mp4");

        assert_matches!(
            engine.save_m3u8_stream("rtmp://example.test/live", &out),
            Err(Error::InvalidInput(_))
        );
    }

    #[test]
    fn save_m3u8_stream_feeds_the_url_as_input() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let out = dir.path().join("stream.mp4");

        engine
            .save_m3u8_stream("http://example.test/live/stream.m3u8", &out)
            .unwrap();

        let out_s = out.display().to_string();
        let expected = [
            "-i",
            "http://example.test/live/stream.m3u8",
            out_s.as_str(),
        ];
        assert_eq!(captured_argv(dir.path()), expected);
    }

    #[test]
    fn mute_strips_the_audio_stream() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        touch(&src);
        let out = dir.path().join("muted.mp4");

        engine.mute(&media(&src), &out).unwrap();

        let src_s = src.display().to_string();
        let out_s = out.display().to_string();
        let expected = ["-i", src_s.as_str(), "-c", "copy", "-an", out_s.as_str()];
        assert_eq!(captured_argv(dir.path()), expected);
    }

    #[test]
    fn mute_matches_the_source_container() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        touch(&src);
        let out = dir.path().join("muted.avi");

        let err = engine.mute(&media(&src), &out).unwrap_err();
        assert_matches!(err, Error::ExtensionMismatch { expected, actual } => {
            assert_eq!(expected, ".mp4");
            assert_eq!(actual, ".avi");
        });
    }

    #[test]
    fn extract_audio_writes_mp3() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        touch(&src);
        let out = dir.path().join("track.mp3");

        engine.extract_audio(&media(&src), &out).unwrap();

        let src_s = src.display().to_string();
        let out_s = out.display().to_string();
        let expected = ["-i", src_s.as_str(), "-vn", out_s.as_str()];
        assert_eq!(captured_argv(dir.path()), expected);
    }

    #[test]
    fn extract_audio_requires_an_mp3_output() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        touch(&src);
        let out = dir.path().join("track.wav");

        let err = engine.extract_audio(&media(&src), &out).unwrap_err();
        assert_matches!(err, Error::ExtensionMismatch { expected, .. } => {
            assert_eq!(expected, ".mp3");
        });
    }

    #[test]
    fn replace_audio_recodes_only_the_audio() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        let track = dir.path().join("track.mp3");
        touch(&src);
        touch(&track);
        let out = dir.path().join("dubbed.mp4");

        engine
            .replace_audio(&media(&src), &track, &out, false)
            .unwrap();

        let src_s = src.display().to_string();
        let track_s = track.display().to_string();
        let out_s = out.display().to_string();
        let expected = [
            "-i",
            src_s.as_str(),
            "-i",
            track_s.as_str(),
            "-c:v",
            "copy",
            "-codec:a",
            "aac",
            "-b:a",
            "256k",
            "-strict",
            "experimental",
            out_s.as_str(),
        ];
        assert_eq!(captured_argv(dir.path()), expected);
    }

    #[test]
    fn replace_audio_can_stop_at_the_shortest_stream() {
        let dir = tempfile::tempdir().unwrap();
        let engine = capture_engine(dir.path());
        let src = dir.path().join("clip.mp4");
        let track = dir.path().join("track.mp3");
        touch(&src);
        touch(&track);
        let out = dir.path().join("dubbed.mp4");

        engine
            .replace_audio(&media(&src), &track, &out, true)
            .unwrap();

        let argv = captured_argv(dir.path());
        assert_eq!(argv[argv.len() - 2], "-shortest");
    }
}
