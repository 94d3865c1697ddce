//! Progress extraction from the engine's diagnostic stream.
//!
//! While encoding, the engine prints lines like
//! `frame=  123 fps= 45 q=28.0 size=1024kB time=00:00:05.12 bitrate=...`.
//! A line qualifies as a progress report when it carries the `frame` marker
//! and an `HH:MM:SS` timestamp; the timestamp is the elapsed media time.

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d\d):(\d\d):(\d\d)(?:\.(\d+))?").unwrap()
});

/// Elapsed media time from one diagnostic line, or `None` when the line is
/// not a progress report.
pub(crate) fn parse_elapsed(line: &str) -> Option<Duration> {
    if !line.contains("frame") {
        return None;
    }
    let caps = TIMESTAMP.captures(line)?;
    let hours: u64 = caps[1].parse().ok()?;
    let minutes: u64 = caps[2].parse().ok()?;
    let seconds: u64 = caps[3].parse().ok()?;
    let mut elapsed = Duration::from_secs(hours * 3600 + minutes * 60 + seconds);
    if let Some(frac) = caps.get(4) {
        // Fractional digits, scaled to milliseconds regardless of how many
        // the engine printed.
        let mut digits = frac.as_str().to_string();
        digits.truncate(3);
        while digits.len() < 3 {
            digits.push('0');
        }
        let millis: u64 = digits.parse().ok()?;
        elapsed += Duration::from_millis(millis);
    }
    Some(elapsed)
}

/// Completion percentage rounded to two decimals and capped at 100.
///
/// `None` when the total duration is zero; a denominator-free percentage is
/// meaningless and observers are simply not called.
pub(crate) fn percentage(elapsed: Duration, total: Duration) -> Option<f64> {
    if total.is_zero() {
        return None;
    }
    let ratio = elapsed.as_secs_f64() / total.as_secs_f64();
    let rounded = (ratio * 100.0 * 100.0).round() / 100.0;
    Some(rounded.min(100.0))
}

/// Percentage for one diagnostic line against the run's total duration.
pub(crate) fn parse_progress_line(line: &str, total: Duration) -> Option<f64> {
    percentage(parse_elapsed(line)?, total)
}
