//! Command-line assembly.
//!
//! The build pass decides ordering: the input-like argument first, middles
//! in container insertion order, the output last. Containers only guarantee
//! kind uniqueness.

use crate::argument::{Argument, Kind, KindSet};
use crate::container::ArgumentContainer;
use crate::error::{Error, Result};
use crate::tokens;
use std::path::Path;

/// Renders a full command line from the container's own endpoints.
pub fn build_arguments(container: &ArgumentContainer) -> Result<String> {
    build_arguments_filtered(container, KindSet::all())
}

/// Like [`build_arguments`], but keeps only middle arguments whose kind is
/// in `mask`. Endpoints are always emitted.
pub fn build_arguments_filtered(container: &ArgumentContainer, mask: KindSet) -> Result<String> {
    if !container.contains_input_output() {
        return Err(Error::MissingInputOrOutput);
    }
    let input = resolve_input(container)?;
    let output = container
        .get(Kind::Output)
        .ok_or(Error::MissingInputOrOutput)?;

    let mut line = input.render();
    line.push_str(&render_middles(container, mask));
    line.push_str(&output.render());
    Ok(line)
}

/// Renders a command line around explicit endpoint paths.
///
/// The container supplies only the middle arguments here; any Input, Output
/// or Concat entries it happens to hold are ignored. Filesystem
/// preconditions replace the container gate: the input must exist, the
/// output must not, and when a video codec is present the output extension
/// must be the one that codec produces.
pub fn build_arguments_with_io(
    container: &ArgumentContainer,
    input: &Path,
    output: &Path,
) -> Result<String> {
    ensure_input_exists(input)?;
    ensure_output_free(output)?;
    if let Some(Argument::VideoCodec { codec, .. }) = container.get(Kind::VideoCodec) {
        ensure_extension(output, codec.canonical_extension())?;
    }

    let mut line = tokens::input(input);
    line.push_str(&render_middles(container, KindSet::all()));
    line.push_str(&tokens::output(output));
    Ok(line)
}

fn resolve_input(container: &ArgumentContainer) -> Result<&Argument> {
    container
        .get(Kind::Input)
        .or_else(|| container.get(Kind::Concat))
        .ok_or(Error::NoInputFound)
}

fn render_middles(container: &ArgumentContainer, mask: KindSet) -> String {
    let mut middles = String::new();
    for argument in container.iter() {
        let kind = argument.kind();
        if matches!(kind, Kind::Input | Kind::Output | Kind::Concat) {
            continue;
        }
        if !mask.contains(kind) {
            continue;
        }
        middles.push_str(&argument.render());
    }
    middles
}

/// Fails with [`Error::FileMissing`] unless `path` exists.
pub(crate) fn ensure_input_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::file_missing(path))
    }
}

/// Fails with [`Error::FileAlreadyExists`] if `path` exists.
pub(crate) fn ensure_output_free(path: &Path) -> Result<()> {
    if path.exists() {
        Err(Error::file_already_exists(path))
    } else {
        Ok(())
    }
}

/// The path's extension as `.ext`, lower-cased; empty when there is none.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Fails with [`Error::ExtensionMismatch`] unless the path carries
/// `expected` (compared lower-case).
pub(crate) fn ensure_extension(path: &Path, expected: &str) -> Result<()> {
    let actual = extension_of(path);
    if actual == expected {
        Ok(())
    } else {
        Err(Error::extension_mismatch(expected, actual))
    }
}
