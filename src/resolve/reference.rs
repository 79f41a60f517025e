//! Image reference strings: `basename[:directive]`.
//!
//! The directive starts with one of `w<N>`, `h<N>` or `<W>x<H>`; text after
//! the matched prefix is ignored. A suffix that starts with none of them
//! leaves the configured defaults in place.

use std::fmt;

/// Requested size carried by a reference string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SizeDirective {
    /// No usable directive; the configured defaults apply.
    #[default]
    None,
    /// Fit to this width.
    Width(u32),
    /// Fit to this height.
    Height(u32),
    /// Fit within this box, preserving aspect ratio.
    Both(u32, u32),
}

impl SizeDirective {
    /// Parse a directive suffix by its leading `w<N>`, `h<N>` or `<W>x<H>`.
    ///
    /// Trailing text after the digits is ignored (`w20px` is `Width(20)`).
    /// Zero or overflowing values yield [`SizeDirective::None`].
    pub fn parse(suffix: &str) -> Self {
        if let Some(rest) = suffix.strip_prefix('w') {
            if let Some((width, _)) = leading_digits(rest) {
                return positive(width).map_or(SizeDirective::None, SizeDirective::Width);
            }
        }
        if let Some(rest) = suffix.strip_prefix('h') {
            if let Some((height, _)) = leading_digits(rest) {
                return positive(height).map_or(SizeDirective::None, SizeDirective::Height);
            }
        }
        if let Some((width, rest)) = leading_digits(suffix) {
            if let Some((height, _)) = rest.strip_prefix('x').and_then(leading_digits) {
                return match (positive(width), positive(height)) {
                    (Some(w), Some(h)) => SizeDirective::Both(w, h),
                    _ => SizeDirective::None,
                };
            }
        }
        SizeDirective::None
    }

    /// Target `(width, height)` for this directive; 0 means unconstrained.
    pub fn target(self, default_width: u32, default_height: u32) -> (u32, u32) {
        match self {
            SizeDirective::None => (default_width, default_height),
            SizeDirective::Width(w) => (w, 0),
            SizeDirective::Height(h) => (0, h),
            SizeDirective::Both(w, h) => (w, h),
        }
    }
}

impl fmt::Display for SizeDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeDirective::None => Ok(()),
            SizeDirective::Width(w) => write!(f, "w{w}"),
            SizeDirective::Height(h) => write!(f, "h{h}"),
            SizeDirective::Both(w, h) => write!(f, "{w}x{h}"),
        }
    }
}

/// A parsed image reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageReference<'a> {
    pub basename: &'a str,
    pub directive: SizeDirective,
}

impl<'a> ImageReference<'a> {
    /// Split `raw` on its first `:` and parse the directive suffix.
    pub fn parse(raw: &'a str) -> Self {
        let (basename, directive) = match raw.split_once(':') {
            Some((basename, suffix)) => (basename, SizeDirective::parse(suffix)),
            None => (raw, SizeDirective::None),
        };
        ImageReference {
            basename,
            directive,
        }
    }
}

/// Target `(width, height)` for `directive` given the configured defaults.
pub fn resolve_dimensions(
    directive: SizeDirective,
    default_width: u32,
    default_height: u32,
) -> (u32, u32) {
    directive.target(default_width, default_height)
}

/// Split off the run of ASCII digits at the start of `s`, if any.
fn leading_digits(s: &str) -> Option<(&str, &str)> {
    let end = s.bytes().take_while(u8::is_ascii_digit).count();
    (end > 0).then(|| s.split_at(end))
}

fn positive(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|value| *value > 0)
}

/// Exposes directive parsing for fuzz targets.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_reference(raw: &str) -> (String, SizeDirective) {
    let reference = ImageReference::parse(raw);
    (reference.basename.to_string(), reference.directive)
}
