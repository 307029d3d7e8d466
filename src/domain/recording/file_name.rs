//! Recording file name value object
//!
//! Names follow `{VOICE|CALL}[_<title>]_<YYYYMMDD_HHmmss>.m4a`. The directory
//! index filters on the extension and the playback/delete paths are built
//! from these names, so the format must stay stable.

use std::fmt;

use chrono::NaiveDateTime;

use super::source::SourceType;

/// Extension of every recording file (no leading dot)
pub const RECORDING_EXTENSION: &str = "m4a";

/// Timestamp layout embedded in file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Title used for calls whose number is not available
pub const UNKNOWN_CALLER: &str = "Unknown";

/// `_` + `YYYYMMDD` + `_` + `HHmmss`
const TIMESTAMP_SUFFIX_LEN: usize = 16;

/// A parsed or freshly allocated recording file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingFileName {
    source: SourceType,
    title: Option<String>,
    timestamp: NaiveDateTime,
}

impl RecordingFileName {
    /// Build a file name for a new session.
    ///
    /// Path separators and control characters in the title are replaced with
    /// `_` so the result is always a single path component. A blank title is
    /// omitted from the name.
    pub fn new(source: SourceType, title: &str, timestamp: NaiveDateTime) -> Self {
        let title = sanitize_title(title);
        Self {
            source,
            title: if title.is_empty() { None } else { Some(title) },
            timestamp,
        }
    }

    /// Recording source encoded in the prefix
    pub fn source(&self) -> SourceType {
        self.source
    }

    /// Title or phone number, if present
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Session start timestamp (second precision)
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Render the file name
    pub fn file_name(&self) -> String {
        let title = self
            .title
            .as_ref()
            .map(|t| format!("_{}", t))
            .unwrap_or_default();

        format!(
            "{}{}_{}.{}",
            self.source.prefix(),
            title,
            self.timestamp.format(TIMESTAMP_FORMAT),
            RECORDING_EXTENSION
        )
    }

    /// Recover the parts of a name produced by [`RecordingFileName::file_name`].
    ///
    /// Returns `None` for anything that does not follow the format, such as
    /// files copied into the directory by hand.
    pub fn parse(name: &str) -> Option<Self> {
        let stem = strip_extension(name)?;

        let (source, rest) = SourceType::all()
            .iter()
            .find_map(|s| stem.strip_prefix(s.prefix()).map(|rest| (*s, rest)))?;

        let split = rest.len().checked_sub(TIMESTAMP_SUFFIX_LEN)?;
        let middle = rest.get(..split)?;
        let suffix = rest.get(split..)?;

        let ts = suffix.strip_prefix('_')?;
        let timestamp = NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).ok()?;

        let title = if middle.is_empty() {
            None
        } else {
            Some(middle.strip_prefix('_')?.to_string())
        };

        Some(Self {
            source,
            title,
            timestamp,
        })
    }
}

impl fmt::Display for RecordingFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Check whether a file name carries the recording extension (case-insensitive)
pub fn has_recording_extension(name: &str) -> bool {
    strip_extension(name).is_some()
}

fn strip_extension(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    if ext.eq_ignore_ascii_case(RECORDING_EXTENSION) {
        Some(stem)
    } else {
        None
    }
}

fn sanitize_title(title: &str) -> String {
    title
        .trim()
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}
