//! Field paths.
//!
//! A field path names a walk from a record through zero or more relations to
//! the discriminating field, written as segments joined by `__`
//! (`invoice__customer__state`).

use crate::error::{ConfigError, ConfigResult};
use regex_lite::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Separator between path segments.
pub const SEPARATOR: &str = "__";

fn identifier() -> Option<&'static Regex> {
    static IDENT: OnceLock<Option<Regex>> = OnceLock::new();
    IDENT
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").ok())
        .as_ref()
}

/// An ordered list of field names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Split a path without validating it. See [`FieldPath::validate`].
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = if raw.is_empty() {
            Vec::new()
        } else {
            raw.split(SEPARATOR).map(str::to_string).collect()
        };
        Self { raw, segments }
    }

    /// Split and validate a path.
    pub fn parse(raw: impl Into<String>) -> ConfigResult<Self> {
        let path = Self::new(raw);
        path.validate()?;
        Ok(path)
    }

    /// Check the path is non-empty and every segment is an identifier.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.segments.is_empty() {
            return Err(ConfigError::EmptyFieldPath);
        }
        for segment in &self.segments {
            if segment.is_empty() {
                return Err(ConfigError::empty_path_segment(&self.raw));
            }
            let valid = identifier().map_or(true, |re| re.is_match(segment));
            if !valid {
                return Err(ConfigError::invalid_path_segment(&self.raw, segment));
            }
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The first segment, the field read on the record itself.
    pub fn head(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Whether the path stays on the record (no relation hops).
    pub fn is_local(&self) -> bool {
        self.segments.len() == 1
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
