//! Field paths for hierarchical document access.
//!
//! A [`FieldPath`] is an ordered list of non-empty segments. Unlike a dotted
//! string, segments may themselves contain dots or any other character, so a
//! path is stored as its segments and only rendered to text on demand.
//!
//! # Usage
//!
//! ```rust
//! use docmodel::model::FieldPath;
//! use docmodel::field_path;
//!
//! let path = field_path!("user", "profile", "name");
//! assert_eq!(path.last_segment(), "name");
//! assert_eq!(path.pop_last(), field_path!("user", "profile"));
//!
//! // Canonical form quotes segments that are not plain identifiers
//! let quoted = field_path!("user", "first.name");
//! assert_eq!(quoted.to_string(), "user.`first.name`");
//! assert_eq!(FieldPath::from_server_format("user.`first.name`")?, quoted);
//! # Ok::<(), docmodel::model::PathError>(())
//! ```

use std::fmt;

use thiserror::Error;

/// Error type for path parsing failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The input string contained no segments at all.
    #[error("Invalid field path '{path}': paths must not be empty")]
    Empty { path: String },

    /// A segment between separators was empty.
    #[error(
        "Invalid field path '{path}': paths must not begin with '.', end with '.', or contain '..'"
    )]
    EmptySegment { path: String },

    /// A backtick-quoted segment was never closed.
    #[error("Invalid field path '{path}': unterminated '`'")]
    UnterminatedQuote { path: String },

    /// The input ended right after an escaping backslash.
    #[error("Invalid field path '{path}': trailing escape character")]
    TrailingEscape { path: String },

    /// A character that cannot appear in a user-supplied dotted path.
    #[error("Invalid field path '{path}': paths must not contain '{character}'")]
    ForbiddenCharacter { path: String, character: char },

    /// Input named a field with an empty key, which no path can address.
    #[error("Invalid field name under '{parent}': field names must not be empty")]
    EmptyFieldName { parent: String },
}

/// Characters rejected by [`FieldPath::from_dot_separated`].
const FORBIDDEN_CHARACTERS: &[char] = &['~', '*', '/', '[', ']'];

/// An immutable, ordered sequence of segments identifying a location in a
/// document.
///
/// The empty path refers to the whole document. It is accepted by lookups
/// but not by mutations.
///
/// Paths order lexicographically by segment, which keeps paths sharing a
/// parent next to each other when sorted.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Creates the empty (root) path.
    pub fn empty() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Creates a path from its segments.
    ///
    /// # Panics
    /// Panics if any segment is empty.
    pub fn from_segments<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        assert!(
            segments.iter().all(|segment| !segment.is_empty()),
            "Field path segments must not be empty: {segments:?}"
        );
        Self { segments }
    }

    /// Creates a path with exactly one segment.
    pub fn from_single_segment(segment: impl Into<String>) -> Self {
        Self::from_segments([segment])
    }

    /// Parses a user-facing dotted path such as `"user.profile.name"`.
    ///
    /// Every `.` separates segments; there is no quoting. Use
    /// [`FieldPath::from_server_format`] for paths whose segments contain dots.
    pub fn from_dot_separated(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty {
                path: path.to_string(),
            });
        }
        if let Some(character) = path.chars().find(|c| FORBIDDEN_CHARACTERS.contains(c)) {
            return Err(PathError::ForbiddenCharacter {
                path: path.to_string(),
                character,
            });
        }

        let mut segments = Vec::new();
        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(PathError::EmptySegment {
                    path: path.to_string(),
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// Parses the canonical form produced by `Display`.
    ///
    /// Segments are separated by `.`. A segment wrapped in backticks may
    /// contain dots, and a backslash escapes the character after it.
    pub fn from_server_format(path: &str) -> Result<Self, PathError> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut in_backticks = false;
        let mut chars = path.chars();

        let mut finish_segment = |current: &mut String| {
            if current.is_empty() {
                return Err(PathError::EmptySegment {
                    path: path.to_string(),
                });
            }
            segments.push(std::mem::take(current));
            Ok(())
        };

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => {
                        return Err(PathError::TrailingEscape {
                            path: path.to_string(),
                        });
                    }
                },
                '`' => in_backticks = !in_backticks,
                '.' if !in_backticks => finish_segment(&mut current)?,
                other => current.push(other),
            }
        }

        if in_backticks {
            return Err(PathError::UnterminatedQuote {
                path: path.to_string(),
            });
        }
        if path.is_empty() {
            return Err(PathError::Empty {
                path: path.to_string(),
            });
        }
        finish_segment(&mut current)?;

        Ok(Self { segments })
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` for the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Returns the first segment.
    ///
    /// # Panics
    /// Panics if the path is empty.
    pub fn first_segment(&self) -> &str {
        assert!(!self.is_empty(), "Cannot call first_segment() on empty path");
        &self.segments[0]
    }

    /// Returns the last segment.
    ///
    /// # Panics
    /// Panics if the path is empty.
    pub fn last_segment(&self) -> &str {
        match self.segments.last() {
            Some(segment) => segment,
            None => panic!("Cannot call last_segment() on empty path"),
        }
    }

    /// Returns the path without its last segment.
    ///
    /// # Panics
    /// Panics if the path is empty.
    pub fn pop_last(&self) -> FieldPath {
        assert!(!self.is_empty(), "Cannot call pop_last() on empty path");
        Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        }
    }

    /// Returns a new path with `other` appended.
    pub fn append(&self, other: &FieldPath) -> FieldPath {
        let mut segments = Vec::with_capacity(self.len() + other.len());
        segments.extend_from_slice(&self.segments);
        segments.extend_from_slice(&other.segments);
        Self { segments }
    }

    /// Returns a new path with a single segment appended.
    ///
    /// # Panics
    /// Panics if `segment` is empty.
    pub fn append_segment(&self, segment: impl Into<String>) -> FieldPath {
        let segment = segment.into();
        assert!(!segment.is_empty(), "Field path segments must not be empty");
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Returns `true` if every segment of `self` starts `other`.
    ///
    /// A path is a prefix of itself, and the empty path is a prefix of every path.
    pub fn is_prefix_of(&self, other: &FieldPath) -> bool {
        self.len() <= other.len() && self.segments[..] == other.segments[..self.len()]
    }

    /// Returns `true` if `other` is exactly one segment longer than `self`
    /// and starts with it.
    pub fn is_immediate_parent_of(&self, other: &FieldPath) -> bool {
        self.len() + 1 == other.len() && self.is_prefix_of(other)
    }
}

/// Returns `true` if `segment` can be written without backtick quoting.
fn is_valid_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn write_segment(f: &mut fmt::Formatter<'_>, segment: &str) -> fmt::Result {
    if is_valid_identifier(segment) {
        return f.write_str(segment);
    }
    f.write_str("`")?;
    for c in segment.chars() {
        if c == '\\' || c == '`' {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("`")
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write_segment(f, segment)?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<String>> for FieldPath {
    type Error = PathError;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment {
                path: segments.join("."),
            });
        }
        Ok(Self { segments })
    }
}

impl From<FieldPath> for Vec<String> {
    fn from(path: FieldPath) -> Self {
        path.segments
    }
}

/// Constructs a [`FieldPath`] from its segments.
///
/// - `field_path!()` - the empty (root) path
/// - `field_path!("user", "profile")` - one argument per segment
///
/// Each argument is converted with `ToString`, so runtime values work too.
///
/// ```rust
/// # use docmodel::field_path;
/// let index = 3;
/// let path = field_path!("rows", index, "name");
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.to_string(), "rows.`3`.name");
/// ```
#[macro_export]
macro_rules! field_path {
    () => {
        $crate::model::FieldPath::empty()
    };

    ($($segment:expr),+ $(,)?) => {
        $crate::model::FieldPath::from_segments([
            $(::std::string::ToString::to_string(&$segment)),+
        ])
    };
}
