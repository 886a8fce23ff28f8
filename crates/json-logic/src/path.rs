//! Locations inside an expression document, used for error attribution.

use crate::error::LogicError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The root marker every path starts from.
pub const ROOT: &str = "$";

/// A single step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key (for expressions, the operator name).
    Key(String),
    /// Argument or array index.
    Index(usize),
}

fn is_index(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

/// Escapes a key for the dotted form: `~` becomes `~0`, `.` becomes `~1`, and
/// a key made only of digits gets a `~2` prefix so it does not read as an index.
pub fn escape_key(key: &str) -> String {
    if is_index(key) {
        return format!("~2{}", key);
    }
    if !key.contains('.') && !key.contains('~') {
        return key.to_string();
    }
    key.replace('~', "~0").replace('.', "~1")
}

/// Inverse of [`escape_key`]; `None` on a dangling or unknown escape.
pub fn unescape_key(part: &str) -> Option<String> {
    if let Some(digits) = part.strip_prefix("~2") {
        return is_index(digits).then(|| digits.to_string());
    }
    let mut key = String::with_capacity(part.len());
    let mut chars = part.chars();
    while let Some(c) = chars.next() {
        match c {
            '~' => match chars.next()? {
                '0' => key.push('~'),
                '1' => key.push('.'),
                _ => return None,
            },
            other => key.push(other),
        }
    }
    Some(key)
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(&escape_key(key)),
            PathSegment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

#[derive(Debug)]
struct Node {
    parent: Option<Arc<Node>>,
    segment: PathSegment,
    len: usize,
}

/// An immutable, append-only path rooted at `$`.
///
/// Appending shares the parent's nodes, so extending a path once per
/// recursive descent costs one allocation and never touches the parent.
///
/// ```
/// use json_logic::Path;
///
/// let path = Path::root().append("if").append(1);
/// assert_eq!(path.to_string(), "$.if.1");
/// assert_eq!(path.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Path {
    tail: Option<Arc<Node>>,
}

impl Path {
    pub fn root() -> Self {
        Path { tail: None }
    }

    /// Returns a new path extended by `segment`; `self` is unchanged.
    pub fn append(&self, segment: impl Into<PathSegment>) -> Path {
        let len = self.len() + 1;
        Path {
            tail: Some(Arc::new(Node {
                parent: self.tail.clone(),
                segment: segment.into(),
                len,
            })),
        }
    }

    /// Number of segments after the root marker.
    pub fn len(&self) -> usize {
        self.tail.as_ref().map_or(0, |node| node.len)
    }

    pub fn is_root(&self) -> bool {
        self.tail.is_none()
    }

    /// Segments in root-first order.
    pub fn segments(&self) -> Vec<PathSegment> {
        let mut segments = Vec::with_capacity(self.len());
        let mut cursor = self.tail.as_deref();
        while let Some(node) = cursor {
            segments.push(node.segment.clone());
            cursor = node.parent.as_deref();
        }
        segments.reverse();
        segments
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.tail.as_deref().map(|node| &node.segment)
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.segments() == other.segments()
    }
}

impl Eq for Path {}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ROOT)?;
        for segment in self.segments() {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = LogicError;

    /// Parses the display form back into a path. Segments made only of
    /// ASCII digits become indices; everything else is an escaped key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LogicError::InvalidPath { path: s.to_string() };
        let rest = s.strip_prefix(ROOT).ok_or_else(invalid)?;
        if rest.is_empty() {
            return Ok(Path::root());
        }
        let rest = rest.strip_prefix('.').ok_or_else(invalid)?;
        let mut path = Path::root();
        for part in rest.split('.') {
            path = if is_index(part) {
                path.append(part.parse::<usize>().map_err(|_| invalid())?)
            } else {
                path.append(unescape_key(part).ok_or_else(invalid)?)
            };
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(Path::root().to_string(), "$");
        assert!(Path::root().is_root());
    }

    #[test]
    fn test_append_leaves_parent_untouched() {
        let parent = Path::root().append("map");
        let child = parent.append(1);
        assert_eq!(parent.to_string(), "$.map");
        assert_eq!(child.to_string(), "$.map.1");
        assert_eq!(child.last(), Some(&PathSegment::Index(1)));
    }

    #[test]
    fn test_parse_display_form() {
        let path: Path = "$.if.2.var.0".parse().unwrap();
        assert_eq!(
            path.segments(),
            vec![
                PathSegment::Key("if".into()),
                PathSegment::Index(2),
                PathSegment::Key("var".into()),
                PathSegment::Index(0),
            ]
        );
        assert_eq!(path, Path::root().append("if").append(2).append("var").append(0));
    }

    #[test]
    fn test_keys_needing_escapes_round_trip() {
        let path = Path::root().append("0").append(1).append("a.b").append("~").append("");
        assert_eq!(path.to_string(), "$.~20.1.a~1b.~0.");
        assert_eq!(path.to_string().parse::<Path>().unwrap(), path);
        assert_eq!(
            "$.~20".parse::<Path>().unwrap().segments(),
            vec![PathSegment::Key("0".into())]
        );
    }

    #[test]
    fn test_parse_rejects_bad_escapes() {
        assert!("$.a~".parse::<Path>().is_err());
        assert!("$.a~3".parse::<Path>().is_err());
        assert!("$.~2x".parse::<Path>().is_err());
        assert!("$.99999999999999999999999".parse::<Path>().is_err());
    }

    #[test]
    fn test_parse_rejects_unrooted() {
        assert!("a.b".parse::<Path>().is_err());
        assert!("$a".parse::<Path>().is_err());
        assert_eq!("$".parse::<Path>().unwrap(), Path::root());
    }
}
