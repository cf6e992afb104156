//! Path pattern parsing and matching.
//!
//! # Responsibilities
//! - Parse patterns such as `/api/notes/articles/{id}/chapters/{chapter_id}`
//! - Match a concrete request path against a pattern
//! - Expose a specificity rank used to order overlapping patterns
//!
//! # Design Decisions
//! - Path matching is case-sensitive, segment by segment
//! - A `{name}` segment matches exactly one non-empty segment
//! - No regex and no multi-segment wildcards
//! - Trailing slashes are significant (`/memos/` is not `/memos`)

use std::fmt;

use crate::routing::RouteError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern. Must start with `/`; `{name}` marks a named segment.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: raw.to_string(),
            reason: reason.to_string(),
        };

        let rest = raw
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for part in rest.split('/') {
                if part.is_empty() {
                    return Err(invalid("empty segment"));
                }
                let segment = match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                    Some(name) => {
                        if name.is_empty()
                            || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                        {
                            return Err(invalid("parameter names must be [A-Za-z0-9_]+"));
                        }
                        if segments
                            .iter()
                            .any(|s| matches!(s, Segment::Param(existing) if existing == name))
                        {
                            return Err(invalid("duplicate parameter name"));
                        }
                        Segment::Param(name.to_string())
                    }
                    None if part.contains(&['{', '}'][..]) => {
                        return Err(invalid("braces must wrap a whole segment"));
                    }
                    None => Segment::Literal(part.to_string()),
                };
                segments.push(segment);
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if `path` (no query string) matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let Some(rest) = path.strip_prefix('/') else {
            return false;
        };
        if rest.is_empty() {
            return self.segments.is_empty();
        }

        let mut parts = rest.split('/');
        for segment in &self.segments {
            match (segment, parts.next()) {
                (Segment::Literal(expected), Some(actual)) if expected == actual => {}
                (Segment::Param(_), Some(actual)) if !actual.is_empty() => {}
                _ => return false,
            }
        }
        parts.next().is_none()
    }

    /// Per-segment rank: 1 for a literal, 0 for a parameter.
    ///
    /// Among patterns matching the same path, the lexicographically greatest
    /// rank is the most specific.
    pub fn specificity(&self) -> Vec<u8> {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Literal(_) => 1,
                Segment::Param(_) => 0,
            })
            .collect()
    }

    /// Two patterns with the same shape match exactly the same paths.
    pub fn same_shape(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let pattern = PathPattern::parse("/api/notes/memos").unwrap();
        assert!(pattern.matches("/api/notes/memos"));
        assert!(!pattern.matches("/api/notes/memos/"));
        assert!(!pattern.matches("/api/notes/memos/1"));
        assert!(!pattern.matches("/api/notes"));
        assert!(!pattern.matches("/API/notes/memos"));
    }

    #[test]
    fn test_param_match() {
        let pattern = PathPattern::parse("/api/notes/articles/{id}/chapters/{chapter_id}").unwrap();
        assert!(pattern.matches("/api/notes/articles/42/chapters/7"));
        assert!(!pattern.matches("/api/notes/articles//chapters/7"));
        assert!(!pattern.matches("/api/notes/articles/42/chapters"));
        assert!(!pattern.matches("/api/notes/articles/42"));
    }

    #[test]
    fn test_root_pattern() {
        let pattern = PathPattern::parse("/").unwrap();
        assert!(pattern.matches("/"));
        assert!(!pattern.matches("/health"));
        assert!(!PathPattern::parse("/health").unwrap().matches("/"));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(PathPattern::parse("health").is_err());
        assert!(PathPattern::parse("/a//b").is_err());
        assert!(PathPattern::parse("/a/{}").is_err());
        assert!(PathPattern::parse("/a/{id").is_err());
        assert!(PathPattern::parse("/a/x{id}").is_err());
        assert!(PathPattern::parse("/a/{id}/b/{id}").is_err());
    }

    #[test]
    fn test_specificity_prefers_leftmost_literal() {
        let a = PathPattern::parse("/a/{x}/b").unwrap();
        let b = PathPattern::parse("/a/c/{y}").unwrap();
        assert!(a.matches("/a/c/b") && b.matches("/a/c/b"));
        assert!(b.specificity() > a.specificity());
    }

    #[test]
    fn test_same_shape_ignores_param_names() {
        let a = PathPattern::parse("/memos/{id}").unwrap();
        let b = PathPattern::parse("/memos/{memo_id}").unwrap();
        let c = PathPattern::parse("/memos/latest").unwrap();
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
    }
}
