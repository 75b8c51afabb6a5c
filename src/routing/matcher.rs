//! Route pattern matching module
//!
//! Compares slash-delimited route patterns (with `:name` placeholders)
//! against request paths.

/// Segments of a successfully matched pattern and path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    pub pattern_segments: Vec<String>,
    pub path_segments: Vec<String>,
}

/// Split a path into its non-empty segments
///
/// A single leading and trailing slash is stripped, anything from the first
/// `?` or `#` on is dropped, and empty segments collapse.
pub fn split_path(path: &str) -> Vec<String> {
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    let path = path.find(|c: char| c == '?' || c == '#').map_or(path, |end| &path[..end]);

    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Match `pattern` against `path`
///
/// Both must have the same number of segments. A pattern segment starting
/// with `:` accepts any segment; literal segments compare exactly.
pub fn match_path(pattern: &str, path: &str) -> Option<PathMatch> {
    let pattern_segments = split_path(pattern);
    let path_segments = split_path(path);

    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let all_match = pattern_segments
        .iter()
        .zip(&path_segments)
        .all(|(pattern, segment)| is_param(pattern) || pattern == segment);

    all_match.then_some(PathMatch {
        pattern_segments,
        path_segments,
    })
}

/// True for `:name` placeholder segments
pub fn is_param(segment: &str) -> bool {
    segment.starts_with(':')
}
