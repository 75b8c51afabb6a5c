//! Request location parsing module
//!
//! Resolves a raw request target into an absolute URL, the named
//! parameters of the matched route pattern, and the query pairs.

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use url::Url;

use crate::config::Protocol;
use crate::error::Result;
use crate::routing::{is_param, PathMatch};

/// A path parameter, numeric when the segment reads as a finite number
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

/// Whole numbers within `i64` range serialize as JSON integers.
impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            Self::Number(n) if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n < i64::MAX as f64 => {
                serializer.serialize_i64(*n as i64)
            }
            Self::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Named parameters extracted from a matched route
pub type Params = HashMap<String, ParamValue>;

/// Decoded query-string pairs, in order of appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn from_url(url: &Url) -> Self {
        Self(url.query_pairs().into_owned().collect())
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parsed location of one request
#[derive(Debug, Clone)]
pub struct Location {
    pub url: Url,
    pub params: Params,
    pub query: Query,
}

/// Bind every `:name` pattern segment to the path segment at its position.
pub fn parse_params(pattern_segments: &[String], path_segments: &[String]) -> Params {
    pattern_segments
        .iter()
        .zip(path_segments)
        .filter(|(pattern, _)| is_param(pattern))
        .map(|(pattern, value)| (pattern[1..].to_string(), ParamValue::parse(value)))
        .collect()
}

/// Resolve `target` against `protocol://hostname:port`
///
/// Parameters are only extracted when a route matched.
pub fn parse_location(
    protocol: Protocol,
    hostname: &str,
    port: u16,
    target: &str,
    matched: Option<&PathMatch>,
) -> Result<Location> {
    let base = Url::parse(&format!("{protocol}://{hostname}:{port}"))?;
    let url = base.join(target)?;
    let query = Query::from_url(&url);
    let params = matched.map_or_else(Params::new, |m| {
        parse_params(&m.pattern_segments, &m.path_segments)
    });

    Ok(Location { url, params, query })
}
