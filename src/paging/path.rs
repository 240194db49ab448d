use std::fmt;

use serde_json::Value;

/// One step into a nested JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Path of keys and indices into a JSON response, e.g. `artists.next`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    pub fn new(segments: Vec<Segment>) -> Self {
        FieldPath(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
}

impl From<&str> for FieldPath {
    fn from(key: &str) -> Self {
        FieldPath(vec![Segment::Key(key.to_string())])
    }
}

impl<const N: usize> From<[&str; N]> for FieldPath {
    fn from(keys: [&str; N]) -> Self {
        FieldPath(
            keys.into_iter()
                .map(|key| Segment::Key(key.to_string()))
                .collect(),
        )
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 && matches!(segment, Segment::Key(_)) {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Why a path could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A key or index along the path does not exist. Carries the path up to the failing segment.
    Missing(String),
    /// A segment tried to index into something that is not an object or array.
    Shape(String),
}

impl From<PathError> for crate::clients::errors::Error {
    fn from(err: PathError) -> Self {
        match err {
            PathError::Missing(path) => Self::MissingKey(path),
            PathError::Shape(detail) => Self::MalformedResponse(detail),
        }
    }
}

/// Resolve `path` inside `value`.
///
/// An empty path returns `value` itself. A present key holding `null` resolves to `null`.
pub fn get_nested<'a>(path: &FieldPath, value: &'a Value) -> Result<&'a Value, PathError> {
    let mut current = value;
    for (depth, segment) in path.segments().iter().enumerate() {
        let walked = || FieldPath(path.segments()[..=depth].to_vec()).to_string();
        current = match (segment, current) {
            (Segment::Key(key), Value::Object(map)) => {
                map.get(key).ok_or_else(|| PathError::Missing(walked()))?
            }
            (Segment::Index(index), Value::Array(items)) => {
                items.get(*index).ok_or_else(|| PathError::Missing(walked()))?
            }
            (_, other) => {
                return Err(PathError::Shape(format!(
                    "cannot resolve `{}` in {}",
                    walked(),
                    kind_of(other)
                )));
            }
        };
    }
    Ok(current)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
