use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

use crate::{Error, Result};

/// One archive path or an ordered list of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchivePaths {
    One(Utf8PathBuf),
    Many(Vec<Utf8PathBuf>),
}

impl ArchivePaths {
    /// Normalizes into an ordered list, a single path becomes a list of one
    #[must_use]
    pub fn into_vec(self) -> Vec<Utf8PathBuf> {
        match self {
            Self::One(path) => vec![path],
            Self::Many(paths) => paths,
        }
    }
}

impl From<&str> for ArchivePaths {
    fn from(path: &str) -> Self {
        Self::One(path.into())
    }
}

impl From<String> for ArchivePaths {
    fn from(path: String) -> Self {
        Self::One(path.into())
    }
}

impl From<&Utf8Path> for ArchivePaths {
    fn from(path: &Utf8Path) -> Self {
        Self::One(path.to_path_buf())
    }
}

impl From<Utf8PathBuf> for ArchivePaths {
    fn from(path: Utf8PathBuf) -> Self {
        Self::One(path)
    }
}

impl<P: Into<Utf8PathBuf>> From<Vec<P>> for ArchivePaths {
    fn from(paths: Vec<P>) -> Self {
        Self::Many(paths.into_iter().map(Into::into).collect())
    }
}

impl<P: Into<Utf8PathBuf> + Clone> From<&[P]> for ArchivePaths {
    fn from(paths: &[P]) -> Self {
        Self::Many(paths.iter().cloned().map(Into::into).collect())
    }
}

impl TryFrom<Value> for ArchivePaths {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(path) => Ok(Self::One(path.into())),
            Value::Array(values) => values
                .into_iter()
                .map(|value| match value {
                    Value::String(path) => Ok(Utf8PathBuf::from(path)),
                    other => Err(Error::InvalidInputShape(format!(
                        "a list containing {}",
                        shape_name(&other)
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Many),
            other => Err(Error::InvalidInputShape(shape_name(&other).to_string())),
        }
    }
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
