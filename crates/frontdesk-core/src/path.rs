//! Typed storage-path resolution.
//!
//! A storage path is a dot-separated location inside a document body, e.g.
//! `consultationData.diagnosis`. Resolution walks the path through nested
//! objects and returns the value found at the leaf together with its kind.

use std::fmt;

use serde_json::{Map, Number, Value};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath {
    raw: String,
    segments: Vec<String>,
}

impl StoragePath {
    /// Parse a path. Empty paths and empty segments (`a..b`, `a.`) are
    /// malformed.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(CoreError::MalformedPath(raw.to_string()));
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// True when the path descends into at least one container.
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    pub fn leaf(&self) -> &str {
        // parse() guarantees at least one segment
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Resolve this path against a document body.
    ///
    /// Returns `Ok(None)` when any segment is missing or `null`, and
    /// `CoreError::NotAContainer` when an intermediate segment holds a value
    /// that cannot be descended into.
    pub fn resolve<'a>(&self, body: &'a Map<String, Value>) -> Result<Option<FieldValue<'a>>, CoreError> {
        let (leaf, containers) = match self.segments.split_last() {
            Some(split) => split,
            None => return Err(CoreError::MalformedPath(self.raw.clone())),
        };

        let mut current = body;
        for segment in containers {
            match current.get(segment) {
                None | Some(Value::Null) => return Ok(None),
                Some(Value::Object(inner)) => current = inner,
                Some(_) => {
                    return Err(CoreError::NotAContainer {
                        path: self.raw.clone(),
                        segment: segment.clone(),
                    });
                }
            }
        }

        Ok(current.get(leaf).and_then(FieldValue::from_value))
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A resolved, non-null value with its kind made explicit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(&'a Number),
    Bool(bool),
    Sequence(&'a [Value]),
    Object(&'a Map<String, Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Number,
    Bool,
    Sequence,
    Object,
}

impl<'a> FieldValue<'a> {
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Self::Text(s)),
            Value::Number(n) => Some(Self::Number(n)),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Array(items) => Some(Self::Sequence(items)),
            Value::Object(obj) => Some(Self::Object(obj)),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Number(_) => ValueKind::Number,
            Self::Bool(_) => ValueKind::Bool,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Object(_) => ValueKind::Object,
        }
    }
}
