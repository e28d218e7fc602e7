//! Field exclusion applied to records on the way out.

use std::collections::BTreeSet;
use std::ops::Deref;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Names of top-level fields dropped from serialized records.
/// Never influences which records match a query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Projection {
    excluded: BTreeSet<String>,
}

impl Projection {
    /// Keep every field.
    pub fn none() -> Self {
        Self::default()
    }

    /// Hide internal bookkeeping (`version`).
    pub fn default_hidden() -> Self {
        Self::excluding(["version"])
    }

    pub fn excluding<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { excluded: fields.into_iter().map(Into::into).collect() }
    }

    pub fn apply(&self, value: Value) -> Value {
        match value {
            Value::Object(mut map) => {
                for field in &self.excluded {
                    map.remove(field);
                }
                Value::Object(map)
            }
            other => other,
        }
    }
}

/// A record paired with the projection used when it is serialized.
#[derive(Clone, Debug, PartialEq)]
pub struct Projected<T> {
    record: T,
    projection: Projection,
}

impl<T> Projected<T> {
    pub fn new(record: T, projection: Projection) -> Self {
        Self { record, projection }
    }
}

impl<T> Deref for Projected<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}

impl<T: Serialize> Serialize for Projected<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = serde_json::to_value(&self.record).map_err(serde::ser::Error::custom)?;
        self.projection.apply(value).serialize(serializer)
    }
}
