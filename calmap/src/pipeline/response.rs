use chrono::{NaiveDate, SecondsFormat};
use serde::ser::{Serialize, SerializeMap, Serializer};

use calmap_core::{CalmapError, Mapped};

/// How each entry's value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// A bare number (one named column).
    Scalar,
    /// An object keyed by field name (`"ALL"`).
    Object,
}

/// Per-date values mapped onto the requested calendar.
///
/// Serializes as a JSON object whose keys are midnight UTC timestamps with
/// second precision (`2020-01-03T00:00:00Z`), in ascending date order.
/// Duplicate requested dates produce duplicate keys, so the entry count
/// always equals the mapped calendar length.
#[derive(Debug, Clone, PartialEq)]
pub struct RemapResponse {
    fields: Vec<String>,
    shape: ValueShape,
    entries: Vec<Mapped>,
}

impl RemapResponse {
    /// Wrap mapped entries for rendering.
    #[must_use]
    pub const fn new(fields: Vec<String>, shape: ValueShape, entries: Vec<Mapped>) -> Self {
        Self {
            fields,
            shape,
            entries,
        }
    }

    /// Field names, in value order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Mapped entries, ascending by date.
    #[must_use]
    pub fn entries(&self) -> &[Mapped] {
        &self.entries
    }

    /// Number of rendered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing would be rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(date, first field value)` pairs, convenient for single-column requests.
    #[must_use]
    pub fn scalars(&self) -> Vec<(NaiveDate, f64)> {
        self.entries
            .iter()
            .filter_map(|m| m.values.first().map(|v| (m.date, *v)))
            .collect()
    }

    /// Render as a JSON string.
    ///
    /// # Errors
    /// Returns `Computation` if serialization fails.
    pub fn to_json(&self) -> Result<String, CalmapError> {
        serde_json::to_string(self).map_err(|e| CalmapError::computation(e.to_string()))
    }
}

/// Timestamp key for a calendar date.
#[must_use]
pub fn timestamp_key(date: NaiveDate) -> String {
    date.and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

struct FieldValues<'a> {
    fields: &'a [String],
    values: &'a [f64],
}

impl Serialize for FieldValues<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in self.fields.iter().zip(self.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for RemapResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for m in &self.entries {
            let key = timestamp_key(m.date);
            match (self.shape, m.values.as_slice()) {
                (ValueShape::Scalar, [v]) => map.serialize_entry(&key, v)?,
                _ => map.serialize_entry(
                    &key,
                    &FieldValues {
                        fields: &self.fields,
                        values: &m.values,
                    },
                )?,
            }
        }
        map.end()
    }
}
