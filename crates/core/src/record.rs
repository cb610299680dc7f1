use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::attachment::Attachment;

/// Human-readable primary field used for name lookups.
pub const NAME_FIELD: &str = "Name";

/// A row in a remote table.
///
/// Field values are kept as raw JSON because the remote base defines the
/// schema. Fields with empty values are omitted by the service, so a missing
/// key and an empty value are treated the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque record key assigned by the service.
    pub id: String,
    /// Field name to value.
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Creation timestamp as reported by the service.
    #[serde(
        rename = "createdTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_time: Option<String>,
}

impl Record {
    /// Get a field value.
    pub fn field(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the field is present on the record.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// The record's `Name`, rendered as text.
    ///
    /// String names are returned as-is; any other JSON value (numbers,
    /// formula results) is rendered with its JSON text. Returns `None` when
    /// the field is absent, null or an empty string.
    pub fn name(&self) -> Option<String> {
        match self.field(NAME_FIELD)? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// The record's `Name` exactly as listed, rendered as text.
    ///
    /// Unlike [`Record::name`], only an absent field yields `None`: an empty
    /// string stays empty, null becomes `""`, and other JSON values are
    /// rendered with their JSON text.
    pub fn name_text(&self) -> Option<String> {
        match self.field(NAME_FIELD)? {
            Value::Null => Some(String::new()),
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Parse the attachment sequence stored in `field`.
    ///
    /// Returns `None` if the field is absent or does not hold a sequence of
    /// attachment objects.
    pub fn attachments(&self, field: &str) -> Option<Vec<Attachment>> {
        let value = self.field(field)?;
        serde_json::from_value(value.clone()).ok()
    }
}

/// One page of a list response.
///
/// `offset` is the pagination cursor; it is present only when more records
/// follow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPage {
    /// Records on this page.
    #[serde(default)]
    pub records: Vec<Record>,
    /// Cursor for the next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}
