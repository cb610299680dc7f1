use percent_encoding::utf8_percent_encode;
use serde_json::{Map, Value, json};
use tablink_core::{Formula, NAME_FIELD, Record, RecordPage};
use tracing::{info, instrument};

use crate::{Error, Method, PATH_SEGMENT, TableClient};

/// Page size requested when listing record identifiers.
pub const PAGE_SIZE: u32 = 100;

/// Which identifier [`TableClient::list_record_identifiers`] returns per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Identifier {
    /// The record's `Name` field.
    #[default]
    Name,
    /// The opaque record key.
    Id,
}

fn query_pair(key: &str, value: impl Into<String>) -> (String, String) {
    (key.to_owned(), value.into())
}

/// `/{key}` with the key percent-encoded. An empty key would address the
/// table root, so it is rejected.
fn record_path(key: &str) -> Result<String, Error> {
    if key.is_empty() {
        return Err(Error::InvalidKey(key.to_owned()));
    }
    Ok(format!("/{}", utf8_percent_encode(key, PATH_SEGMENT)))
}

impl TableClient {
    /// List every record of `table` matching `query`, following all pages.
    async fn list_records(
        &self,
        table: &str,
        query: &[(String, String)],
    ) -> Result<Vec<Record>, Error> {
        let content = self.request(Method::GET, table, "/", query, None).await?;
        let page: RecordPage =
            serde_json::from_value(content).map_err(|e| Error::Deserialization(e.to_string()))?;
        Ok(page.records)
    }

    /// List the `Name` or key of every record in `table`, in server order.
    ///
    /// Only the `Name` field is requested. With [`Identifier::Name`], an empty
    /// name is listed as `""`, while a record the server returned without a
    /// `Name` at all fails the call with [`Error::MissingField`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), tablink_client::Error> {
    /// use tablink_client::{Identifier, TableClient};
    ///
    /// let client = TableClient::builder("https://api.airtable.com/v0/appXXXX")
    ///     .api_key("key")
    ///     .build()?;
    /// let keys = client.list_record_identifiers("Samples", Identifier::Id).await?;
    /// println!("{} records", keys.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_record_identifiers(
        &self,
        table: &str,
        identifier: Identifier,
    ) -> Result<Vec<String>, Error> {
        let query = [
            query_pair("fields[]", NAME_FIELD),
            query_pair("pageSize", PAGE_SIZE.to_string()),
        ];
        let records = self.list_records(table, &query).await?;

        match identifier {
            Identifier::Id => Ok(records.into_iter().map(|r| r.id).collect()),
            Identifier::Name => records
                .into_iter()
                .map(|r| {
                    r.name_text().ok_or_else(|| Error::MissingField {
                        record: r.id.clone(),
                        field: NAME_FIELD.to_owned(),
                    })
                })
                .collect(),
        }
    }

    /// Fetch every record of `table`, restricted to the given fields.
    pub async fn get_fields<S: AsRef<str>>(
        &self,
        fields: &[S],
        table: &str,
    ) -> Result<Vec<Record>, Error> {
        let query: Vec<(String, String)> = fields
            .iter()
            .map(|f| query_pair("fields[]", f.as_ref()))
            .collect();
        self.list_records(table, &query).await
    }

    /// Key of the first record in `table` whose `Name` equals `name`.
    ///
    /// When nothing matches, fails with [`Error::IndexOutOfRange`]; there is
    /// no separate not-found error.
    #[instrument(skip(self))]
    pub async fn find_record_key(&self, name: &str, table: &str) -> Result<String, Error> {
        let formula = Formula::field_equals(NAME_FIELD, name)?;
        let query = [query_pair("filterByFormula", formula.as_str())];
        let records = self.list_records(table, &query).await?;

        records
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| Error::IndexOutOfRange {
                what: format!("records matching {formula}"),
                index: 0,
                len: 0,
            })
    }

    /// Fetch a single record by key.
    pub async fn get_record(&self, key: &str, table: &str) -> Result<Record, Error> {
        let content = self
            .request(Method::GET, table, &record_path(key)?, &[], None)
            .await?;
        serde_json::from_value(content).map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Fetch the first record whose `Name` equals `name`.
    ///
    /// Two round trips: the key lookup, then the fetch. The record may change
    /// in between.
    pub async fn get_record_by_name(&self, name: &str, table: &str) -> Result<Record, Error> {
        let key = self.find_record_key(name, table).await?;
        self.get_record(&key, table).await
    }

    /// Partially update a record.
    ///
    /// Only the given fields are sent. Each of them replaces the stored value
    /// as a whole (sequence fields are not merged); fields not mentioned are
    /// left untouched.
    #[instrument(skip(self, partial), fields(field_count = partial.len()))]
    pub async fn update_record(
        &self,
        key: &str,
        table: &str,
        partial: Map<String, Value>,
    ) -> Result<Record, Error> {
        let body = json!({ "fields": partial });
        let content = self
            .request(Method::PATCH, table, &record_path(key)?, &[], Some(&body))
            .await?;
        info!("record updated");
        serde_json::from_value(content).map_err(|e| Error::Deserialization(e.to_string()))
    }
}
