use std::path::Path;

use serde_json::{Map, Value};
use tablink_blob::{ContentAddresser, file_extension};
use tablink_core::{Attachment, Record};
use tracing::{info, instrument};

use crate::{Error, TableClient};

/// Filename given to a posted attachment: `{name}_{label}{extension}`.
///
/// The label is the field name lowercased with spaces replaced by
/// underscores, so posting `plot.png` to field `QC Plot` of record
/// `sample-1` yields `sample-1_qc_plot.png`.
pub fn attachment_filename(name: &str, field: &str, path: &Path) -> String {
    let label = field.replace(' ', "_").to_lowercase();
    format!("{name}_{label}{}", file_extension(path))
}

fn attachment_field(field: &str, attachments: &[Attachment]) -> Result<Map<String, Value>, Error> {
    let value =
        serde_json::to_value(attachments).map_err(|e| Error::Deserialization(e.to_string()))?;
    let mut partial = Map::new();
    partial.insert(field.to_owned(), value);
    Ok(partial)
}

/// Attachments currently stored in `field` of `record`.
///
/// An absent or null field holds none. Any other value that is not a
/// sequence of attachment objects is an error.
fn stored_attachments(record: &Record, field: &str) -> Result<Vec<Attachment>, Error> {
    match record.field(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            Error::Deserialization(format!(
                "field '{field}' of record {} does not hold attachments: {e}",
                record.id
            ))
        }),
    }
}

impl TableClient {
    fn require_addresser(&self) -> Result<&ContentAddresser, Error> {
        self.addresser().ok_or_else(|| {
            Error::Configuration(
                "attachment uploads need object storage; configure a content addresser".to_owned(),
            )
        })
    }

    /// URL of the attachment at `index` in `field` of the record named `name`.
    ///
    /// Fails with [`Error::MissingField`] if the record has no such field and
    /// [`Error::IndexOutOfRange`] if it holds fewer attachments.
    pub async fn get_attachment_url(
        &self,
        name: &str,
        table: &str,
        field: &str,
        index: usize,
    ) -> Result<String, Error> {
        let record = self.get_record_by_name(name, table).await?;
        let value = record.field(field).ok_or_else(|| Error::MissingField {
            record: record.id.clone(),
            field: field.to_owned(),
        })?;
        let attachments: Vec<Attachment> = serde_json::from_value(value.clone())
            .map_err(|e| Error::Deserialization(e.to_string()))?;

        let len = attachments.len();
        attachments
            .into_iter()
            .nth(index)
            .map(|a| a.url)
            .ok_or_else(|| Error::IndexOutOfRange {
                what: format!("attachments in field '{field}'"),
                index,
                len,
            })
    }

    /// Upload a file and set it as the only attachment in `field` of the
    /// record named `name`.
    ///
    /// The field's previous attachments are replaced, not kept. Use
    /// [`TableClient::append_attachment`] to add to them instead.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: tablink_client::TableClient) -> Result<(), tablink_client::Error> {
    /// use std::path::Path;
    ///
    /// let record = client
    ///     .post_attachment(Path::new("out/plot.png"), "Samples", "sample-1", "QC Plot")
    ///     .await?;
    /// println!("updated {}", record.id);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self))]
    pub async fn post_attachment(
        &self,
        path: &Path,
        table: &str,
        name: &str,
        field: &str,
    ) -> Result<Record, Error> {
        let addresser = self.require_addresser()?;
        let url = addresser.upload(path).await?;

        let attachment = Attachment::new(url, attachment_filename(name, field, path));
        let partial = attachment_field(field, &[attachment])?;

        let key = self.find_record_key(name, table).await?;
        let record = self.update_record(&key, table, partial).await?;
        info!(record = %record.id, "attachment posted");
        Ok(record)
    }

    /// Upload a file and add it after the existing attachments in `field` of
    /// the record named `name`.
    ///
    /// Reads the record, then writes back its current attachments plus the new
    /// one. Changes made to the field between the read and the write are lost.
    /// Fails without writing if the field holds something other than
    /// attachments.
    #[instrument(skip(self))]
    pub async fn append_attachment(
        &self,
        path: &Path,
        table: &str,
        name: &str,
        field: &str,
    ) -> Result<Record, Error> {
        let addresser = self.require_addresser()?;
        let url = addresser.upload(path).await?;

        let record = self.get_record_by_name(name, table).await?;
        let mut attachments = stored_attachments(&record, field)?;
        attachments.push(Attachment::new(url, attachment_filename(name, field, path)));
        let partial = attachment_field(field, &attachments)?;

        let updated = self.update_record(&record.id, table, partial).await?;
        info!(record = %updated.id, count = attachments.len(), "attachment appended");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_uses_normalized_field_label() {
        assert_eq!(
            attachment_filename("sample-1", "QC Plot", Path::new("out/plot.png")),
            "sample-1_qc_plot.png"
        );
    }

    #[test]
    fn filename_without_extension() {
        assert_eq!(
            attachment_filename("s2", "Raw Data File", Path::new("reads")),
            "s2_raw_data_file"
        );
    }

    #[test]
    fn attachment_field_wraps_sequence() {
        let partial =
            attachment_field("Plot", &[Attachment::new("https://b/k.png", "s_plot.png")]).unwrap();
        assert_eq!(
            Value::Object(partial),
            serde_json::json!({"Plot": [{"url": "https://b/k.png", "filename": "s_plot.png"}]})
        );
    }

    fn record(fields: Value) -> Record {
        serde_json::from_value(serde_json::json!({"id": "rec1", "fields": fields})).unwrap()
    }

    #[test]
    fn stored_attachments_of_absent_or_null_field_is_empty() {
        let rec = record(serde_json::json!({"Docs": null}));
        assert!(stored_attachments(&rec, "Docs").unwrap().is_empty());
        assert!(stored_attachments(&rec, "Plot").unwrap().is_empty());
    }

    #[test]
    fn stored_attachments_rejects_scalar_field() {
        let rec = record(serde_json::json!({"Docs": "free text"}));
        assert!(matches!(
            stored_attachments(&rec, "Docs"),
            Err(Error::Deserialization(_))
        ));
    }

    #[tokio::test]
    async fn upload_without_addresser_is_a_configuration_error() {
        let client = TableClient::builder("http://127.0.0.1:9/v0/app")
            .api_key("key")
            .build()
            .unwrap();
        let err = client
            .post_attachment(Path::new("plot.png"), "Samples", "s1", "Plot")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
