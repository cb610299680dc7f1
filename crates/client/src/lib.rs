//! Tablink HTTP Client
//!
//! A client for a tabular-database REST API (record list, fetch and partial
//! update) with content-addressed attachment uploads.
//!
//! # Quick Start
//!
//! ```no_run
//! use tablink_client::{Identifier, TableClient};
//! use tablink_core::TablinkConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tablink_client::Error> {
//!     let config = TablinkConfig::new("https://api.airtable.com/v0/appXXXX", "key");
//!     let client = TableClient::from_config(&config)?;
//!
//!     for name in client.list_record_identifiers("Samples", Identifier::Name).await? {
//!         println!("{name}");
//!     }
//!
//!     let record = client.get_record_by_name("sample-1", "Samples").await?;
//!     println!("{:?}", record.fields);
//!     Ok(())
//! }
//! ```
//!
//! # Attachments
//!
//! Attachment operations need a [`ContentAddresser`]: files are uploaded to
//! object storage under a key derived from their content and the resulting
//! public URL is written into the record, where the remote service fetches it.
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use tablink_blob::{ContentAddresser, MemoryObjectStore};
//! use tablink_client::TableClient;
//!
//! # async fn example() -> Result<(), tablink_client::Error> {
//! let addresser = ContentAddresser::new(
//!     Arc::new(MemoryObjectStore::new()),
//!     "lab-data",
//!     "attachments/",
//! );
//! let client = TableClient::builder("https://api.airtable.com/v0/appXXXX")
//!     .api_key("key")
//!     .addresser(addresser)
//!     .build()?;
//!
//! client
//!     .post_attachment(Path::new("plot.png"), "Samples", "sample-1", "QC Plot")
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod attachments;
mod batch;
mod error;
mod records;

pub use attachments::attachment_filename;
pub use batch::{BatchFailure, BatchReport, SkipReason, update_if_missing};
pub use error::Error;
pub use records::{Identifier, PAGE_SIZE};

pub use reqwest::Method;
pub use tablink_blob::ContentAddresser;
pub use tablink_core::{Attachment, Record, TablinkConfig};

use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

/// Characters escaped in table names before they are placed in the URL path.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// HTTP client for a tabular-database base.
///
/// Every request carries the API key as a bearer token. Plain list requests
/// (`GET` on a table root) follow `offset` cursors until the last page.
#[derive(Clone)]
pub struct TableClient {
    client: Client,
    endpoint: String,
    api_key: String,
    addresser: Option<ContentAddresser>,
}

impl std::fmt::Debug for TableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("addresser", &self.addresser)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring a [`TableClient`].
#[derive(Debug)]
pub struct TableClientBuilder {
    endpoint: String,
    api_key: Option<String>,
    timeout: Option<Duration>,
    client: Option<Client>,
    addresser: Option<ContentAddresser>,
}

impl TableClientBuilder {
    /// Create a new builder with the given base endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: None,
            client: None,
            addresser: None,
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout.
    ///
    /// Without one, requests wait as long as the HTTP transport allows.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a custom reqwest Client.
    ///
    /// The configured timeout is ignored; the given client's settings apply.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Enable attachment uploads through the given addresser.
    #[must_use]
    pub fn addresser(mut self, addresser: ContentAddresser) -> Self {
        self.addresser = Some(addresser);
        self
    }

    /// Build the client.
    ///
    /// Fails immediately if the endpoint or API key is missing.
    pub fn build(self) -> Result<TableClient, Error> {
        let config = TablinkConfig {
            endpoint: Some(self.endpoint),
            api_key: self.api_key,
            ..TablinkConfig::default()
        };
        let endpoint = config.normalized_endpoint()?;
        let api_key = config.api_key()?.to_owned();

        let client = match self.client {
            Some(c) => c,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder
                    .build()
                    .map_err(|e| Error::Configuration(e.to_string()))?
            }
        };

        Ok(TableClient {
            client,
            endpoint,
            api_key,
            addresser: self.addresser,
        })
    }
}

impl TableClient {
    /// Create a client from a configuration value.
    ///
    /// The attachment addresser is not set up here because it needs a storage
    /// backend; attach one with [`TableClient::with_addresser`].
    pub fn from_config(config: &TablinkConfig) -> Result<Self, Error> {
        config.validate()?;
        let mut builder = TableClientBuilder::new(config.normalized_endpoint()?)
            .api_key(config.api_key()?);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// Create a builder for advanced configuration.
    pub fn builder(endpoint: impl Into<String>) -> TableClientBuilder {
        TableClientBuilder::new(endpoint)
    }

    /// Enable attachment uploads through the given addresser.
    #[must_use]
    pub fn with_addresser(mut self, addresser: ContentAddresser) -> Self {
        self.addresser = Some(addresser);
        self
    }

    /// The base endpoint, always ending in `/`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The attachment addresser, if configured.
    pub fn addresser(&self) -> Option<&ContentAddresser> {
        self.addresser.as_ref()
    }

    /// `endpoint + table + path`, with the table name percent-encoded.
    fn url(&self, table: &str, path: &str) -> String {
        format!(
            "{}{}{}",
            self.endpoint,
            utf8_percent_encode(table, PATH_SEGMENT),
            path
        )
    }

    // =========================================================================
    // Request primitive
    // =========================================================================

    /// Issue a request against `endpoint + table + path` and parse the JSON body.
    ///
    /// A `GET` on the table root (`path == "/"`) is a list request: while the
    /// response carries an `offset`, the same request is re-issued with that
    /// offset added and the `records` of each page are appended in order. The
    /// returned value holds the accumulated `records`; every other top-level
    /// field comes from the last page. No other request ever paginates.
    ///
    /// Any non-success status fails the call immediately.
    #[instrument(skip(self, query, body), fields(endpoint = %self.endpoint))]
    pub async fn request(
        &self,
        method: Method,
        table: &str,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let url = self.url(table, path);
        let paginate = method == Method::GET && path == "/";

        let mut content = self.send(method, &url, query, body).await?;
        if !paginate {
            return Ok(content);
        }

        let mut records = take_records(&mut content)?;
        let mut params = query.to_vec();
        while let Some(offset) = page_offset(&content) {
            debug!(offset = %offset, "retrieving page");
            params.retain(|(k, _)| k != "offset");
            params.push(("offset".to_owned(), offset));
            content = self.send(Method::GET, &url, &params, None).await?;
            records.extend(take_records(&mut content)?);
        }

        if let Some(obj) = content.as_object_mut() {
            obj.insert("records".to_owned(), Value::Array(records));
        }
        Ok(content)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header("Authorization", format!("Bearer {}", self.api_key));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<Value>()
                .await
                .map_err(|e| Error::Deserialization(e.to_string()))
        } else {
            let text = response.text().await.unwrap_or_default();
            debug!(%method, url, status = status.as_u16(), "request failed");
            Err(Error::Http {
                status: status.as_u16(),
                message: if text.is_empty() {
                    status.to_string()
                } else {
                    text
                },
            })
        }
    }
}

/// Remove the `records` array from a list response.
fn take_records(content: &mut Value) -> Result<Vec<Value>, Error> {
    match content.get_mut("records").map(Value::take) {
        Some(Value::Array(records)) => Ok(records),
        _ => Err(Error::Deserialization(
            "list response has no 'records' array".to_owned(),
        )),
    }
}

/// The pagination cursor of a list response, if more pages follow.
fn page_offset(content: &Value) -> Option<String> {
    match content.get("offset")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
