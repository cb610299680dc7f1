use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tablink_aws::{S3Config, S3ObjectStore};
use tablink_blob::ContentAddresser;
use tablink_client::TableClient;
use tablink_core::TablinkConfig;
use tracing::debug;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct AttachArgs {
    /// Table name.
    pub table: String,

    /// Value of the record's `Name` field.
    pub name: String,

    /// Attachment field to write.
    pub field: String,

    /// File to upload.
    pub path: PathBuf,

    /// Keep the field's existing attachments instead of replacing them.
    #[arg(long)]
    pub append: bool,

    /// Bucket that receives the upload.
    #[arg(long, env = "TABLINK_BUCKET")]
    pub bucket: Option<String>,

    /// Key prefix for uploaded objects (defaults to `attachments/`).
    #[arg(long, env = "TABLINK_PREFIX")]
    pub prefix: Option<String>,

    /// AWS region of the bucket.
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Custom S3 endpoint, e.g. a local `MinIO`.
    #[arg(long, env = "TABLINK_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// IAM role to assume for the upload.
    #[arg(long, env = "TABLINK_S3_ROLE_ARN")]
    pub role_arn: Option<String>,

    /// Domain used to build public object URLs.
    #[arg(long, env = "TABLINK_PUBLIC_DOMAIN")]
    pub public_domain: Option<String>,
}

impl AttachArgs {
    fn s3_config(&self) -> S3Config {
        let mut config = S3Config::new(&self.region);
        if let Some(ref endpoint) = self.s3_endpoint {
            config = config.with_endpoint_url(endpoint);
        }
        if let Some(ref role_arn) = self.role_arn {
            config = config.with_role_arn(role_arn);
        }
        if let Some(ref domain) = self.public_domain {
            config = config.with_public_domain(domain);
        }
        config
    }
}

pub async fn run(
    client: TableClient,
    config: TablinkConfig,
    args: &AttachArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let mut config = config;
    if let Some(ref bucket) = args.bucket {
        config = config.with_bucket(bucket);
    }
    if let Some(ref prefix) = args.prefix {
        config = config.with_prefix(prefix);
    }
    let s3 = args.s3_config();
    debug!(region = %s3.region, prefix = %config.prefix, "configuring object store");
    let store = S3ObjectStore::new(s3).await;
    let addresser = ContentAddresser::from_config(&config, Arc::new(store))?;
    let client = client.with_addresser(addresser);

    let record = if args.append {
        client
            .append_attachment(&args.path, &args.table, &args.name, &args.field)
            .await?
    } else {
        client
            .post_attachment(&args.path, &args.table, &args.name, &args.field)
            .await?
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Text => {
            let count = record.attachments(&args.field).as_ref().map_or(0, Vec::len);
            println!(
                "Updated {} ({} attachment(s) in '{}').",
                record.id, count, args.field
            );
        }
    }
    Ok(())
}
