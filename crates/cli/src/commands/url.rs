use clap::Args;
use tablink_client::TableClient;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Table name.
    pub table: String,

    /// Value of the record's `Name` field.
    pub name: String,

    /// Attachment field.
    pub field: String,

    /// Position of the attachment within the field.
    #[arg(long, default_value_t = 0)]
    pub index: usize,
}

pub async fn run(
    client: &TableClient,
    args: &UrlArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let url = client
        .get_attachment_url(&args.name, &args.table, &args.field, args.index)
        .await?;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "url": url }));
        }
        OutputFormat::Text => println!("{url}"),
    }
    Ok(())
}
