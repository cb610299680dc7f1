use clap::Args;
use tablink_client::TableClient;

use super::display_value;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Table name.
    pub table: String,

    /// Value of the record's `Name` field.
    pub name: String,
}

pub async fn key(
    client: &TableClient,
    args: &RecordArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let key = client.find_record_key(&args.name, &args.table).await?;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "id": key }));
        }
        OutputFormat::Text => println!("{key}"),
    }
    Ok(())
}

pub async fn get(
    client: &TableClient,
    args: &RecordArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let record = client.get_record_by_name(&args.name, &args.table).await?;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Text => {
            println!("{}", record.id);
            if let Some(ref created) = record.created_time {
                println!("  created: {created}");
            }
            for (field, value) in &record.fields {
                println!("  {field}: {}", display_value(value));
            }
        }
    }
    Ok(())
}
