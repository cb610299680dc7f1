use clap::Args;
use tablink_client::{Identifier, TableClient};

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Table name.
    pub table: String,
}

pub async fn names(
    client: &TableClient,
    args: &ListArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let names = client
        .list_record_identifiers(&args.table, Identifier::Name)
        .await?;
    print_list(&names, format)
}

pub async fn ids(
    client: &TableClient,
    args: &ListArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let ids = client
        .list_record_identifiers(&args.table, Identifier::Id)
        .await?;
    print_list(&ids, format)
}

fn print_list(items: &[String], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
        OutputFormat::Text => {
            for item in items {
                println!("{item}");
            }
        }
    }
    Ok(())
}
