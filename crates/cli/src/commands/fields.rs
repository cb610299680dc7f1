use clap::Args;
use tablink_client::TableClient;

use super::display_value;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Table name.
    pub table: String,

    /// Field to fetch; repeat for more than one.
    #[arg(long = "field", short = 'f', required = true)]
    pub fields: Vec<String>,
}

pub async fn run(
    client: &TableClient,
    args: &FieldsArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let records = client.get_fields(args.fields.as_slice(), &args.table).await?;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Text => {
            for record in &records {
                let values: Vec<String> = args
                    .fields
                    .iter()
                    .map(|f| record.field(f).map_or_else(|| "-".to_owned(), display_value))
                    .collect();
                println!("{}\t{}", record.id, values.join("\t"));
            }
        }
    }
    Ok(())
}
