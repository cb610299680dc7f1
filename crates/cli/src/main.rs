//! tablink CLI
//!
//! Look up records and post content-addressed attachments from the command
//! line.

mod commands;

use std::time::Duration;

use clap::{Parser, Subcommand};
use tablink_client::TableClient;
use tablink_core::TablinkConfig;
use tracing_subscriber::{EnvFilter, fmt};

/// tablink CLI: records and attachments in a tabular database.
#[derive(Parser, Debug)]
#[command(name = "tablink", version, about)]
struct Cli {
    /// Base URL of the database, e.g. `https://api.airtable.com/v0/appXXXX`.
    #[arg(long, env = "TABLINK_API_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// API key sent as a bearer token.
    #[arg(long, env = "TABLINK_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "TABLINK_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the names of every record in a table.
    Names(commands::list::ListArgs),
    /// List the keys of every record in a table.
    Ids(commands::list::ListArgs),
    /// Fetch selected fields of every record in a table.
    Fields(commands::fields::FieldsArgs),
    /// Print the key of the record with a given name.
    Key(commands::record::RecordArgs),
    /// Fetch a record by name.
    Get(commands::record::RecordArgs),
    /// Print the URL of an attachment on a record.
    Url(commands::url::UrlArgs),
    /// Upload a file and attach it to a record.
    Attach(commands::attach::AttachArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = TablinkConfig::from_env()?;
    if let Some(ref endpoint) = cli.endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(ref key) = cli.api_key {
        config = config.with_api_key(key);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let client = TableClient::from_config(&config)?;

    match cli.command {
        Command::Names(args) => commands::list::names(&client, &args, &cli.format).await,
        Command::Ids(args) => commands::list::ids(&client, &args, &cli.format).await,
        Command::Fields(args) => commands::fields::run(&client, &args, &cli.format).await,
        Command::Key(args) => commands::record::key(&client, &args, &cli.format).await,
        Command::Get(args) => commands::record::get(&client, &args, &cli.format).await,
        Command::Url(args) => commands::url::run(&client, &args, &cli.format).await,
        Command::Attach(args) => commands::attach::run(client, config, &args, &cli.format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_parses_append_flag_and_defaults() {
        let cli = Cli::try_parse_from([
            "tablink",
            "--endpoint",
            "https://api.example/v0/app1",
            "attach",
            "Samples",
            "sample-1",
            "QC Plot",
            "plot.png",
            "--bucket",
            "lab-data",
            "--append",
        ])
        .unwrap();

        let Command::Attach(args) = cli.command else {
            panic!("expected attach");
        };
        assert!(args.append);
        assert_eq!(args.field, "QC Plot");
        assert_eq!(args.bucket.as_deref(), Some("lab-data"));
        assert_eq!(cli.endpoint.as_deref(), Some("https://api.example/v0/app1"));
    }

    #[test]
    fn fields_requires_at_least_one_field() {
        assert!(Cli::try_parse_from(["tablink", "fields", "Samples"]).is_err());

        let cli = Cli::try_parse_from([
            "tablink", "--format", "json", "fields", "Samples", "-f", "Name", "-f", "Volume",
        ])
        .unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        let Command::Fields(args) = cli.command else {
            panic!("expected fields");
        };
        assert_eq!(args.fields, vec!["Name", "Volume"]);
    }
}
