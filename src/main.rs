use bq_dataset_extractor::{
    cli::{self, ExtractParams},
    client::AuthType,
    etl::Loader,
    storage::OutputsWriter,
};
use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// BigQuery Dataset Extractor: --{bqdx}-> materializes BigQuery tables as Cloud Storage datasets for pipeline steps
#[derive(Parser)]
#[command(name = "bqdx", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source credentials from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Authentication method for the BigQuery API
    #[arg(short, long, global = true, value_enum, default_value = "token")]
    auth: AuthType,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a BigQuery table into a Cloud Storage dataset
    Extract {
        /// Project that owns the source table
        #[arg(long)]
        source_project: String,

        /// Dataset containing the source table
        #[arg(long)]
        dataset: String,

        /// Source table name
        #[arg(long)]
        table: String,

        /// Base Cloud Storage output path (gs://...)
        #[arg(long)]
        destination: String,

        /// Wildcard file pattern (e.g. "part-*.csv") appended as a path segment; empty exports a single file
        #[arg(long)]
        file_pattern: Option<String>,

        /// YAML or JSON file with extract job options
        #[arg(long)]
        job_config: Option<String>,

        /// Dataset location (falls back to BQ_LOCATION, then "EU")
        #[arg(long)]
        location: Option<String>,

        /// File to write the outputs JSON to (also printed on stdout)
        #[arg(long)]
        outputs: Option<String>,
    },

    /// Test authorization to the BigQuery API
    Auth,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::load_env_file(&cli.env)?;

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    log::info!("BigQuery Dataset Extractor");

    match cli.command {
        Commands::Extract {
            source_project,
            dataset,
            table,
            destination,
            file_pattern,
            job_config,
            location,
            outputs,
        } => {
            log::info!(
                "Extracting {} to {}",
                format!("{}.{}.{}", source_project, dataset, table).cyan(),
                destination.bright_black()
            );

            let location = cli::resolve_location(location);
            let client = cli::load_bigquery_client(&cli.auth, &location)?;

            let job_config = match job_config {
                Some(path) => Some(cli::load_job_config(path)?),
                None => None,
            };

            let params = ExtractParams {
                source_project_id: source_project,
                dataset_id: dataset,
                table_name: table,
                destination_uri: destination,
                file_pattern,
                job_config,
            };

            let result = cli::extract_table(client, params).await?;

            if let Some(path) = outputs {
                OutputsWriter::new(&path)
                    .load(result.gcs_uris.clone())
                    .await?;
            }

            println!("{}", result.to_json()?);
        }
        Commands::Auth => {
            let location = cli::resolve_location(None);
            let client = cli::load_bigquery_client(&cli.auth, &location)?;
            cli::test_auth(&client).await?;
        }
    }

    Ok(())
}
