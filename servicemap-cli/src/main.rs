mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use servicemap::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "servicemap")]
#[command(about = "Servicemap CLI - agency record composition, submission and export")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, default_value = servicemap::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify the fields of a layer description into editable and service-flag sets
    Classify {
        /// Layer description or snapshot JSON (uses the configured snapshot if omitted)
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },

    /// Normalize a phone number to DDD-DDD-DDDD
    Phone {
        /// Raw phone input
        raw: String,
    },

    /// Compose a record against a layer schema without submitting it
    Compose {
        /// Record JSON (attribute object or feature)
        #[arg(short, long)]
        record: PathBuf,

        /// Layer description JSON (uses the configured snapshot if omitted)
        #[arg(short, long)]
        schema: Option<PathBuf>,

        #[command(flatten)]
        geocode: commands::GeocodeArgs,
    },

    /// Synthesize the search-terms string for a record
    SearchTerms {
        /// Record JSON (attribute object or feature)
        #[arg(short, long)]
        record: PathBuf,

        /// Keyword dictionary (overrides the configured path)
        #[arg(short, long)]
        dictionary: Option<PathBuf>,
    },

    /// Create a record, or update one when --id is given
    Submit {
        /// Object id of the record to update
        #[arg(long)]
        id: Option<i64>,

        /// Field assignment FIELD=VALUE (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        assignments: Vec<String>,

        #[command(flatten)]
        geocode: commands::GeocodeArgs,

        /// Print the composed feature without writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete a record by object id
    Delete {
        #[arg(long)]
        id: i64,
    },

    /// Render the "Service centre details" sheet for selected records
    Export {
        /// Comma-separated object ids
        #[arg(long)]
        ids: String,

        /// Line width for the text layout
        #[arg(long, default_value = "80")]
        width: usize,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.observability.log_level.clone()),
    );
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| config.observability.log_format.clone());
    let json = format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config)?;
    init_tracing(&config);

    match cli.command {
        Commands::Classify { schema } => commands::run_classify(&config, schema.as_deref()),
        Commands::Phone { raw } => commands::run_phone(&raw),
        Commands::Compose {
            record,
            schema,
            geocode,
        } => commands::run_compose(&config, &record, schema.as_deref(), &geocode),
        Commands::SearchTerms { record, dictionary } => {
            commands::run_search_terms(&config, &record, dictionary.as_deref())
        }
        Commands::Submit {
            id,
            assignments,
            geocode,
            dry_run,
        } => commands::run_submit(&config, id, &assignments, &geocode, dry_run),
        Commands::Delete { id } => commands::run_delete(&config, id),
        Commands::Export { ids, width, output } => {
            commands::run_export(&config, &ids, width, output.as_deref())
        }
    }
}
