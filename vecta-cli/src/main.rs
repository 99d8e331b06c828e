/// Vecta command line client
///
/// Builds requests with the same builders library users get. `--dry-run`
/// prints the assembled request instead of sending it.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value as Json;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vecta_client::{Client, ClientConfig, ExploreParams, Kind, Movement, RetryPolicy};
use vecta_core::RestRequest;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Pretty JSON (default)
    Json,
    /// JSON Lines (one object per line)
    Jsonl,
}

#[derive(Parser)]
#[command(name = "vecta")]
#[command(about = "Vecta CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: Connection,

    /// Print the request instead of sending it
    #[arg(long, global = true)]
    dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Connection {
    /// http or https
    #[arg(long, env = "VECTA_SCHEME", default_value = "http", global = true)]
    scheme: String,

    /// Server host and port
    #[arg(long, env = "VECTA_HOST", default_value = "localhost:8080", global = true)]
    host: String,

    /// Request timeout in milliseconds
    #[arg(long, default_value = "30000", global = true)]
    timeout_ms: u64,

    /// Retry network failures and 5xx responses with backoff
    #[arg(long, global = true)]
    retry: bool,
}

impl Connection {
    fn config(&self) -> ClientConfig {
        let retry = if self.retry {
            RetryPolicy::standard()
        } else {
            RetryPolicy::no_retry()
        };
        ClientConfig::new(&self.scheme, &self.host)
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_retry(retry)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Get query
    Get {
        /// Class to fetch
        class_name: String,
        /// Field selection, e.g. "title url"
        #[arg(short, long)]
        fields: String,
        /// things or actions
        #[arg(short, long, default_value = "things")]
        kind: Kind,
        /// Where filter as JSON
        #[arg(short = 'w', long = "where")]
        filter: Option<String>,
        /// Explore concepts (repeatable)
        #[arg(long)]
        concept: Vec<String>,
        /// Minimum certainty of explored results
        #[arg(long, requires = "concept")]
        certainty: Option<f64>,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Run an Aggregate query
    Aggregate {
        class_name: String,
        /// Aggregation fields, e.g. "meta { count }"
        #[arg(short, long)]
        fields: String,
        #[arg(short, long, default_value = "things")]
        kind: Kind,
        #[arg(short = 'w', long = "where")]
        filter: Option<String>,
        /// Property path to group by (repeatable)
        #[arg(long)]
        group_by: Vec<String>,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Run an Explore query
    Explore {
        /// Concepts to search for (repeatable)
        #[arg(short, long, required = true)]
        concept: Vec<String>,
        #[arg(short, long, default_value = "beacon certainty className")]
        fields: String,
        #[arg(long)]
        certainty: Option<f64>,
        /// Concepts to move toward
        #[arg(long)]
        move_to: Vec<String>,
        /// Concepts to move away from
        #[arg(long)]
        move_away_from: Vec<String>,
        /// Force applied to both movements
        #[arg(long, default_value = "0.5")]
        force: f64,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Object operations
    Object {
        #[command(subcommand)]
        command: ObjectCommands,
    },
    /// Schema operations
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
}

#[derive(Subcommand)]
enum ObjectCommands {
    /// List objects
    List {
        #[arg(short, long, default_value = "things")]
        kind: Kind,
        #[arg(short, long)]
        limit: Option<u32>,
        /// Include the vector of each object
        #[arg(long)]
        vector: bool,
        /// Include classification metadata
        #[arg(long)]
        classification: bool,
    },
    /// Get one object
    Get {
        id: String,
        #[arg(short, long, default_value = "things")]
        kind: Kind,
        #[arg(long)]
        vector: bool,
    },
    /// Create an object
    Create {
        class_name: String,
        /// Properties as a JSON object
        schema: String,
        #[arg(short, long, default_value = "things")]
        kind: Kind,
        #[arg(long)]
        id: Option<String>,
    },
    /// Delete an object
    Delete {
        id: String,
        #[arg(short, long, default_value = "things")]
        kind: Kind,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Print the schema
    Get,
    /// Create a class from a JSON definition
    CreateClass {
        class: String,
        #[arg(short, long, default_value = "things")]
        kind: Kind,
    },
    /// Delete a class
    DeleteClass {
        class_name: String,
        #[arg(short, long, default_value = "things")]
        kind: Kind,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Default to info level, can override with RUST_LOG
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.connection.config();
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid connection settings")?;
    let client = Client::new(config).context("Failed to create client")?;
    info!(host = %cli.connection.host, "client configured");

    match cli.command {
        Commands::Get {
            class_name,
            fields,
            kind,
            filter,
            concept,
            certainty,
            limit,
        } => {
            let mut builder = client
                .graphql()
                .get()
                .with_kind(kind)
                .with_class_name(class_name)
                .with_fields(fields);
            if let Some(filter) = filter {
                builder = builder.with_where_json(&parse_json(&filter, "where filter")?);
            }
            if let Some(explore) = explore_params(concept, certainty) {
                builder = builder.with_explore(explore);
            }
            if let Some(limit) = limit {
                builder = builder.with_limit(limit);
            }

            if cli.dry_run {
                println!("{}", builder.build()?);
            } else {
                let response = builder.execute().await.context("Get query failed")?;
                print_json(&response.data)?;
            }
        }

        Commands::Aggregate {
            class_name,
            fields,
            kind,
            filter,
            group_by,
            limit,
        } => {
            let mut builder = client
                .graphql()
                .aggregate()
                .with_kind(kind)
                .with_class_name(class_name)
                .with_fields(fields)
                .with_group_by(group_by);
            if let Some(filter) = filter {
                builder = builder.with_where_json(&parse_json(&filter, "where filter")?);
            }
            if let Some(limit) = limit {
                builder = builder.with_limit(limit);
            }

            if cli.dry_run {
                println!("{}", builder.build()?);
            } else {
                let response = builder.execute().await.context("Aggregate query failed")?;
                print_json(&response.data)?;
            }
        }

        Commands::Explore {
            concept,
            fields,
            certainty,
            move_to,
            move_away_from,
            force,
            limit,
        } => {
            let mut builder = client
                .graphql()
                .explore()
                .with_concepts(concept)
                .with_fields(fields);
            if let Some(certainty) = certainty {
                builder = builder.with_certainty(certainty);
            }
            if !move_to.is_empty() {
                builder = builder.with_move_to(Movement::new(move_to, force));
            }
            if !move_away_from.is_empty() {
                builder = builder.with_move_away_from(Movement::new(move_away_from, force));
            }
            if let Some(limit) = limit {
                builder = builder.with_limit(limit);
            }

            if cli.dry_run {
                println!("{}", builder.build()?);
            } else {
                let response = builder.execute().await.context("Explore query failed")?;
                print_rows(response.explore(), cli.output)?;
            }
        }

        Commands::Object { command } => {
            handle_object_command(&client, command, cli.dry_run, cli.output).await?;
        }

        Commands::Schema { command } => {
            handle_schema_command(&client, command, cli.dry_run).await?;
        }
    }

    Ok(())
}

async fn handle_object_command(
    client: &Client,
    command: ObjectCommands,
    dry_run: bool,
    output: OutputFormat,
) -> Result<()> {
    let data = client.data();

    match command {
        ObjectCommands::List {
            kind,
            limit,
            vector,
            classification,
        } => {
            let mut builder = data.getter().with_kind(kind);
            if vector {
                builder = builder.with_vector();
            }
            if classification {
                builder = builder.with_classification();
            }
            if let Some(limit) = limit {
                builder = builder.with_limit(limit);
            }

            if dry_run {
                print_request(&builder.build()?)?;
            } else {
                let list = builder.execute().await.context("Failed to list objects")?;
                let rows = list
                    .objects
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<serde_json::Result<Vec<_>>>()?;
                print_rows(&rows, output)?;
                if let Some(total) = list.total_results {
                    info!(total, "listed objects");
                }
            }
        }

        ObjectCommands::Get { id, kind, vector } => {
            let mut builder = data.getter_by_id().with_kind(kind).with_id(id);
            if vector {
                builder = builder.with_vector();
            }

            if dry_run {
                print_request(&builder.build()?)?;
            } else {
                let object = builder.execute().await.context("Failed to get object")?;
                print_json(&serde_json::to_value(&object)?)?;
            }
        }

        ObjectCommands::Create {
            class_name,
            schema,
            kind,
            id,
        } => {
            let mut builder = data
                .creator()
                .with_kind(kind)
                .with_class_name(class_name)
                .with_schema(parse_json(&schema, "schema")?);
            if let Some(id) = id {
                builder = builder.with_id(id);
            }

            if dry_run {
                print_request(&builder.build()?)?;
            } else {
                let object = builder.execute().await.context("Failed to create object")?;
                print_json(&serde_json::to_value(&object)?)?;
            }
        }

        ObjectCommands::Delete { id, kind } => {
            let builder = data.deleter().with_kind(kind).with_id(id.clone());

            if dry_run {
                print_request(&builder.build()?)?;
            } else {
                builder.execute().await.context("Failed to delete object")?;
                println!("Object deleted: {}", id);
            }
        }
    }

    Ok(())
}

async fn handle_schema_command(client: &Client, command: SchemaCommands, dry_run: bool) -> Result<()> {
    let schema = client.schema();

    match command {
        SchemaCommands::Get => {
            let builder = schema.getter();
            if dry_run {
                print_request(&builder.build()?)?;
            } else {
                let body = builder.execute().await.context("Failed to get schema")?;
                print_json(&body)?;
            }
        }

        SchemaCommands::CreateClass { class, kind } => {
            let builder = schema
                .class_creator()
                .with_kind(kind)
                .with_class(parse_json(&class, "class definition")?);
            if dry_run {
                print_request(&builder.build()?)?;
            } else {
                let body = builder.execute().await.context("Failed to create class")?;
                print_json(&body)?;
            }
        }

        SchemaCommands::DeleteClass { class_name, kind } => {
            let builder = schema
                .class_deleter()
                .with_kind(kind)
                .with_class_name(class_name.clone());
            if dry_run {
                print_request(&builder.build()?)?;
            } else {
                builder.execute().await.context("Failed to delete class")?;
                println!("Class deleted: {}", class_name);
            }
        }
    }

    Ok(())
}

/// Explore block for a Get query. Certainty without concepts still yields a
/// block so the builder reports the missing concepts.
fn explore_params(concepts: Vec<String>, certainty: Option<f64>) -> Option<ExploreParams> {
    if concepts.is_empty() && certainty.is_none() {
        return None;
    }
    let explore = ExploreParams::new(concepts);
    Some(match certainty {
        Some(certainty) => explore.with_certainty(certainty),
        None => explore,
    })
}

fn parse_json(text: &str, what: &str) -> Result<Json> {
    serde_json::from_str(text).with_context(|| format!("Invalid JSON in {}", what))
}

fn print_json(value: &Json) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_rows(rows: &[Json], output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows)?);
        }
        OutputFormat::Jsonl => {
            for row in rows {
                println!("{}", serde_json::to_string(row)?);
            }
        }
    }
    Ok(())
}

fn print_request(request: &RestRequest) -> Result<()> {
    println!("{}", request);
    if let Some(body) = &request.body {
        print_json(body)?;
    }
    Ok(())
}
