//! CARD Catalog CLI: builds and inspects the catalog knowledge graph
//!
//! Loads the configured tables, filters and caps the records, builds the
//! similarity graph and prints statistics, exports or layouts.

use anyhow::{bail, Context, Result};
use card_catalog::graph::{
    compute_layout_with, connected_components, export_adjacency_matrix, export_edge_list, filter_by_degree,
    graph_statistics, GraphStatistics,
};
use card_catalog::llm::truncate_text;
use card_catalog::{
    search_records, unique_values, CapPolicy, Catalog, CatalogConfig, CatalogGraph, EntityKind, FilterSpec,
    GraphRequest, LlmClient,
};
use clap::{Args, Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "card-catalog", version, about = "CARD Catalog knowledge graph CLI")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "CARD_CATALOG_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the catalog tables (overrides the config file)
    #[arg(long, global = true)]
    tables_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Args)]
struct GraphArgs {
    /// Entity kind: datasets, publications, code_repos, cell_lines
    #[arg(long, default_value = "datasets")]
    kind: EntityKind,

    /// Connection field (repeatable); the kind's defaults when omitted
    #[arg(long = "field")]
    fields: Vec<String>,

    /// Minimum number of shared values for an edge
    #[arg(long)]
    min_weight: Option<u32>,

    /// Column filter `Column=value1,value2` (repeatable)
    #[arg(long = "filter")]
    filters: Vec<String>,

    /// Fail instead of truncating when records exceed the node cap
    #[arg(long)]
    strict: bool,

    /// Keep only nodes with at least this degree
    #[arg(long, default_value_t = 0)]
    min_degree: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Graph statistics
    Stats(GraphArgs),
    /// Edge list with shared values
    Edges(GraphArgs),
    /// Weighted adjacency matrix
    Matrix(GraphArgs),
    /// Node positions from the spring layout
    Layout(GraphArgs),
    /// Connected components, largest first
    Components(GraphArgs),
    /// Keyword search across record fields
    Search {
        term: String,
        #[arg(long, default_value = "datasets")]
        kind: EntityKind,
        /// Restrict the search to these columns (repeatable)
        #[arg(long = "column")]
        columns: Vec<String>,
    },
    /// Distinct values of a column with counts
    Values {
        column: String,
        #[arg(long, default_value = "datasets")]
        kind: EntityKind,
    },
    /// Send a prompt to the configured LLM
    Ask {
        prompt: String,
        /// Truncate the prompt to the input limit instead of failing
        #[arg(long)]
        truncate: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<CatalogConfig> {
    let mut config = match &cli.config {
        Some(path) => CatalogConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => CatalogConfig::default(),
    };
    config.apply_env();
    if let Some(dir) = &cli.tables_dir {
        config.data.tables_dir = dir.clone();
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let format = &cli.format;

    match &cli.command {
        Commands::Stats(args) => print_stats(&build(config, args)?, format),
        Commands::Edges(args) => print_edges(&build(config, args)?, format),
        Commands::Matrix(args) => print_matrix(&build(config, args)?, format),
        Commands::Layout(args) => print_layout(&build(config, args)?, format),
        Commands::Components(args) => print_components(&build(config, args)?, format),
        Commands::Search { term, kind, columns } => {
            let catalog = Catalog::new(config);
            let store = catalog.records(*kind)?;
            let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
            let schema = kind.schema();
            let rows = search_records(store.records(), term, &columns)
                .iter()
                .map(|r| vec![r.id.to_string(), schema.label_for(r)])
                .collect();
            print_rows(format, &["ID", "Name"], rows)
        }
        Commands::Values { column, kind } => {
            let catalog = Catalog::new(config);
            let store = catalog.records(*kind)?;
            let rows = unique_values(store.records(), column)
                .into_iter()
                .map(|(value, count)| vec![value, count.to_string()])
                .collect();
            print_rows(format, &[column.as_str(), "Count"], rows)
        }
        Commands::Ask { prompt, truncate } => run_ask(&config, prompt, *truncate).await,
    }
}

/// Load records and build the graph described by `args`
fn build(config: CatalogConfig, args: &GraphArgs) -> Result<CatalogGraph> {
    let min_weight = args.min_weight.unwrap_or(config.graph.min_shared_weight);
    let seed = config.graph.layout.seed;
    let catalog = Catalog::new(config);
    let request = GraphRequest::new(args.kind)
        .fields(args.fields.iter().cloned())
        .filter(parse_filters(&args.filters)?)
        .min_shared_weight(min_weight)
        .cap_policy(if args.strict { CapPolicy::Reject } else { CapPolicy::Truncate });

    let mut built = catalog
        .build(&request)
        .with_context(|| format!("failed to build the {} graph", args.kind))?;
    if built.dropped > 0 {
        eprintln!("Note: {} record(s) beyond the node cap were dropped", built.dropped);
    }
    if args.min_degree > 0 {
        built.graph = filter_by_degree(&built.graph, args.min_degree);
        built.layout = if built.graph.is_empty() {
            None
        } else {
            Some(compute_layout_with(&built.graph, &catalog.layout_config(), seed)?)
        };
    }
    Ok(built)
}

/// Parse `Column=v1,v2` filters
fn parse_filters(filters: &[String]) -> Result<FilterSpec> {
    let mut spec = FilterSpec::new();
    for raw in filters {
        let Some((column, values)) = raw.split_once('=') else {
            bail!("filter '{}' must look like Column=value1,value2", raw);
        };
        spec = spec.any_of(column.trim(), values.split(',').map(|v| v.trim().to_string()));
    }
    Ok(spec)
}

const STATS_CSV_HEADER: [&str; 3] = ["Section", "Name", "Value"];

/// Statistics flattened into one CSV table: summary metrics, then the top
/// connected and top central nodes
fn stats_csv_rows(stats: &GraphStatistics) -> Vec<Vec<String>> {
    let row = |section: &str, name: &str, value: String| vec![section.to_string(), name.to_string(), value];
    let mut rows = vec![
        row("summary", "nodes", stats.node_count.to_string()),
        row("summary", "edges", stats.edge_count.to_string()),
        row("summary", "avg_degree", format!("{:.4}", stats.avg_degree)),
        row("summary", "density", format!("{:.4}", stats.density)),
        row("summary", "max_degree", stats.max_degree.to_string()),
        row("summary", "components", stats.component_count.to_string()),
    ];
    rows.extend(
        stats
            .top_connected
            .iter()
            .map(|c| row("most_connected", &c.label, c.degree.to_string())),
    );
    rows.extend(
        stats
            .top_central
            .iter()
            .map(|c| row("most_central", &c.label, format!("{:.4}", c.score))),
    );
    rows
}

fn print_stats(built: &CatalogGraph, format: &OutputFormat) -> Result<()> {
    let stats = graph_statistics(&built.graph)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Csv => print_rows(format, &STATS_CSV_HEADER, stats_csv_rows(&stats))?,
        OutputFormat::Table => {
            println!("Nodes:       {}", stats.node_count);
            println!("Edges:       {}", stats.edge_count);
            println!("Avg degree:  {:.2}", stats.avg_degree);
            println!("Density:     {:.4}", stats.density);
            println!("Max degree:  {}", stats.max_degree);
            println!("Components:  {}", stats.component_count);
            println!();
            let connected = stats
                .top_connected
                .iter()
                .map(|c| vec![c.label.clone(), c.degree.to_string()])
                .collect();
            print_rows(format, &["Most connected", "Degree"], connected)?;
            let central = stats
                .top_central
                .iter()
                .map(|c| vec![c.label.clone(), format!("{:.4}", c.score)])
                .collect();
            print_rows(format, &["Most central", "Betweenness"], central)?;
        }
    }

    Ok(())
}

fn print_edges(built: &CatalogGraph, format: &OutputFormat) -> Result<()> {
    let rows = export_edge_list(&built.graph);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        _ => {
            let cells = rows
                .into_iter()
                .map(|r| vec![r.node_a, r.node_b, r.weight.to_string(), r.shared_values])
                .collect();
            print_rows(format, &["Node 1", "Node 2", "Weight", "Shared Features"], cells)?;
        }
    }
    Ok(())
}

fn print_matrix(built: &CatalogGraph, format: &OutputFormat) -> Result<()> {
    let matrix = export_adjacency_matrix(&built.graph);

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "labels": matrix.labels,
                "matrix": matrix.to_rows(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        _ => {
            let mut header = vec![String::new()];
            header.extend(matrix.labels.iter().cloned());
            let header_refs: Vec<&str> = header.iter().map(String::as_str).collect();
            let rows = matrix
                .labels
                .iter()
                .zip(matrix.to_rows())
                .map(|(label, row)| {
                    let mut cells = vec![label.clone()];
                    cells.extend(row.iter().map(|w| format!("{}", w)));
                    cells
                })
                .collect();
            print_rows(format, &header_refs, rows)?;
        }
    }
    Ok(())
}

fn print_layout(built: &CatalogGraph, format: &OutputFormat) -> Result<()> {
    let Some(layout) = &built.layout else {
        bail!("no records matched; nothing to lay out");
    };

    let rows: Vec<Vec<String>> = layout
        .iter()
        .filter_map(|(id, (x, y))| {
            built.graph.node(id).map(|node| {
                vec![
                    node.label.clone(),
                    format!("{:.3}", x),
                    format!("{:.3}", y),
                    built.graph.degree(id).to_string(),
                ]
            })
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows_as_json(&["label", "x", "y", "degree"], &rows))?),
        _ => print_rows(format, &["Node", "X", "Y", "Degree"], rows)?,
    }
    Ok(())
}

fn print_components(built: &CatalogGraph, format: &OutputFormat) -> Result<()> {
    let rows = connected_components(&built.graph)
        .into_iter()
        .enumerate()
        .map(|(idx, members)| {
            let labels: Vec<String> = members
                .iter()
                .filter_map(|&id| built.graph.node(id).map(|n| n.label.clone()))
                .collect();
            vec![(idx + 1).to_string(), members.len().to_string(), labels.join(", ")]
        })
        .collect();
    print_rows(format, &["Component", "Size", "Members"], rows)
}

async fn run_ask(config: &CatalogConfig, prompt: &str, truncate: bool) -> Result<()> {
    let prompt = if truncate {
        truncate_text(prompt, config.llm.max_input_tokens)
    } else {
        prompt.to_string()
    };
    let client = LlmClient::new(&config.llm)?;
    let answer = client.complete(&prompt).await?;
    println!("{}", answer);
    Ok(())
}

fn rows_as_json(header: &[&str], rows: &[Vec<String>]) -> serde_json::Value {
    let objects = rows
        .iter()
        .map(|row| {
            let map: serde_json::Map<String, serde_json::Value> = header
                .iter()
                .zip(row)
                .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
                .collect();
            serde_json::Value::Object(map)
        })
        .collect();
    serde_json::Value::Array(objects)
}

fn print_rows(format: &OutputFormat, header: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows_as_json(header, &rows))?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(header)?;
            for row in &rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let count = rows.len();
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(header.to_vec());
            for row in rows {
                table.add_row(row);
            }

            println!("{}", table);
            println!("{} row(s)", count);
        }
    }
    Ok(())
}
