//! kgmerge CLI: build, merge and analyze knowledge-graph extracts
//!
//! Graphs move between subcommands as JSON snapshots (`.gz` for gzip).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use kgmerge::algo::{compute_metrics, lcc_subgraph, AnalysisReport, Measure};
use kgmerge::dimension::{annotate, Dimension};
use kgmerge::enrich::{plan_requests, select_candidates, Enricher};
use kgmerge::persistence::{
    export_dimension_stats, export_edges, export_node_analysis, export_nodes, save_snapshot, Snapshot,
};
use kgmerge::record::{load_records, Record};
use kgmerge::{compose_snapshots, expand, load_graph, save_graph, KgBuilder, KnowledgeGraph, PipelineConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kgmerge", version, about = "Knowledge-graph build, merge and analysis")]
struct Cli {
    /// Pipeline configuration (YAML)
    #[arg(long, global = true, env = "KGMERGE_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a graph from query result files
    Build {
        /// Record files (result-set JSON, list or single object)
        inputs: Vec<PathBuf>,

        /// Snapshot to write
        #[arg(short, long)]
        output: PathBuf,

        /// Fill edge and node dimensions from predicates
        #[arg(long)]
        annotate: bool,
    },
    /// Merge snapshots and inject the configured synthetic edges
    Merge {
        inputs: Vec<PathBuf>,

        #[arg(short, long)]
        output: PathBuf,

        /// Skip synthetic edges from the configuration
        #[arg(long)]
        no_synthetic: bool,
    },
    /// Compute the metrics bundle of a snapshot
    Metrics { input: PathBuf },
    /// Full analysis report; several inputs are merged first
    Analyze {
        inputs: Vec<PathBuf>,

        /// Directory for CSV tables (nodes, edges, analysis, dimensions)
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },
    /// Keep only the largest connected component
    Lcc {
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
    /// Build a two-hop graph around a seed from degree-2 rows
    Expand {
        /// Row file
        input: PathBuf,

        #[arg(long)]
        seed: String,

        #[arg(long, default_value = "")]
        label: String,

        #[arg(short, long)]
        output: PathBuf,
    },
    /// List the enrichment queries to issue for a snapshot
    EnrichPlan { input: PathBuf },
    /// Fold enrichment result rows into a snapshot
    EnrichAbsorb {
        input: PathBuf,

        /// Enrichment result rows
        rows: PathBuf,

        /// Dimension assigned to rows without one
        #[arg(long)]
        dimension: Option<String>,

        #[arg(short, long)]
        output: PathBuf,
    },
    /// Keep only relevant records
    Filter {
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    let format = &cli.format;

    match cli.command {
        Commands::Build { inputs, output, annotate: do_annotate } => {
            if inputs.is_empty() {
                bail!("no record files given");
            }
            let (mut graph, report) = KgBuilder::build_files(&inputs);
            if report.failed_files.len() == inputs.len() {
                bail!("none of the {} record files could be loaded", inputs.len());
            }
            if do_annotate {
                annotate(&mut graph);
            }
            save_graph(&graph, &output)?;
            print_summary(format, &report, &[
                ("records", report.records_seen.to_string()),
                ("processed", report.records_processed.to_string()),
                ("unresolvable", report.unresolvable.to_string()),
                ("failed", report.failed_count().to_string()),
                ("unreadable files", report.failed_files.len().to_string()),
                ("duplicate edges", report.duplicate_edges.to_string()),
                ("nodes", report.node_count.to_string()),
                ("edges", report.edge_count.to_string()),
            ])
        }
        Commands::Merge { inputs, output, no_synthetic } => {
            let synthetic = if no_synthetic { &[][..] } else { &config.synthetic_edges[..] };
            let (graph, report) = compose_snapshots(&inputs, synthetic)?;
            let sources: Vec<String> = inputs.iter().map(|p| p.display().to_string()).collect();
            let snapshot = Snapshot::from_graph(&graph)
                .with_description(format!("merge of {}", sources.join(", ")));
            save_snapshot(&snapshot, &output)?;
            print_summary(format, &report, &[
                ("inputs", report.inputs.len().to_string()),
                ("nodes", report.node_count.to_string()),
                ("edges", report.edge_count.to_string()),
                ("shared nodes", report.shared_nodes.len().to_string()),
                ("duplicate edges", report.duplicate_edges.to_string()),
                ("synthetic added", report.synthetic_added.to_string()),
                ("synthetic suppressed", report.synthetic_suppressed.to_string()),
            ])
        }
        Commands::Metrics { input } => {
            let graph = load_graph(&input).with_context(|| format!("loading {}", input.display()))?;
            let metrics = compute_metrics(&graph);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&metrics)?),
                OutputFormat::Table => {
                    let mut table = new_table(&["metric", "value"]);
                    for (name, measure) in metrics.iter() {
                        table.add_row(vec![name.clone(), format_measure(measure)]);
                    }
                    println!("{}", table);
                }
            }
            Ok(())
        }
        Commands::Analyze { inputs, csv_dir } => {
            let (graph, shared) = match inputs.as_slice() {
                [] => bail!("no snapshots given"),
                [single] => (load_graph(single)?, Vec::new()),
                _ => {
                    let (graph, report) = compose_snapshots(&inputs, &config.synthetic_edges)?;
                    (graph, report.shared_nodes)
                }
            };
            let report = AnalysisReport::compute(&graph, &config.analysis_options(), &shared);
            if let Some(dir) = csv_dir {
                write_tables(&graph, &report, &dir)?;
            }
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Table => print_analysis(&report),
            }
            Ok(())
        }
        Commands::Lcc { input, output } => {
            let graph = load_graph(&input)?;
            let lcc = lcc_subgraph(&graph);
            info!(
                "Largest component keeps {} of {} nodes",
                lcc.node_count(),
                graph.node_count()
            );
            save_graph(&lcc, &output)?;
            Ok(())
        }
        Commands::Expand { input, seed, label, output } => {
            let rows = load_records(&input)?;
            let (graph, report) = expand(seed.as_str(), &label, &rows);
            save_graph(&graph, &output)?;
            print_summary(format, &report, &[
                ("rows", report.rows_seen.to_string()),
                ("used", report.rows_used.to_string()),
                ("unresolvable", report.unresolvable.to_string()),
                ("nodes", report.node_count.to_string()),
                ("edges", report.edge_count.to_string()),
            ])
        }
        Commands::EnrichPlan { input } => {
            let graph = load_graph(&input)?;
            let analysis = AnalysisReport::compute(&graph, &config.analysis_options(), &[]);
            let candidates = select_candidates(&analysis.nodes, &config.enrichment);
            let requests = plan_requests(&candidates, &config.enrichment);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&requests)?),
                OutputFormat::Table => {
                    let mut table = new_table(&["dimension", "nodes", "properties"]);
                    for r in &requests {
                        let nodes: Vec<&str> = r.nodes.iter().map(|n| n.as_str()).collect();
                        table.add_row(vec![
                            r.dimension.as_str().to_string(),
                            nodes.join(" "),
                            r.properties.join(" "),
                        ]);
                    }
                    println!("{}", table);
                    println!("{} candidate(s), {} request(s)", candidates.len(), requests.len());
                }
            }
            Ok(())
        }
        Commands::EnrichAbsorb { input, rows, dimension, output } => {
            let dimension = match dimension {
                Some(name) => match Dimension::parse(&name) {
                    Some(d) => Some(d),
                    None => bail!("unknown dimension {:?}", name),
                },
                None => None,
            };
            let mut graph = load_graph(&input)?;
            let rows = load_records(&rows)?;
            let mut enricher = Enricher::new(&mut graph, &config.enrichment);
            enricher.absorb_all(&rows, dimension);
            let report = enricher.finish();
            save_graph(&graph, &output)?;
            print_summary(format, &report, &[
                ("rows", report.rows_seen.to_string()),
                ("nodes added", report.nodes_added.to_string()),
                ("edges added", report.edges_added.to_string()),
                ("existing", report.skipped_existing.to_string()),
                ("excluded", report.skipped_excluded.to_string()),
                ("generic", report.skipped_generic.to_string()),
            ])
        }
        Commands::Filter { input, output } => {
            let rows = load_records(&input)?;
            let mut kept = Vec::new();
            for (i, row) in rows.iter().enumerate() {
                match Record::from_json(row) {
                    Ok(record) if config.filter.matches(&record) => kept.push(row),
                    Ok(_) => {}
                    Err(e) => warn!("Skipping record {}: {}", i, e),
                }
            }
            std::fs::write(&output, serde_json::to_string_pretty(&kept)?)
                .with_context(|| format!("writing {}", output.display()))?;
            info!("Kept {} of {} records", kept.len(), rows.len());
            Ok(())
        }
    }
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn print_summary<T: Serialize>(format: &OutputFormat, report: &T, rows: &[(&str, String)]) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Table => {
            let mut table = new_table(&["", "count"]);
            for (name, value) in rows {
                table.add_row(vec![name.to_string(), value.clone()]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

fn format_measure(measure: &Measure) -> String {
    match measure {
        Measure::Scalar(v) if v.fract() == 0.0 => format!("{}", v),
        Measure::Scalar(v) => format!("{:.6}", v),
        Measure::Undefined => "undefined".to_string(),
        Measure::PerNode(map) => format!("({} nodes)", map.len()),
    }
}

fn print_analysis(report: &AnalysisReport) {
    let mut metrics = new_table(&["metric", "value"]);
    for (name, measure) in report.metrics.iter() {
        metrics.add_row(vec![name.clone(), format_measure(measure)]);
    }
    println!("{}", metrics);

    for (title, nodes) in [
        ("degree centrality", &report.top_degree),
        ("betweenness", &report.top_betweenness),
    ] {
        let mut table = new_table(&["id", "label", "type", "dimension", title]);
        for n in nodes {
            table.add_row(vec![
                n.id.to_string(),
                n.label.clone(),
                n.node_type.as_str().to_string(),
                n.dimension.map_or("N/A", |d| d.as_str()).to_string(),
                format!("{:.4}", n.score),
            ]);
        }
        println!("{}", table);
    }

    let mut predicates = new_table(&["property", "label", "count"]);
    for p in &report.top_predicates {
        predicates.add_row(vec![p.property_id.clone(), p.property_label.clone(), p.count.to_string()]);
    }
    println!("{}", predicates);

    let mut dimensions = new_table(&["dimension", "nodes"]);
    for (dim, count) in &report.nodes_per_dimension {
        dimensions.add_row(vec![dim.as_str().to_string(), count.to_string()]);
    }
    println!("{}", dimensions);

    if !report.shared_nodes.is_empty() {
        println!("{} node(s) shared between inputs", report.shared_nodes.len());
    }
    for path in &report.main_paths {
        match path.outcome.hops() {
            Some(hops) => println!("{} -> {}: {} hop(s)", path.source, path.target, hops),
            None => println!("{} -> {}: no path", path.source, path.target),
        }
    }
}

fn write_tables(graph: &KnowledgeGraph, report: &AnalysisReport, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    export_nodes(graph, dir.join("nodes.csv"))?;
    export_edges(graph, dir.join("edges.csv"))?;
    export_node_analysis(&report.nodes, dir.join("node_analysis.csv"))?;
    export_dimension_stats(&report.dimension_stats, dir.join("dimension_stats.csv"))?;
    Ok(())
}
