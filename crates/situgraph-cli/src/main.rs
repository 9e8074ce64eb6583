//! Situgraph CLI
//!
//! Command-line front end for the knowledge-graph builder:
//! - Manage the local Turtle buffer (`new`, `add`)
//! - Derive views from it (`graph`, `instances`)
//! - Talk to the remote knowledge service (`lookup`, `infer`, `validate`,
//!   `save`, `stats`)
//!
//! The buffer file is the source of truth; every command re-derives what it
//! needs from it, so sessions survive process restarts.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use situgraph_client::{ApiClient, KnowledgeService};
use situgraph_model::FieldKind;

mod graph_export;
mod session;

use graph_export::GraphFormat;
use session::SessionController;

#[derive(Parser)]
#[command(name = "situgraph")]
#[command(author, version, about = "Situgraph: constrained-Turtle knowledge graph builder")]
struct Cli {
    /// Turtle buffer file the session reads and writes
    #[arg(short, long, default_value = "graph.ttl", global = true)]
    buffer: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a fresh buffer holding only the namespace preamble
    New,

    /// Export the parsed graph model (nodes and edges)
    Graph {
        /// Output format: json | dot
        #[arg(short, long, default_value = "json")]
        format: String,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List instances usable as reference targets
    Instances,

    /// Look up a verb lemma and show its senses
    Lookup {
        /// Verb lemma, case-insensitive
        verb: String,
    },

    /// Assemble one entry and append it to the buffer
    Add {
        /// Target shape identifier, e.g. Motion_shape
        shape: String,
        /// Verb lemma for the entry
        lemma: String,
        /// Optional sense gloss
        #[arg(short, long)]
        gloss: Option<String>,
        /// Field values as ROLE=KIND:VALUE (KIND: ref|entity|lit|iri|bnode),
        /// e.g. --field "Agent=entity:the captain"
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Run remote inference and replace the buffer with the rewritten graph
    Infer,

    /// Validate the buffer against the remote shapes; never modifies it
    Validate,

    /// Persist the buffer to the remote graph store
    Save,

    /// Show remote knowledge-base statistics
    Stats,
}

/// Parse one `ROLE=KIND:VALUE` field argument.
fn parse_field(raw: &str) -> Result<(String, FieldKind, String)> {
    let (role, rest) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("field `{raw}` is missing `=` (expected ROLE=KIND:VALUE)"))?;
    let (kind, value) = rest
        .split_once(':')
        .ok_or_else(|| anyhow!("field `{raw}` is missing `:` (expected ROLE=KIND:VALUE)"))?;
    let kind = FieldKind::parse(kind)
        .with_context(|| format!("field `{raw}` has an unknown kind"))?;
    Ok((role.trim().to_string(), kind, value.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    let service = ApiClient::from_env()?;
    let mut ctl = SessionController::new(service, &cli.buffer);

    match cli.command {
        Commands::New => {
            ctl.new_buffer()?;
            println!(
                "{} fresh buffer at {}",
                "created".green().bold(),
                ctl.buffer_path().display()
            );
        }

        Commands::Graph { format, out } => {
            let format = GraphFormat::parse(&format)?;
            let graph = ctl.graph()?;
            let rendered = graph_export::render(&graph, format)?;
            match out {
                Some(path) => {
                    fs::write(&path, &rendered)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!(
                        "{} {} nodes, {} edges -> {}",
                        "exported".green().bold(),
                        graph.nodes.len(),
                        graph.edges.len(),
                        path.display()
                    );
                }
                None => print!("{rendered}"),
            }
        }

        Commands::Instances => {
            let instances = ctl.instances()?;
            if instances.is_empty() {
                println!("no instances in {}", ctl.buffer_path().display());
            }
            for inst in instances {
                println!(
                    "{}  {}  {}",
                    inst.id.cyan(),
                    inst.class_name.yellow(),
                    inst.label
                );
            }
        }

        Commands::Lookup { verb } => {
            let senses = ctl.lookup(&verb)?;
            println!("{} {} sense(s) for `{}`", "found".green().bold(), senses.len(), verb.trim());
            for sense in senses {
                println!("  {}  {}", sense.id.cyan(), sense.gloss);
                for shape in &sense.situations {
                    println!("      -> {}", shape.yellow());
                }
            }
        }

        Commands::Add {
            shape,
            lemma,
            gloss,
            fields,
        } => {
            let fields: Vec<_> = fields
                .iter()
                .map(|raw| parse_field(raw))
                .collect::<Result<_>>()?;
            ctl.load_shapes()?;
            let id = ctl.add_entry(&shape, &lemma, gloss.as_deref(), &fields)?;
            println!(
                "{} entry {} ({} under {})",
                "added".green().bold(),
                id.cyan(),
                lemma,
                shape.yellow()
            );
        }

        Commands::Infer => {
            let stats = ctl.run_inference()?;
            println!(
                "{} {} input, {} inferred, {} total triples",
                "inference complete:".green().bold(),
                stats.input_count,
                stats.inferred_count,
                stats.total_count
            );
        }

        Commands::Validate => {
            let report = ctl.run_validation()?;
            if report.conforms {
                println!("{}", "conforms".green().bold());
            } else {
                println!("{}", "does not conform".red().bold());
            }
            if !report.report_text.is_empty() {
                println!("{}", report.report_text);
            }
        }

        Commands::Save => {
            let count = ctl.save_remote()?;
            println!("{} {count} triples persisted", "saved".green().bold());
        }

        Commands::Stats => {
            let stats = ctl.service.stats()?;
            println!("shapes: {}", stats.shapes);
            println!("roles:  {}", stats.roles);
            println!("rules:  {}", stats.rules);
            println!("lemmas: {}", stats.lemmas);
            println!("senses: {}", stats.senses);
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
