//! `rdftree`: render RDF result graphs as canonical trees.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rdftree_core::{
    classify, ExpansionPolicy, GeneratorConfig, Graph, ResultVocabulary, TreeGenerator,
};
use rdftree_ingest_rdf::{load_graph, load_graph_file, RdfFormat};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rdftree")]
#[command(author, version, about = "Canonical trees from RDF result graphs")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). `RUST_LOG` wins.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the canonical tree and print it as JSON.
    Tree {
        /// Input RDF file (.nt, .ttl, .nq, .trig, .rdf/.owl/.xml)
        input: PathBuf,
        /// Output JSON file (defaults to stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
        #[command(flatten)]
        load: LoadArgs,
        #[command(flatten)]
        generator: GeneratorArgs,
    },

    /// Report the result shape and roots without building a tree.
    Classify {
        input: PathBuf,
        #[command(flatten)]
        load: LoadArgs,
        /// Result vocabulary prefix
        #[arg(long)]
        prefix: Option<String>,
    },
}

#[derive(Args)]
struct LoadArgs {
    /// Input format, overriding the file extension (nt, ttl, nq, trig, rdf)
    #[arg(long)]
    format: Option<String>,
}

#[derive(Args)]
struct GeneratorArgs {
    /// JSON generator configuration; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Result vocabulary prefix
    #[arg(long)]
    prefix: Option<String>,
    /// Prioritised predicate namespace (repeatable, in priority order)
    #[arg(long = "namespace")]
    namespaces: Vec<String>,
    /// Predicate display name, as PREDICATE=NAME (repeatable)
    #[arg(long = "name", value_parser = parse_name_override)]
    names: Vec<(String, String)>,
    /// Expand each resource at most once per root instead of once per lineage
    #[arg(long)]
    global: bool,
}

fn parse_name_override(s: &str) -> std::result::Result<(String, String), String> {
    match s.rsplit_once('=') {
        Some((predicate, name)) if !predicate.is_empty() && !name.is_empty() => {
            Ok((predicate.to_string(), name.to_string()))
        }
        _ => Err(format!("expected PREDICATE=NAME, got `{s}`")),
    }
}

impl GeneratorArgs {
    fn into_config(self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str::<GeneratorConfig>(&text)
                    .with_context(|| format!("invalid generator config {}", path.display()))?
            }
            None => GeneratorConfig::default(),
        };
        if let Some(prefix) = self.prefix {
            config = config.with_result_prefix(prefix);
        }
        if !self.namespaces.is_empty() {
            config = config.with_prioritised_namespaces(self.namespaces);
        }
        for (predicate, name) in self.names {
            config = config.with_name_override(predicate, name);
        }
        if self.global {
            config = config.with_expansion(ExpansionPolicy::Global);
        }
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(input: &Path, args: &LoadArgs) -> Result<Graph> {
    match &args.format {
        Some(format) => {
            let format: RdfFormat = format.parse()?;
            let bytes = std::fs::read(input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            load_graph(&bytes, format)
                .with_context(|| format!("failed to load {}", input.display()))
        }
        None => load_graph_file(input),
    }
}

fn cmd_tree(
    input: &Path,
    out: Option<&Path>,
    compact: bool,
    load_args: &LoadArgs,
    config: GeneratorConfig,
) -> Result<()> {
    let graph = load(input, load_args)?;
    let generator = TreeGenerator::new(config);
    let tree = generator
        .generate(&graph)
        .with_context(|| format!("failed to build a tree from {}", input.display()))?;
    let view = tree.to_view(generator.name_resolver());
    let json = if compact {
        serde_json::to_string(&view)?
    } else {
        serde_json::to_string_pretty(&view)?
    };

    match out {
        Some(out) => {
            std::fs::write(out, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", out.display()))?;
            eprintln!(
                "{} {} ({} nodes)",
                "wrote".green().bold(),
                out.display().to_string().bold(),
                tree.len()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_classify(input: &Path, load_args: &LoadArgs, prefix: Option<String>) -> Result<()> {
    let graph = load(input, load_args)?;
    let vocab = prefix.map_or_else(ResultVocabulary::default, ResultVocabulary::new);
    let classification = classify(&graph, &vocab)
        .with_context(|| format!("failed to classify {}", input.display()))?;

    println!("{} {}", "shape".bold(), classification.shape);
    for root in &classification.roots {
        println!("{} {}", "root".bold(), root);
    }
    if let Some(predicate) = &classification.ordering_predicate {
        println!("{} {} ({:?})", "order by".bold(), predicate, classification.direction);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Tree {
            input,
            out,
            compact,
            load,
            generator,
        } => {
            let config = generator.into_config()?;
            cmd_tree(&input, out.as_deref(), compact, &load, config)?;
        }
        Commands::Classify {
            input,
            load,
            prefix,
        } => {
            cmd_classify(&input, &load, prefix)?;
        }
    }
    Ok(())
}
