//! Schema Typegen CLI
//!
//! Generates type declarations from a JSON Schema document, exports its
//! dependency graph, and shows or saves the effective configuration.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use schema_typegen::{compile, loader, Emitter, SchemaNode, Severity, Target, TypegenConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-typegen")]
#[command(about = "Generate static type declarations from JSON Schema")]
#[command(version)]
struct Cli {
    /// Config file layered over the default locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a schema and render declarations
    Generate {
        /// Schema document ("-" for stdin)
        schema: PathBuf,

        /// Output file (defaults to config `output.path`, then stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output language (defaults to config `emit.target`)
        #[arg(short, long, value_enum)]
        target: Option<Target>,

        /// Omit the generated-file banner
        #[arg(long)]
        no_header: bool,
    },

    /// Export the dependency graph as GraphViz DOT
    Graph {
        /// Schema document ("-" for stdin)
        schema: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config {
        /// Save it to this path instead
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = TypegenConfig::load_from(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Generate {
            schema,
            output,
            target,
            no_header,
        } => {
            let mut profile = config.profile_for(target.unwrap_or(config.emit.target));
            if no_header {
                profile.header = false;
            }

            let root = load(&schema)?;
            let compilation = compile(&root)
                .with_context(|| format!("compiling {}", schema.display()))?;

            for item in compilation.diagnostics() {
                if item.severity() == Severity::Info {
                    info!(code = %item.code, reference = %item.reference, "{}", item.message);
                }
            }

            let generated = Emitter::new(&compilation, &profile).render()?;
            let destination = output.or_else(|| config.output.path.clone());
            write_output(destination.as_deref(), &generated.code)?;

            if let Some(path) = destination {
                eprintln!(
                    "✅ Wrote {} {} types to {}",
                    generated.type_count,
                    profile.target,
                    path.display()
                );
            }
            Ok(())
        }

        Commands::Graph { schema, output } => {
            let root = load(&schema)?;
            let compilation = compile(&root)
                .with_context(|| format!("compiling {}", schema.display()))?;
            let graph = compilation.graph();
            write_output(output.as_deref(), &graph.to_dot())?;

            if let Some(path) = output {
                eprintln!(
                    "✅ Exported {} nodes, {} edges to {}",
                    graph.node_count(),
                    graph.edge_count(),
                    path.display()
                );
            }
            Ok(())
        }

        Commands::Config { write } => {
            match write {
                Some(path) => {
                    config
                        .save(&path)
                        .with_context(|| format!("writing {}", path.display()))?;
                    eprintln!("✅ Saved configuration to {}", path.display());
                }
                None => print!("{}", config.to_toml()?),
            }
            Ok(())
        }
    }
}

fn load(schema: &Path) -> anyhow::Result<SchemaNode> {
    let root = if schema == Path::new("-") {
        loader::load_from_reader(std::io::stdin().lock())
    } else {
        loader::load_from_path(schema)
    };
    root.with_context(|| format!("loading {}", schema.display()))
}

fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
