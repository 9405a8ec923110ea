//! SciGraph Code Generator
//!
//! Generates strongly-typed Rust client code from SciGraph API documents.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use scigraph_gen::codegen::DEFAULT_RUNTIME_CRATE;
use scigraph_gen::errors::GeneratorError;
use scigraph_gen::manifest::{RuntimeSource, write_manifest};
use scigraph_gen::output::write_all;
use scigraph_gen::source::SpecSource;
use scigraph_gen::types::TypeMapper;
use scigraph_gen::{GenerateOptions, generate, parser};
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// SciGraph code generator - transforms API documents into typed Rust clients
#[derive(Parser, Debug)]
#[command(name = "scigraph-codegen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate client sources from a document
    Generate {
        /// Document location: a file path or an http(s) URL
        #[arg(short, long, env = "SCIGRAPH_SPEC")]
        spec: String,

        /// Output directory for generated sources
        #[arg(short, long)]
        out: PathBuf,

        /// Name of the top-level client struct [default: <Title>Client]
        #[arg(long)]
        client_name: Option<String>,

        /// Path of the runtime crate as seen from generated code
        #[arg(long, default_value = DEFAULT_RUNTIME_CRATE)]
        runtime_crate: String,

        /// Also write a Cargo.toml into the parent of the output directory
        #[arg(long)]
        manifest: bool,

        /// Depend on a local runtime checkout in the generated Cargo.toml
        #[arg(long, requires = "manifest")]
        runtime_path: Option<String>,

        /// Print generated code without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the parsed model of a document
    Inspect {
        /// Document location: a file path or an http(s) URL
        #[arg(short, long, env = "SCIGRAPH_SPEC")]
        spec: String,

        /// Print the model as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let kind = e.kind();
            eprintln!("{} {}", format!("error[{}]:", kind.label()).red().bold(), e);
            ExitCode::from(kind.exit_code())
        }
    }
}

fn run(command: Commands) -> Result<(), GeneratorError> {
    match command {
        Commands::Generate {
            spec,
            out,
            client_name,
            runtime_crate,
            manifest,
            runtime_path,
            dry_run,
        } => {
            let source = SpecSource::parse(&spec);
            let document = source.load()?;
            let options = GenerateOptions {
                client_name,
                runtime_crate,
            };
            let generated = generate(&document, &options)?;

            if dry_run {
                for unit in &generated.units {
                    println!("=== {} ===\n{}\n", unit.file_name, unit.contents);
                }
                return Ok(());
            }

            let written = write_all(&generated.units, &out)?;
            info!(files = written.len(), out = %out.display(), "generated client");

            if manifest {
                let model = parser::parse(&document)?;
                let runtime = runtime_path.map_or_else(RuntimeSource::default, RuntimeSource::Path);
                let path = write_manifest(&model, &runtime, &out)?;
                info!(path = %path.display(), "wrote manifest");
            }

            eprintln!(
                "{} {} files to {}",
                "Generated".green().bold(),
                written.len(),
                out.display()
            );
            Ok(())
        }
        Commands::Inspect { spec, json } => {
            let document = SpecSource::parse(&spec).load()?;
            let model = parser::parse(&document)?;

            if json {
                let rendered = serde_json::to_string_pretty(&model)
                    .map_err(|e| GeneratorError::CodeGen(format!("cannot render model: {e}")))?;
                println!("{rendered}");
                return Ok(());
            }

            let types = TypeMapper::build(&model);
            println!("{} ({})", model.title.bold(), model.api_version.as_deref().unwrap_or("unversioned"));
            if let Some(base_url) = &model.base_url {
                println!("base URL: {base_url}");
            }
            for resource in model.resources_sorted() {
                println!("\n{} {}", resource.ident.cyan().bold(), resource.name.dimmed());
                for operation in &resource.operations {
                    let args: Vec<String> = operation
                        .required_parameters()
                        .map(|p| format!("{}: {}", p.ident, types.map(&p.ty).display()))
                        .collect();
                    let optional = operation.optional_parameters().count();
                    let returns = types.map_payload(operation.response.ty.as_ref()).display();
                    println!(
                        "  {:<7} {:<40} {}({}){} -> {}",
                        operation.method.to_string(),
                        operation.path,
                        operation.ident,
                        args.join(", "),
                        if optional > 0 {
                            format!(" +{optional} optional")
                        } else {
                            String::new()
                        },
                        returns
                    );
                }
            }
            println!("\n{}", "types".cyan().bold());
            for decl in types.declarations() {
                println!("  {}", decl.name);
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            // -v: Show INFO for progress
            1 => "warn,scigraph_gen=info".to_string(),
            // -vv: Show DEBUG for parse and emit details
            2 => "info,scigraph_gen=debug".to_string(),
            // -vvv+: Show TRACE for everything
            _ => "debug,scigraph_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(verbose >= 4)
                .with_line_number(verbose >= 4)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
