//! nestplan Command-Line Tool
//!
//! Compiles request files into nested plans and validates schema files.

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod error;
mod formatter;
mod input;

use clap::{Parser, Subcommand};
use error::CliError;
use formatter::OutputFormat;
use nestplan_core::{CompilerConfig, PlanCompiler, DEFAULT_LIMIT, DEFAULT_MAX_DEPTH};
use std::path::PathBuf;
use tracing::{debug, info};

/// nestplan Command-Line Tool
#[derive(Parser, Debug)]
#[command(name = "nestplan")]
#[command(version, about = "Compile selection trees into nested include plans")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a request file into a plan
    Plan(PlanArgs),
    /// Validate a schema file
    Check(CheckArgs),
}

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Schema file (JSON)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Request file (JSON)
    #[arg(short, long)]
    pub request: PathBuf,

    /// Root entity, overriding the request file
    #[arg(short, long)]
    pub entity: Option<String>,

    /// Root row limit when the request gives none (0 = unlimited)
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub default_limit: u32,

    /// Maximum include depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Reject order and filter columns the schema does not declare
    #[arg(long)]
    pub strict_columns: bool,

    /// Output format
    #[arg(long, default_value = "tree", value_enum)]
    pub format: OutputFormat,
}

impl PlanArgs {
    /// Build the compiler configuration from the flags.
    pub fn compiler_config(&self) -> CompilerConfig {
        CompilerConfig::new()
            .with_default_limit(self.default_limit)
            .with_max_depth(self.max_depth)
            .with_strict_columns(self.strict_columns)
    }
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Schema file (JSON)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Output format
    #[arg(long, default_value = "tree", value_enum)]
    pub format: OutputFormat,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nestplan_cli=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<String, CliError> {
    match args.command {
        Command::Plan(args) => run_plan(&args),
        Command::Check(args) => run_check(&args),
    }
}

/// Compile a request file and format the plan.
fn run_plan(args: &PlanArgs) -> Result<String, CliError> {
    let config = args.compiler_config();
    let schema = input::load_schema(&args.schema)?;
    schema.validate()?;
    let request = input::load_request(&args.request)?;

    let entity = args
        .entity
        .as_deref()
        .or(request.entity.as_deref())
        .ok_or(CliError::MissingEntity)?;
    debug!(
        entity,
        default_limit = config.default_limit,
        max_depth = config.max_depth,
        strict_columns = config.strict_columns,
        "Compiling request"
    );

    let plan = PlanCompiler::new(&schema)
        .with_config(config)
        .compile(&request.args, &request.context, entity)?;
    info!(
        entity,
        nodes = plan.walk().count(),
        depth = plan.depth(),
        "Plan compiled"
    );

    Ok(formatter::create_formatter(args.format).format_plan(&plan))
}

/// Validate a schema file and summarize it.
fn run_check(args: &CheckArgs) -> Result<String, CliError> {
    let schema = input::load_schema(&args.schema)?;
    schema.validate()?;
    info!(
        version = schema.version,
        entities = schema.entities.len(),
        relations = schema.relations.len(),
        "Schema is valid"
    );

    Ok(formatter::create_formatter(args.format).format_schema(&schema))
}
