use anyhow::{Context, Result};
use argtree::{Manifest, Matches, ParseOptions, Schema};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "argtree")]
#[command(version, about = "Parse command lines against a JSON schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse words against a schema and print what they bound to
    Parse(ParseArgs),

    /// Print the help model of a schema
    Model(ModelArgs),
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the schema description (JSON)
    #[arg(short, long, value_name = "FILE")]
    schema: PathBuf,

    /// Collect unrecognized tokens instead of failing
    #[arg(long)]
    allow_unmanaged: bool,

    /// Stop flag recognition at the first positional argument
    #[arg(long)]
    no_interspersed: bool,

    /// Do not expand @file words
    #[arg(long)]
    no_expand: bool,

    /// Use the process environment for flag and argument fallbacks
    #[arg(long)]
    env: bool,

    /// Words to parse
    #[arg(last = true, value_name = "WORDS")]
    words: Vec<String>,
}

#[derive(Parser)]
struct ModelArgs {
    /// Path to the schema description (JSON)
    #[arg(short, long, value_name = "FILE")]
    schema: PathBuf,
}

#[derive(Serialize)]
struct ParseReport {
    command: String,
    flags: IndexMap<String, String>,
    args: IndexMap<String, String>,
    unmanaged: Vec<String>,
}

impl ParseReport {
    fn new(schema: &Schema, matches: &Matches) -> Self {
        let flags = matches
            .flags()
            .iter()
            .map(|&id| {
                let name = schema.flag_decl(id).name().to_string();
                (name, schema.flag_value(id).render())
            })
            .collect();
        let args = matches
            .args()
            .iter()
            .map(|&id| {
                let name = schema.arg_decl(id).name().to_string();
                (name, schema.arg_value(id).render())
            })
            .collect();
        Self {
            command: matches.command(),
            flags,
            args,
            unmanaged: matches.unmanaged().to_vec(),
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse(args) => parse(args),
        Commands::Model(args) => model(args),
    }
}

fn parse(args: ParseArgs) -> Result<()> {
    let manifest = load_manifest(&args.schema)?;
    let mut schema = manifest
        .build()
        .with_context(|| format!("invalid schema `{}`", args.schema.display()))?;
    let options = parse_options(&manifest, &args);

    tracing::debug!(words = args.words.len(), "parsing");
    let matches = schema.parse_with(&args.words, &options)?;
    let report = ParseReport::new(&schema, &matches);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn model(args: ModelArgs) -> Result<()> {
    let manifest = load_manifest(&args.schema)?;
    let schema = manifest
        .build()
        .with_context(|| format!("invalid schema `{}`", args.schema.display()))?;
    let model = schema.model()?;
    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}

/// Options from the schema file, overridden by the command line switches.
fn parse_options(manifest: &Manifest, args: &ParseArgs) -> ParseOptions {
    let mut options = manifest.parse_options();
    if args.allow_unmanaged {
        options = options.allow_unmanaged(true);
    }
    if args.no_interspersed {
        options = options.interspersed(false);
    }
    if args.no_expand {
        options = options.expand_files(false);
    }
    if args.env {
        options = options.with_process_env();
    }
    options
}

fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read schema `{}`", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse schema `{}`", path.display()))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
