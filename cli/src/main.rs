use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use chat_command_core::{CommandRegistry, describe_registry, validate_registry};
use chat_command_db::{
    BotConfig, LoadedRegistry, RegistrySource, build_package, load_directory_snapshot,
    write_document,
};
use chat_command_parser::{
    ArgumentMap, CommandContext, Dispatcher, EntityDirectory, GuildDirectory, Outcome, Responder,
    check_structured, lookup, structured_definition,
};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde_json::json;
use tracing::{debug, info};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for parsed arguments.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "chat-command")]
#[command(about = "Parse, validate and bundle chat command schemas")]
struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse one command line (without prefix) and print its arguments.
    Parse(ParseArgs),
    /// Parse every line of a file in parallel, one JSON result per line.
    Replay(ReplayArgs),
    /// Validate registry directories and bundle files.
    Validate(ValidateArgs),
    /// Bundle registry sources into a single SchemaPackage file.
    Bundle(BundleArgs),
    /// Print the help listing of a registry.
    Describe(RegistryArgs),
    /// Print structured-command definitions as JSON.
    ExportStructured(RegistryArgs),
    /// Feed messages from stdin through a dispatcher driven by a bot config.
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
struct RegistryArgs {
    /// Schema directory or bundle file; defaults to the built-in command set.
    #[arg(long)]
    registry: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    registry: RegistryArgs,
    /// Guild directory snapshot for role and channel names.
    #[arg(long)]
    directory: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// The command line, e.g. `tag welcome -u 123`.
    line: String,
}

#[derive(Debug, Args)]
struct ReplayArgs {
    #[command(flatten)]
    registry: RegistryArgs,
    /// Guild directory snapshot for role and channel names.
    #[arg(long)]
    directory: Option<PathBuf>,
    /// File with one command line per line.
    input: PathBuf,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema directories and/or bundle files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Also check names and descriptions against structured-command rules.
    #[arg(long)]
    structured: bool,
}

#[derive(Debug, Args)]
struct BundleArgs {
    /// Schema directories and/or bundle files, concatenated in order.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output bundle path (`.json`, `.yaml` or `.yml`).
    #[arg(long)]
    output: PathBuf,
    /// Optional bundle name metadata.
    #[arg(long)]
    name: Option<String>,
    /// Optional bundle description metadata.
    #[arg(long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    /// Bot config YAML file.
    #[arg(long)]
    config: PathBuf,
    /// Invoking user id.
    #[arg(long, default_value = "0")]
    user: String,
    /// Channel id.
    #[arg(long, default_value = "0")]
    channel: String,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Replay(args) => run_replay(args),
        Command::Validate(args) => run_validate(args),
        Command::Bundle(args) => run_bundle(args),
        Command::Describe(args) => run_describe(args),
        Command::ExportStructured(args) => run_export_structured(args),
        Command::Simulate(args) => run_simulate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.parse().unwrap_or_default()),
        )
        .init();
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let registry = load_registry(args.registry.registry.as_deref())?;
    let directory = load_directory(args.directory.as_deref())?;

    let Some(invocation) = lookup(&registry, &args.line) else {
        println!("not a command");
        return Ok(());
    };
    let parsed = invocation
        .parse(directory.as_ref().map(|d| d as &dyn EntityDirectory))
        .map_err(|err| err.to_string())?;

    let rendered = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&parsed)
            .map_err(|err| format!("Failed to serialize arguments: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(&parsed)
            .map_err(|err| format!("Failed to serialize arguments: {err}"))?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn run_replay(args: ReplayArgs) -> Result<(), String> {
    let registry = load_registry(args.registry.registry.as_deref())?;
    let directory = load_directory(args.directory.as_deref())?;
    let input = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;

    let lines: Vec<&str> = input.lines().collect();
    let results: Vec<serde_json::Value> = lines
        .par_iter()
        .map(|line| replay_line(&registry, directory.as_ref(), line))
        .collect();

    for result in &results {
        println!("{result}");
    }
    info!(lines = results.len(), "Replayed input");
    Ok(())
}

fn replay_line(
    registry: &CommandRegistry,
    directory: Option<&GuildDirectory>,
    line: &str,
) -> serde_json::Value {
    let Some(invocation) = lookup(registry, line) else {
        return json!({ "line": line, "command": null });
    };
    match invocation.parse(directory.map(|d| d as &dyn EntityDirectory)) {
        Ok(parsed) => json!({
            "line": line,
            "command": invocation.command.name,
            "args": parsed,
        }),
        Err(err) => json!({
            "line": line,
            "command": invocation.command.name,
            "error": err.to_string(),
        }),
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut total = 0;
    for input in &args.inputs {
        let registry = load_registry(Some(input.as_path()))?;
        if args.structured {
            for schema in &registry {
                check_structured(schema)
                    .map_err(|err| format!("{}: command '{}': {err}", input.display(), schema.name))?;
            }
        }
        total += registry.len();
    }
    println!(
        "Validated {} source(s) with {} command(s).",
        args.inputs.len(),
        total
    );
    Ok(())
}

fn run_bundle(args: BundleArgs) -> Result<(), String> {
    let mut commands = Vec::new();
    for input in &args.inputs {
        commands.extend(load_registry(Some(input.as_path()))?.into_commands());
    }
    let registry = CommandRegistry::new(commands);
    if let Some(err) = validate_registry(&registry).into_iter().next() {
        return Err(format!("Combined registry is invalid: {err}"));
    }

    let generated_at = chrono::Utc::now().to_rfc3339();
    let mut package =
        build_package(&registry, PACKAGE_VERSION, &generated_at).map_err(|e| e.to_string())?;
    package.name = args.name;
    package.description = args.description;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }

    write_document(&args.output, &package)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;

    println!(
        "Bundled {} schema(s) into '{}'.",
        package.schema_count(),
        args.output.display()
    );
    Ok(())
}

fn run_describe(args: RegistryArgs) -> Result<(), String> {
    let registry = load_registry(args.registry.as_deref())?;
    println!("{}", describe_registry(&registry));
    Ok(())
}

fn run_export_structured(args: RegistryArgs) -> Result<(), String> {
    let registry = load_registry(args.registry.as_deref())?;
    let definitions: Vec<_> = registry.iter().map(structured_definition).collect();
    let raw = serde_json::to_string_pretty(&definitions)
        .map_err(|err| format!("Failed to serialize definitions: {err}"))?;
    println!("{raw}");
    Ok(())
}

/// Replies go to stdout, one line per reply.
struct StdoutResponder;

impl Responder for StdoutResponder {
    fn reply(&self, content: &str) -> anyhow::Result<()> {
        println!("{content}");
        Ok(())
    }
}

fn echo_arguments(ctx: &CommandContext<'_>, args: &ArgumentMap) -> anyhow::Result<()> {
    ctx.reply(&serde_json::to_string(args)?)
}

fn run_simulate(args: SimulateArgs) -> Result<(), String> {
    let config = BotConfig::load(&args.config).map_err(|e| e.to_string())?;
    let registry = config
        .loader()
        .with_bundled()
        .build()
        .map_err(|e| e.to_string())?
        .into_registry();
    let directory = config.load_directory().map_err(|e| e.to_string())?;

    let dispatcher = registry
        .into_commands()
        .into_iter()
        .fold(
            Dispatcher::builder().config(config.dispatch_config()),
            |builder, schema| builder.command(schema, echo_arguments),
        )
        .build()
        .map_err(|e| e.to_string())?;

    let responder = StdoutResponder;
    let mut ctx = CommandContext::new(&args.user, &args.channel, &responder);
    if let Some(directory) = &directory {
        ctx = ctx.in_guild("0", directory);
    }

    for line in std::io::stdin().lock().lines() {
        let line = line.map_err(|err| format!("Failed to read stdin: {err}"))?;
        let outcome = dispatcher.handle_message(&ctx, &line);
        if outcome == Outcome::Ignored {
            debug!(line = %line, "Ignored message");
        }
    }
    Ok(())
}

fn load_registry(path: Option<&Path>) -> Result<CommandRegistry, String> {
    let Some(path) = path else {
        return LoadedRegistry::bundled()
            .map(LoadedRegistry::into_registry)
            .map_err(|err| format!("built-in commands: {err}"));
    };
    LoadedRegistry::from_source(&RegistrySource::from_path(path))
        .map(LoadedRegistry::into_registry)
        .map_err(|err| format!("'{}': {err}", path.display()))
}

fn load_directory(path: Option<&Path>) -> Result<Option<GuildDirectory>, String> {
    path.map(|path| {
        load_directory_snapshot(path).map_err(|err| format!("'{}': {err}", path.display()))
    })
    .transpose()
}
