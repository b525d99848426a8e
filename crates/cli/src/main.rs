use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use indexmap::IndexMap;
use marquee::describe::{DescribeOptions, describe};
use marquee::{
    ArgvInput, Command, CommandManifest, CommandSpec, Input, Output, OutputFormatter,
    StreamOutput, StyleSheet, Value, WriteOptions,
};
use serde::Serialize;
use std::{
    fs,
    io::{self, IsTerminal, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(version, about = "Render console markup and inspect command manifests", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render <style>markup</style> to the terminal
    Render(RenderArgs),

    /// Parse argv tokens against a command manifest and print the bound values as JSON
    Parse(ParseArgs),

    /// Print the synopsis of a command manifest
    Synopsis(SynopsisArgs),

    /// Print the help text of a command manifest
    Describe(DescribeArgs),
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum ColorChoice {
    /// Decorate when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn decorated(self) -> Option<bool> {
        match self {
            Self::Auto => None,
            Self::Always => Some(true),
            Self::Never => Some(false),
        }
    }
}

#[derive(Parser)]
struct RenderArgs {
    /// Markup to render (default: read --file or stdin)
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Read markup from a file
    #[arg(short, long, value_name = "FILE", conflicts_with = "text")]
    file: Option<PathBuf>,

    /// JSON style sheet with extra named styles
    #[arg(short, long, value_name = "FILE")]
    styles: Option<PathBuf>,

    /// When to emit ANSI sequences
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Strip tags that are not registered styles
    #[arg(long)]
    plain: bool,
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the command manifest (JSON)
    #[arg(short, long, value_name = "FILE")]
    manifest: PathBuf,

    /// Only print values present in the tokens, without defaults
    #[arg(long)]
    raw: bool,

    /// Tokens to parse, after `--`
    #[arg(last = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

#[derive(Parser)]
struct SynopsisArgs {
    /// Path to the command manifest (JSON)
    #[arg(short, long, value_name = "FILE")]
    manifest: PathBuf,

    /// Collapse options into `[options]`
    #[arg(long)]
    short: bool,
}

#[derive(Parser)]
struct DescribeArgs {
    /// Path to the command manifest (JSON)
    #[arg(short, long, value_name = "FILE")]
    manifest: PathBuf,

    /// JSON style sheet with extra named styles
    #[arg(short, long, value_name = "FILE")]
    styles: Option<PathBuf>,

    /// When to emit ANSI sequences
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render(args) => render(args),
        Commands::Parse(args) => parse(args),
        Commands::Synopsis(args) => synopsis(args),
        Commands::Describe(args) => describe_command(args),
    };

    match result {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn render(args: RenderArgs) -> Result<i32> {
    let (markup, newline) = match (args.text, &args.file) {
        (Some(text), _) => (text, true),
        (None, Some(path)) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            (text, false)
        }
        (None, None) => {
            let mut stdin = io::stdin();
            if stdin.is_terminal() {
                bail!("no markup given; pass TEXT, --file or pipe it on stdin");
            }
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            (text, false)
        }
    };

    let mut output = stdout_output(args.styles.as_deref(), args.color)?;
    let options = if args.plain {
        WriteOptions::plain()
    } else {
        WriteOptions::default()
    };
    output.write_with(&markup, newline, options)?;
    Ok(0)
}

fn parse(args: ParseArgs) -> Result<i32> {
    let spec = load_spec(&args.manifest)?;
    tracing::debug!(command = spec.name(), tokens = args.tokens.len(), "parsing tokens");

    let mut input = ArgvInput::new(args.tokens);
    input.set_interactive(false);
    let mut output = StreamOutput::stdout();
    let mut command = BindingReport {
        spec,
        raw: args.raw,
    };
    Ok(command.run(&mut input, &mut output)?)
}

fn synopsis(args: SynopsisArgs) -> Result<i32> {
    let spec = load_spec(&args.manifest)?;
    let mut output = StreamOutput::stdout();
    output.write_with(&spec.synopsis(args.short), true, WriteOptions::raw())?;
    Ok(0)
}

fn describe_command(args: DescribeArgs) -> Result<i32> {
    let spec = load_spec(&args.manifest)?;
    let mut output = stdout_output(args.styles.as_deref(), args.color)?;
    describe(&mut output, &spec, DescribeOptions::default())?;
    Ok(0)
}

/// Prints what a manifest-declared command received.
struct BindingReport {
    spec: CommandSpec,
    raw: bool,
}

#[derive(Serialize)]
struct BoundValues {
    arguments: IndexMap<String, Value>,
    options: IndexMap<String, Value>,
}

impl Command for BindingReport {
    fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    fn execute(
        &mut self,
        input: &mut dyn Input,
        output: &mut dyn Output,
    ) -> marquee::Result<Option<i32>> {
        let bound = if self.raw {
            BoundValues {
                arguments: input.state().bound_arguments().clone(),
                options: input.state().bound_options().clone(),
            }
        } else {
            BoundValues {
                arguments: input.arguments(),
                options: input.options(),
            }
        };
        let json = serde_json::to_string_pretty(&bound)
            .map_err(|err| marquee::Error::failed(err.to_string()))?;
        output.write_with(&json, true, WriteOptions::raw())?;
        Ok(None)
    }
}

fn load_spec(path: &Path) -> Result<CommandSpec> {
    let manifest = CommandManifest::from_file(path)?;
    manifest
        .to_spec()
        .with_context(|| format!("invalid command manifest {}", path.display()))
}

fn stdout_output(
    styles: Option<&Path>,
    color: ColorChoice,
) -> Result<StreamOutput<io::Stdout>> {
    let mut output = StreamOutput::stdout();
    if let Some(path) = styles {
        let sheet = StyleSheet::from_file(path)?;
        sheet.apply(output.formatter_mut())?;
    }
    if let Some(decorated) = color.decorated() {
        output.set_decorated(decorated);
    }
    Ok(output)
}

fn report_error(err: &anyhow::Error) {
    let message = format!("{err:#}");
    let mut stderr = StreamOutput::stderr();
    let line = format!("<error>{}</error>", OutputFormatter::escape(&message));
    if stderr.writeln(&line).is_err() {
        eprintln!("{message}");
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
