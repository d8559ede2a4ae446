// retext/src/cli.rs
//! This file defines the command-line interface (CLI) for the retext application,
//! including all available commands and their arguments.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use retext_core::{Context, SinkKind};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "retext",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Apply find/replace rules to rendered text and markup",
    long_about = "ReText applies an ordered list of find/replace rules to text and HTML fragments. Literal rules only match whole words, URL-like plain text is left alone, and markup is rewritten one text node at a time so tags, attributes, scripts and styles are never touched.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Path to the rule configuration file (YAML).
    #[arg(
        long = "config",
        short = 'c',
        value_name = "FILE",
        env = "RETEXT_CONFIG",
        global = true,
        help = "Path to the rule configuration file (YAML)."
    )]
    pub config: Option<PathBuf>,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `retext` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Applies the active rules to a file or stdin.
    #[command(about = "Applies the active rules to a file or stdin.")]
    Apply(ApplyCommand),

    /// Compiles every rule and reports which ones would be dropped.
    #[command(about = "Compiles every rule and reports which ones would be dropped.")]
    Check(CheckCommand),

    /// Prints the browser-side rule payload for a context.
    #[command(about = "Prints the browser-side rule payload for a context.")]
    Payload(PayloadCommand),

    /// Runs the browser-side applier's initial pass over a full HTML document.
    #[command(about = "Runs the browser-side applier's initial pass over a full HTML document.")]
    Client(ClientCommand),

    /// Lists the known extension points and how each one is rewritten.
    #[command(about = "Lists the known extension points and how each one is rewritten.")]
    Points(PointsCommand),
}

/// Arguments for the `apply` command.
#[derive(Parser, Debug)]
pub struct ApplyCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input: Option<PathBuf>,

    /// Write the result to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "frontend", help = "Rendering context whose rules apply.")]
    pub context: ContextArg,

    #[arg(long, value_enum, default_value = "auto", help = "Treat the input as plain text, HTML, or detect it.")]
    pub sink: SinkArg,

    /// Route the input through a named extension point instead of `--sink`.
    #[arg(long, value_name = "IDENTIFIER", conflicts_with = "sink", help = "Rewrite the input as the named extension point would (e.g. 'the_title').")]
    pub field: Option<String>,

    /// Show a unified diff to highlight the changes made.
    #[arg(long, short = 'D', help = "Show a unified diff to highlight the changes made.")]
    pub diff: bool,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// Exit with a non-zero code if any rule fails to compile.
    #[arg(long, help = "Exit with a non-zero code if any rule fails to compile.")]
    pub strict: bool,
}

/// Arguments for the `payload` command.
#[derive(Parser, Debug)]
pub struct PayloadCommand {
    #[arg(long, value_enum, default_value = "frontend", help = "Rendering context whose rules are exported.")]
    pub context: ContextArg,

    /// Wrap the JSON in a `<script>` element assigning it to VAR.
    #[arg(
        long = "inline-script",
        value_name = "VAR",
        num_args = 0..=1,
        default_missing_value = "retextData",
        help = "Wrap the payload in a <script> element assigning it to VAR (default: retextData)."
    )]
    pub inline_script: Option<String>,
}

/// Arguments for the `client` command.
#[derive(Parser, Debug)]
pub struct ClientCommand {
    /// Path to an HTML document (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read the document from a specified file instead of stdin.")]
    pub input: Option<PathBuf>,

    /// Write the resulting document to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "frontend", help = "Rendering context whose rules are exported to the page.")]
    pub context: ContextArg,

    /// Use a previously exported payload instead of the configuration.
    #[arg(long, value_name = "FILE", help = "Read the client payload JSON from a file instead of building it from the configuration.")]
    pub payload: Option<PathBuf>,
}

/// Arguments for the `points` command.
#[derive(Parser, Debug)]
pub struct PointsCommand {
    /// Print the table as JSON.
    #[arg(long, help = "Print the extension-point table as JSON.")]
    pub json: bool,
}

/// Rendering context selector.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ContextArg {
    /// Public-facing pages.
    Frontend,
    /// The administration interface.
    Admin,
}

impl From<ContextArg> for Context {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::Frontend => Context::Frontend,
            ContextArg::Admin => Context::Admin,
        }
    }
}

/// How the input of `apply` is treated.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SinkArg {
    /// Plain text; URL-like input is left alone.
    Plain,
    /// An HTML fragment; only text nodes change.
    Html,
    /// HTML if the input contains tags, plain text otherwise.
    Auto,
}

impl From<SinkArg> for SinkKind {
    fn from(arg: SinkArg) -> Self {
        match arg {
            SinkArg::Plain => SinkKind::PlainText,
            SinkArg::Html => SinkKind::Html,
            SinkArg::Auto => SinkKind::Detect,
        }
    }
}
