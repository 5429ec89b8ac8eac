//! Command-line front end for the outline engine.
//!
//! # Responsibility
//! - Read outline text from a file or stdin and print parsed, normalized or
//!   rendered output.
//! - Keep output deterministic so it can be diffed in scripts.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use reforest_core::outline::line_editor::renumber_lines;
use reforest_core::outline::render::render_text;
use reforest_core::{default_log_level, init_logging, parse, parse_marked, serialize_marked};

#[derive(Debug, Parser)]
#[command(
    name = "reforest",
    about = "Outline tooling built on reforest_core",
    version
)]
struct Cli {
    /// Write rolling logs into this absolute directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    /// Log level used with --log-dir. Defaults by build mode.
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse outline text and print its node tree.
    Parse(ParseArgs),
    /// Print normalized marked text.
    Format(FormatArgs),
    /// Renumber numbered lines, leaving everything else untouched.
    Renumber(InputArgs),
    /// Print an indented preview with fold glyphs.
    Tree(InputArgs),
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Input file; reads stdin when omitted or `-`.
    input: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    source: InputArgs,
    /// Emit JSON instead of a debug representation.
    #[arg(long)]
    json: bool,
    /// Keep list markers as plain text instead of decoding them.
    #[arg(long)]
    structural: bool,
}

#[derive(Debug, Args)]
struct FormatArgs {
    #[command(flatten)]
    source: InputArgs,
    /// Overwrite the input file instead of printing to stdout.
    #[arg(long)]
    in_place: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy())
            .map_err(anyhow::Error::msg)
            .context("failed to initialize logging")?;
    }

    match cli.command {
        Commands::Parse(args) => handle_parse(args),
        Commands::Format(args) => handle_format(args),
        Commands::Renumber(args) => {
            let text = read_input(args.input.as_deref())?;
            println!("{}", renumber_lines(&text));
            Ok(())
        }
        Commands::Tree(args) => {
            let text = read_input(args.input.as_deref())?;
            println!("{}", render_text(parse_marked(&text).roots()));
            Ok(())
        }
    }
}

fn handle_parse(args: ParseArgs) -> Result<()> {
    let text = read_input(args.source.input.as_deref())?;
    let outline = if args.structural {
        parse(&text)
    } else {
        parse_marked(&text)
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&outline).context("failed to encode outline as JSON")?;
        println!("{json}");
    } else {
        println!("{outline:#?}");
    }
    Ok(())
}

fn handle_format(args: FormatArgs) -> Result<()> {
    let input = args.source.input.as_deref();
    let text = read_input(input)?;
    let formatted = serialize_marked(parse_marked(&text).roots());

    match input {
        Some(path) if args.in_place && !is_stdin(path) => fs::write(path, formatted)
            .with_context(|| format!("failed to write {}", path.display())),
        _ if args.in_place => anyhow::bail!("--in-place requires an input file"),
        _ => {
            println!("{formatted}");
            Ok(())
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if !is_stdin(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}
