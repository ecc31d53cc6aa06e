mod config;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use warelay_logging::{init_logger, redact_preview};
use warelay_markdown::{
    Channel, HeadingStyle, MarkdownIr, MarkdownParseOptions, chunk_markdown_ir, format_ir,
    markdown_to_ir,
};

use config::{Config, load_parse_options};

#[derive(Parser)]
#[command(name = "warelay-md")]
#[command(about = "Compile Markdown into channel-ready styled text")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the compiled IR as JSON
    Compile {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print the chunked IRs as JSON
    Chunk {
        #[command(flatten)]
        input: InputArgs,
        /// Maximum characters per chunk, 0 for unlimited
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print each chunk formatted for a channel
    Format {
        #[command(flatten)]
        input: InputArgs,
        /// Target channel (whatsapp, plain)
        #[arg(short, long, default_value = "whatsapp")]
        channel: Channel,
        /// Maximum characters per chunk, 0 for unlimited
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Markdown file to read; stdin when omitted
    file: Option<PathBuf>,
    /// YAML or JSON file with parse options
    #[arg(long)]
    options: Option<PathBuf>,
    /// Turn `||text||` into spoilers
    #[arg(long)]
    spoilers: bool,
    /// Heading rendering (none, bold)
    #[arg(long)]
    heading_style: Option<HeadingStyle>,
    /// Text inserted at the start of each blockquote
    #[arg(long)]
    blockquote_prefix: Option<String>,
    /// Leave bare URLs unlinked
    #[arg(long)]
    no_linkify: bool,
    /// Keep `<url>` autolinks as literal text
    #[arg(long)]
    no_autolink: bool,
}

impl InputArgs {
    fn parse_options(&self) -> Result<MarkdownParseOptions> {
        let mut options = match &self.options {
            Some(path) => load_parse_options(path)?,
            None => MarkdownParseOptions::default(),
        };
        if self.spoilers {
            options.enable_spoilers = true;
        }
        if let Some(style) = self.heading_style {
            options.heading_style = style;
        }
        if let Some(prefix) = &self.blockquote_prefix {
            options.blockquote_prefix = prefix.clone();
        }
        if self.no_linkify {
            options.linkify = false;
        }
        if self.no_autolink {
            options.autolink = false;
        }
        Ok(options)
    }

    fn compile(&self) -> Result<MarkdownIr> {
        let markdown = read_input(self.file.as_deref())?;
        let options = self.parse_options()?;
        debug!(preview = %redact_preview(&markdown, 80), "compiling input");
        Ok(markdown_to_ir(&markdown, &options))
    }
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    let config = Config::from_env();
    init_logger(&config.log_level, config.log_dir.as_deref());

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile { input } => {
            let ir = input.compile()?;
            println!("{}", serde_json::to_string_pretty(&ir)?);
        }
        Commands::Chunk { input, limit } => {
            let ir = input.compile()?;
            let limit = limit.unwrap_or(config.chunk_limit);
            let chunks = chunk_markdown_ir(&ir, limit);
            info!(limit, chunks = chunks.len(), "chunked input");
            println!("{}", serde_json::to_string_pretty(&chunks)?);
        }
        Commands::Format {
            input,
            channel,
            limit,
        } => {
            let ir = input.compile()?;
            let limit = limit.unwrap_or(config.chunk_limit);
            let chunks = chunk_markdown_ir(&ir, limit);
            info!(%channel, limit, chunks = chunks.len(), "formatting input");
            let rendered: Vec<String> = chunks
                .iter()
                .map(|chunk| format_ir(chunk, channel))
                .collect();
            println!("{}", rendered.join("\n\n"));
        }
    }

    Ok(())
}
