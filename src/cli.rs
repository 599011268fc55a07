use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::HeadingLevels;

#[derive(Parser, Debug)]
#[command(
    name = "navygator",
    version,
    about = "Table-of-contents extraction and heading anchor tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Outline(OutlineArgs),
    Inject(InjectArgs),
    Render(RenderArgs),
    Scan(ScanArgs),
}

/// Where the content comes from. Either or both may be given.
#[derive(Args, Debug, Clone)]
pub struct ContentArgs {
    /// Rendered markup to scan for heading elements.
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Structured block tree (JSON) to scan for heading blocks.
    #[arg(long)]
    pub blocks: Option<PathBuf>,

    #[arg(long, default_value = "2,3,4", value_parser = parse_levels)]
    pub levels: HeadingLevels,

    /// Seed for the fallback id generator; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub content: ContentArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutlineFormat {
    Html,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct OutlineArgs {
    #[command(flatten)]
    pub content: ContentArgs,

    #[arg(long, default_value_t = false)]
    pub numbered: bool,

    #[arg(long, value_enum, default_value_t = OutlineFormat::Html)]
    pub format: OutlineFormat,
}

#[derive(Args, Debug, Clone)]
pub struct InjectArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub content: ContentArgs,

    #[arg(long, default_value_t = false)]
    pub numbered: bool,

    #[arg(long, default_value = "Table of Contents")]
    pub title: String,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    #[arg(long, default_value = "content")]
    pub content_root: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value = "2,3,4", value_parser = parse_levels)]
    pub levels: HeadingLevels,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

fn parse_levels(raw: &str) -> Result<HeadingLevels, String> {
    HeadingLevels::parse(raw).map_err(|err| err.to_string())
}
