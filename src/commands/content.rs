use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::ContentArgs;
use crate::model::{BlockDocument, BlockNode, ContentSource, HeadingRecord};
use crate::toc::{AnchorRegistry, extract_headings};
use crate::util::read_text;

/// Content loaded from the command line together with the id pass that
/// extracted its headings.
pub struct ExtractedContent {
    pub source: ContentSource,
    pub anchors: AnchorRegistry,
    pub headings: Vec<HeadingRecord>,
}

pub fn load_content(args: &ContentArgs) -> Result<ContentSource> {
    let blocks = args.blocks.as_deref().map(load_blocks).transpose()?;
    let html = args.html.as_deref().map(read_text).transpose()?;

    let Some(source) = ContentSource::from_parts(blocks, html) else {
        bail!("no content given, pass --html and/or --blocks");
    };
    Ok(source)
}

pub fn load_blocks(path: &Path) -> Result<Vec<BlockNode>> {
    let raw = read_text(path)?;
    parse_blocks(&raw).with_context(|| format!("failed to parse block tree {}", path.display()))
}

pub fn parse_blocks(raw: &str) -> Result<Vec<BlockNode>> {
    let document: BlockDocument = serde_json::from_str(raw)?;
    Ok(document.into_nodes())
}

pub fn extract_content(args: &ContentArgs) -> Result<ExtractedContent> {
    let source = load_content(args)?;
    let mut anchors = AnchorRegistry::from_seed(args.seed);
    let headings = extract_headings(&source, &args.levels, &mut anchors);

    if headings.is_empty() {
        warn!("no headings found at the requested levels");
    } else {
        info!(headings = headings.len(), "extracted headings");
    }

    Ok(ExtractedContent {
        source,
        anchors,
        headings,
    })
}
