use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

pub const MIN_HEADING_LEVEL: u8 = 1;
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Level assumed for heading blocks that carry no level of their own.
pub const DEFAULT_BLOCK_HEADING_LEVEL: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeadingRecord {
    pub level: u8,
    pub text: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineNode {
    pub record: HeadingRecord,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn level(&self) -> u8 {
        self.record.level
    }
}

/// Synthetic root of an outline. `min_level` is `None` only when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub min_level: Option<u8>,
    pub items: Vec<OutlineNode>,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn node_count(&self) -> usize {
        fn count(nodes: &[OutlineNode]) -> usize {
            nodes.iter().map(|node| 1 + count(&node.children)).sum()
        }
        count(&self.items)
    }
}

/// Allow-set of heading depths to include.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingLevels(BTreeSet<u8>);

impl HeadingLevels {
    /// Parses `2,3`, `h2-h4`, `1,3-5` style level lists.
    pub fn parse(raw: &str) -> Result<Self> {
        let token_regex = Regex::new(r"^(?i)h?([1-6])(?:\s*-\s*h?([1-6]))?$")
            .context("failed to compile heading level regex")?;

        let mut levels = BTreeSet::new();
        for token in raw.split(',').map(str::trim).filter(|token| !token.is_empty()) {
            let Some(captures) = token_regex.captures(token) else {
                bail!("invalid heading level '{token}', expected 1-6 or a range like h2-h4");
            };

            let start = captures
                .get(1)
                .and_then(|value| value.as_str().parse::<u8>().ok())
                .unwrap_or(MIN_HEADING_LEVEL);
            let end = captures
                .get(2)
                .and_then(|value| value.as_str().parse::<u8>().ok())
                .unwrap_or(start);

            if end < start {
                bail!("descending heading level range '{token}'");
            }
            levels.extend(start..=end);
        }

        if levels.is_empty() {
            bail!("no heading levels given");
        }

        Ok(Self(levels))
    }

    #[cfg(test)]
    pub fn from_levels(levels: impl IntoIterator<Item = u8>) -> Self {
        Self(
            levels
                .into_iter()
                .filter(|level| (MIN_HEADING_LEVEL..=MAX_HEADING_LEVEL).contains(level))
                .collect(),
        )
    }

    pub fn contains(&self, level: u8) -> bool {
        self.0.contains(&level)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

#[derive(Debug, Clone)]
pub struct TocConfig {
    pub levels: HeadingLevels,
    pub numbered: bool,
    pub title: String,
}

/// One node of a structured content tree.
///
/// Accepts the block-editor shape (`blockName`, `attrs`, `innerHTML`,
/// `innerBlocks`) as well as a generic shape (`type`, `level`, `innerText` or
/// `innerContent`, `children`). `innerContent` may be a string or the block
/// editor's list of string fragments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockNode {
    #[serde(default, rename = "blockName", alias = "type", alias = "tag")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "attrs_or_default")]
    pub attrs: BlockAttrs,
    #[serde(default)]
    pub level: Option<u8>,
    #[serde(default, rename = "innerHTML")]
    pub inner_html: Option<String>,
    #[serde(default, rename = "innerText")]
    pub inner_text: Option<String>,
    #[serde(default, rename = "innerContent", deserialize_with = "joined_content")]
    pub inner_content: Option<String>,
    #[serde(default, rename = "innerBlocks", alias = "children")]
    pub children: Vec<BlockNode>,
}

impl BlockNode {
    pub fn is_heading(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| kind == "heading" || kind.ends_with("/heading"))
    }

    /// Raw inner content, markup included: the first non-blank of
    /// `innerHTML`, `innerText` and `innerContent`.
    pub fn raw_content(&self) -> &str {
        [&self.inner_html, &self.inner_text, &self.inner_content]
            .into_iter()
            .filter_map(|value| value.as_deref())
            .find(|value| !value.trim().is_empty())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockAttrs {
    #[serde(default)]
    pub level: Option<u8>,
    #[serde(default)]
    pub anchor: Option<String>,
}

// Serialized PHP arrays come through as `[]` when empty.
fn attrs_or_default<'de, D>(deserializer: D) -> Result<BlockAttrs, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Object(_) => {
            serde_json::from_value(value).map_err(serde::de::Error::custom)
        }
        _ => Ok(BlockAttrs::default()),
    }
}

// Block-editor `innerContent` is a list of fragments with `null` where an
// inner block sits.
fn joined_content<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(text) => Some(text),
        serde_json::Value::Array(parts) => {
            Some(parts.iter().filter_map(serde_json::Value::as_str).collect())
        }
        _ => None,
    })
}

/// A structured tree file holds either a list of top-level nodes or one node.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BlockDocument {
    Many(Vec<BlockNode>),
    One(BlockNode),
}

impl BlockDocument {
    pub fn into_nodes(self) -> Vec<BlockNode> {
        match self {
            Self::Many(nodes) => nodes,
            Self::One(node) => vec![node],
        }
    }
}

#[derive(Debug, Clone)]
pub enum ContentSource {
    Blocks(Vec<BlockNode>),
    Html(String),
    Both { blocks: Vec<BlockNode>, html: String },
}

impl ContentSource {
    pub fn from_parts(blocks: Option<Vec<BlockNode>>, html: Option<String>) -> Option<Self> {
        match (blocks, html) {
            (Some(blocks), Some(html)) => Some(Self::Both { blocks, html }),
            (Some(blocks), None) => Some(Self::Blocks(blocks)),
            (None, Some(html)) => Some(Self::Html(html)),
            (None, None) => None,
        }
    }

    pub fn blocks(&self) -> &[BlockNode] {
        match self {
            Self::Blocks(blocks) | Self::Both { blocks, .. } => blocks,
            Self::Html(_) => &[],
        }
    }

    pub fn html(&self) -> Option<&str> {
        match self {
            Self::Html(html) | Self::Both { html, .. } => Some(html),
            Self::Blocks(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderOutput {
    pub navigator: String,
    pub content: Option<String>,
    pub headings: Vec<HeadingRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TocManifestEntry {
    pub path: String,
    pub source_kind: String,
    pub sha256: String,
    pub heading_count: usize,
    pub headings: Vec<HeadingRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TocManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub content_root: String,
    pub levels: Vec<u8>,
    pub file_count: usize,
    pub heading_count: usize,
    pub files: Vec<TocManifestEntry>,
}
