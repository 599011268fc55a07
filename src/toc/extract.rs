use std::collections::HashMap;

use tracing::{debug, trace};

use super::anchors::AnchorRegistry;
use super::dom::{HEADING_SELECTOR, element_ids, heading_level, parse_document};
use super::slug::explicit_id;
use crate::model::{
    BlockNode, ContentSource, DEFAULT_BLOCK_HEADING_LEVEL, HeadingLevels, HeadingRecord,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingCandidate {
    pub level: u8,
    pub text: String,
    pub explicit_id: Option<String>,
}

/// Headings found in markup, plus every id any element in it carries.
#[derive(Debug, Clone)]
pub struct HtmlScan {
    pub candidates: Vec<HeadingCandidate>,
    pub element_ids: Vec<String>,
}

/// Collects the headings of `source` whose level is in `levels`, in document
/// order, one record per `(text, level)`.
///
/// When the source carries both a block tree and its rendered markup, both
/// are scanned and the results merged; an explicit id found on either side
/// wins over a generated one. Generated ids never repeat an id already
/// present in the markup, on headings or elsewhere. Ids are registered with
/// `anchors` so a later injection pass over the same markup reuses them.
pub fn extract_headings(
    source: &ContentSource,
    levels: &HeadingLevels,
    anchors: &mut AnchorRegistry,
) -> Vec<HeadingRecord> {
    let mut candidates = collect_block_candidates(source.blocks(), levels);
    let block_candidates = candidates.len();

    if let Some(html) = source.html() {
        let scan = scan_html(html, levels);
        for id in &scan.element_ids {
            anchors.reserve(id);
        }
        candidates.extend(scan.candidates);
    }

    debug!(
        block_candidates,
        html_candidates = candidates.len() - block_candidates,
        "collected heading candidates"
    );

    merge_candidates(candidates, anchors)
}

pub fn collect_block_candidates(blocks: &[BlockNode], levels: &HeadingLevels) -> Vec<HeadingCandidate> {
    let mut candidates = Vec::new();
    for block in blocks {
        walk_block(block, levels, &mut candidates);
    }
    candidates
}

fn walk_block(block: &BlockNode, levels: &HeadingLevels, candidates: &mut Vec<HeadingCandidate>) {
    if block.is_heading() {
        let candidate = block_candidate(block);
        if levels.contains(candidate.level) {
            candidates.push(candidate);
        }
    }

    for child in &block.children {
        walk_block(child, levels, candidates);
    }
}

fn block_candidate(block: &BlockNode) -> HeadingCandidate {
    let fragment = parse_document(block.raw_content());
    let element = fragment.select_first(HEADING_SELECTOR).ok();

    let level = block
        .attrs
        .level
        .or(block.level)
        .or_else(|| element.as_ref().and_then(|element| heading_level(&element.name.local)))
        .unwrap_or(DEFAULT_BLOCK_HEADING_LEVEL);

    let text = match &element {
        Some(element) => element.as_node().text_contents(),
        None => fragment.text_contents(),
    };

    let explicit = explicit_id(block.attrs.anchor.as_deref()).or_else(|| {
        element
            .as_ref()
            .and_then(|element| explicit_id(element.attributes.borrow().get("id")))
    });

    HeadingCandidate {
        level,
        text: text.trim().to_string(),
        explicit_id: explicit,
    }
}

pub fn scan_html(html: &str, levels: &HeadingLevels) -> HtmlScan {
    let document = parse_document(html);
    let ids = element_ids(&document);
    let Ok(elements) = document.select(HEADING_SELECTOR) else {
        return HtmlScan {
            candidates: Vec::new(),
            element_ids: ids,
        };
    };

    let candidates = elements
        .filter_map(|element| {
            let level = heading_level(&element.name.local)?;
            if !levels.contains(level) {
                return None;
            }
            let text = element.as_node().text_contents();
            let explicit = explicit_id(element.attributes.borrow().get("id"));
            Some(HeadingCandidate {
                level,
                text: text.trim().to_string(),
                explicit_id: explicit,
            })
        })
        .collect();

    HtmlScan {
        candidates,
        element_ids: ids,
    }
}

// Exact (text, level) duplicates collapse into the first occurrence, wherever
// they sit in the document.
fn merge_candidates(
    candidates: Vec<HeadingCandidate>,
    anchors: &mut AnchorRegistry,
) -> Vec<HeadingRecord> {
    let mut records = Vec::<HeadingRecord>::new();
    let mut has_explicit_id = Vec::<bool>::new();
    let mut positions = HashMap::<(u8, String), usize>::new();

    // Explicit ids later in the sequence are taken before anything is generated.
    for id in candidates
        .iter()
        .filter_map(|candidate| candidate.explicit_id.as_deref())
    {
        anchors.reserve(id);
    }

    for candidate in candidates {
        if candidate.text.is_empty() {
            trace!(level = candidate.level, "skipping heading without text");
            continue;
        }

        let key = (candidate.level, candidate.text);
        if let Some(&position) = positions.get(&key) {
            if let Some(id) = candidate.explicit_id.as_deref() {
                if !has_explicit_id[position] {
                    records[position].id = anchors.claim_explicit(key.0, &key.1, id);
                    has_explicit_id[position] = true;
                }
            }
            trace!(level = key.0, text = %key.1, "duplicate heading suppressed");
            continue;
        }

        let id = match candidate.explicit_id.as_deref() {
            Some(id) => anchors.claim_explicit(key.0, &key.1, id),
            None => anchors.assign(key.0, &key.1),
        };

        positions.insert(key.clone(), records.len());
        has_explicit_id.push(candidate.explicit_id.is_some());
        records.push(HeadingRecord {
            level: key.0,
            text: key.1,
            id,
        });
    }

    records
}
