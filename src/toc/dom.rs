use kuchikikiki::NodeRef;
use tendril::TendrilSink;

use super::slug::explicit_id;
use crate::model::{MAX_HEADING_LEVEL, MIN_HEADING_LEVEL};

pub const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";

/// Parses markup into a fresh tree. html5ever never fails; broken markup is
/// repaired or dropped the way a browser would.
pub fn parse_document(html: &str) -> NodeRef {
    kuchikikiki::parse_html().one(html)
}

pub fn heading_level(local_name: &str) -> Option<u8> {
    let level = local_name
        .strip_prefix('h')
        .or_else(|| local_name.strip_prefix('H'))?
        .parse::<u8>()
        .ok()?;
    (MIN_HEADING_LEVEL..=MAX_HEADING_LEVEL)
        .contains(&level)
        .then_some(level)
}

/// Whether the markup is a whole document rather than a body fragment.
///
/// A byte order mark, whitespace and comments ahead of the doctype are skipped.
pub fn is_full_document(html: &str) -> bool {
    let mut rest = html.trim_start_matches('\u{feff}').trim_start();
    while let Some(comment) = rest.strip_prefix("<!--") {
        let Some(end) = comment.find("-->") else {
            return false;
        };
        rest = comment[end + 3..].trim_start();
    }

    let head = rest
        .chars()
        .take(9)
        .collect::<String>()
        .to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

/// Every usable `id` attribute in the tree, in document order.
pub fn element_ids(document: &NodeRef) -> Vec<String> {
    document
        .descendants()
        .filter_map(|node| {
            let element = node.as_element()?;
            explicit_id(element.attributes.borrow().get("id"))
        })
        .collect()
}

/// Serializes either the whole tree or only the contents of `<head>` and
/// `<body>`, matching the shape of the input markup.
pub fn serialize_like_input(document: &NodeRef, full_document: bool) -> String {
    let mut out = Vec::new();

    if full_document {
        if document.serialize(&mut out).is_err() {
            return String::new();
        }
    } else {
        // Leading <style>, <script> or <meta> in a fragment land in <head>.
        for section in ["head", "body"] {
            let Ok(container) = document.select_first(section) else {
                continue;
            };
            for child in container.as_node().children() {
                if child.serialize(&mut out).is_err() {
                    return String::new();
                }
            }
        }
    }

    String::from_utf8(out).unwrap_or_default()
}
