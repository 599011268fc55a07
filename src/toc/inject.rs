use std::collections::HashSet;

use tracing::{debug, trace};

use super::anchors::AnchorRegistry;
use super::dom::{
    HEADING_SELECTOR, element_ids, heading_level, is_full_document, parse_document,
    serialize_like_input,
};
use super::slug::explicit_id;

/// Gives every heading without an `id` one, and leaves the rest untouched.
///
/// Headings the extractor already saw get the id it registered, unless another
/// element already carries that id; anything else gets a fresh id unique
/// among the ids present in the document. A second run over the output finds
/// nothing to do.
pub fn inject_ids(html: &str, anchors: &mut AnchorRegistry) -> String {
    let full_document = is_full_document(html);
    let document = parse_document(html);

    let mut present = HashSet::new();
    for id in element_ids(&document) {
        anchors.reserve(&id);
        present.insert(id);
    }

    let Ok(headings) = document.select(HEADING_SELECTOR) else {
        return serialize_like_input(&document, full_document);
    };

    let mut injected = 0_usize;
    let mut kept = 0_usize;
    for heading in headings {
        let Some(level) = heading_level(&heading.name.local) else {
            continue;
        };
        let text = heading.as_node().text_contents().trim().to_string();
        let existing = explicit_id(heading.attributes.borrow().get("id"));

        match existing {
            Some(id) => {
                anchors.observe(level, &text, &id);
                kept += 1;
            }
            None => {
                let registered = anchors.take(level, &text);
                let id = match registered {
                    Some(id) if !present.contains(&id) => id,
                    Some(id) => {
                        trace!(level, id = %id, "registered id already in use, generating another");
                        anchors.fresh(&text)
                    }
                    None => anchors.fresh(&text),
                };
                present.insert(id.clone());
                heading.attributes.borrow_mut().insert("id", id);
                injected += 1;
            }
        }
    }

    debug!(injected, kept, "heading id injection finished");
    serialize_like_input(&document, full_document)
}
