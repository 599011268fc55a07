use std::fmt::Write;

use crate::model::{HeadingRecord, Outline, OutlineNode};

/// Nests a flat, document-ordered heading list.
///
/// Single left-to-right pass over an explicit stack of open nodes: a heading
/// closes every open node at its own level or deeper, then becomes a child of
/// whatever is left on top (or a top-level item when the stack is empty).
/// Skipped levels are not filled in; an H5 after an H3 is simply the H3's
/// child.
pub fn build_outline(records: &[HeadingRecord]) -> Outline {
    let Some(min_level) = records.iter().map(|record| record.level).min() else {
        return Outline::default();
    };

    let mut items = Vec::new();
    let mut open = Vec::<OutlineNode>::new();

    for record in records {
        while open.last().is_some_and(|top| top.level() >= record.level) {
            close_top(&mut open, &mut items);
        }
        open.push(OutlineNode {
            record: record.clone(),
            children: Vec::new(),
        });
    }

    while !open.is_empty() {
        close_top(&mut open, &mut items);
    }

    Outline {
        min_level: Some(min_level),
        items,
    }
}

fn close_top(open: &mut Vec<OutlineNode>, items: &mut Vec<OutlineNode>) {
    if let Some(node) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => items.push(node),
        }
    }
}

/// Renders the outline as nested `<ol>`/`<ul>` lists of anchor links.
///
/// A child more than one level below its parent is wrapped in one empty
/// `<li class="navygator-gap">` list per skipped level so the markup stays
/// valid. Consecutive children with the same gap share their wrappers.
/// An empty outline renders as an empty string.
pub fn render_outline_html(outline: &Outline, numbered: bool) -> String {
    let Some(min_level) = outline.min_level.filter(|_| !outline.is_empty()) else {
        return String::new();
    };

    let tag = list_tag(numbered);
    let mut html = String::new();
    let _ = write!(html, "<{tag}>");
    render_children(&mut html, &outline.items, min_level, tag);
    let _ = write!(html, "</{tag}>");
    html
}

pub fn list_tag(numbered: bool) -> &'static str {
    if numbered { "ol" } else { "ul" }
}

fn render_children(html: &mut String, children: &[OutlineNode], base_level: u8, tag: &str) {
    let gap_of = |node: &OutlineNode| node.level().saturating_sub(base_level);

    let mut index = 0;
    while index < children.len() {
        let gap = gap_of(&children[index]);
        let run_len = children[index..]
            .iter()
            .take_while(|node| gap_of(*node) == gap)
            .count();

        for _ in 0..gap {
            let _ = write!(html, "<li class=\"navygator-gap\"><{tag}>");
        }
        for node in &children[index..index + run_len] {
            render_node(html, node, tag);
        }
        for _ in 0..gap {
            let _ = write!(html, "</{tag}></li>");
        }

        index += run_len;
    }
}

fn render_node(html: &mut String, node: &OutlineNode, tag: &str) {
    let _ = write!(
        html,
        "<li><a href=\"#{}\">{}</a>",
        escape_html(&node.record.id),
        escape_html(&node.record.text)
    );

    if !node.children.is_empty() {
        let _ = write!(html, "<{tag}>");
        render_children(html, &node.children, node.level().saturating_add(1), tag);
        let _ = write!(html, "</{tag}>");
    }

    html.push_str("</li>");
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
