use anyhow::Result;
use tracing::{info, warn};

use crate::cli::RenderArgs;
use crate::commands::content::{ExtractedContent, extract_content};
use crate::model::{RenderOutput, TocConfig};
use crate::toc::{RenderContext, build_outline, inject_ids, render_navigator};
use crate::util::{write_json_stdout, write_text_output};

pub fn run(args: RenderArgs) -> Result<()> {
    let extracted = extract_content(&args.content)?;

    let config = TocConfig {
        levels: args.content.levels.clone(),
        numbered: args.numbered,
        title: args.title.clone(),
    };

    let output = render_page(extracted, &config);

    if args.json {
        return write_json_stdout(&output);
    }

    let mut page = output.navigator;
    if let Some(content) = output.content {
        page.push('\n');
        page.push_str(&content);
    }
    write_text_output(args.output.as_deref(), &page)
}

/// Renders the navigator and injects ids into the markup in one id pass, so
/// every outline link resolves to an anchor in the emitted content.
pub fn render_page(mut extracted: ExtractedContent, config: &TocConfig) -> RenderOutput {
    let outline = build_outline(&extracted.headings);

    let mut ctx = RenderContext::new();
    let navigator = render_navigator(&mut ctx, &outline, config);

    let content = match extracted.source.html() {
        Some(html) => Some(inject_ids(html, &mut extracted.anchors)),
        None => {
            warn!("no --html given, emitting the navigator without content");
            None
        }
    };

    info!(
        headings = extracted.headings.len(),
        levels = ?config.levels.iter().collect::<Vec<u8>>(),
        navigators = ctx.instances(),
        "render finished"
    );

    RenderOutput {
        navigator,
        content,
        headings: extracted.headings,
    }
}
