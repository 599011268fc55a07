use anyhow::Result;
use tracing::info;

use crate::cli::{OutlineArgs, OutlineFormat};
use crate::commands::content::extract_content;
use crate::toc::{build_outline, render_outline_html};
use crate::util::{write_json_stdout, write_text_output};

pub fn run(args: OutlineArgs) -> Result<()> {
    let extracted = extract_content(&args.content)?;
    let outline = build_outline(&extracted.headings);

    info!(
        top_level = outline.items.len(),
        nodes = outline.node_count(),
        "outline built"
    );

    match args.format {
        OutlineFormat::Json => write_json_stdout(&outline),
        OutlineFormat::Html => {
            write_text_output(None, &render_outline_html(&outline, args.numbered))
        }
    }
}
