use std::collections::HashSet;
use std::fmt::Write;

use super::outline::{list_tag, render_outline_html};
use crate::model::{Outline, TocConfig};

pub const EMPTY_STATE_MESSAGE: &str = "No headings found.";

const TOGGLE_SCRIPT_ASSET: &str = "navygator-toggle-script";

const TOGGLE_SCRIPT: &str = "<script>document.addEventListener('click',function(e){\
var b=e.target.closest('.navygator-toggle');if(!b)return;\
var l=document.getElementById(b.getAttribute('aria-controls'));if(!l)return;\
var open=b.getAttribute('aria-expanded')==='true';\
b.setAttribute('aria-expanded',open?'false':'true');l.hidden=open;});</script>";

/// State shared by every navigator rendered during one page render.
///
/// Tracks which one-per-page assets were already written and numbers the
/// navigator instances so their element ids stay distinct. Create one per
/// render pass; nothing is shared between passes.
#[derive(Debug, Default)]
pub struct RenderContext {
    emitted: HashSet<&'static str>,
    instances: usize,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time `asset` is requested in this context.
    pub fn emit_once(&mut self, asset: &'static str) -> bool {
        self.emitted.insert(asset)
    }

    pub fn next_instance(&mut self) -> usize {
        self.instances += 1;
        self.instances
    }

    pub fn instances(&self) -> usize {
        self.instances
    }
}

/// Wraps an outline in the navigator markup: title, toggle button and list,
/// or the empty-state paragraph when there is nothing to list. The title is
/// written as given.
pub fn render_navigator(ctx: &mut RenderContext, outline: &Outline, config: &TocConfig) -> String {
    let instance = ctx.next_instance();
    let nav_id = format!("navygator-{instance}");
    let list_id = format!("{nav_id}-list");

    let mut html = String::new();
    let _ = write!(html, "<nav class=\"navygator\" id=\"{nav_id}\">");
    let _ = write!(
        html,
        "<div class=\"navygator-header\"><span class=\"navygator-title\">{}</span>",
        config.title
    );

    if outline.is_empty() {
        html.push_str("</div>");
        let _ = write!(html, "<p class=\"navygator-empty\">{EMPTY_STATE_MESSAGE}</p>");
        html.push_str("</nav>");
        return html;
    }

    let _ = write!(
        html,
        "<button type=\"button\" class=\"navygator-toggle\" aria-controls=\"{list_id}\" aria-expanded=\"true\">Toggle</button></div>"
    );
    let _ = write!(
        html,
        "<div class=\"navygator-list navygator-{}\" id=\"{list_id}\">",
        list_tag(config.numbered)
    );
    html.push_str(&render_outline_html(outline, config.numbered));
    html.push_str("</div></nav>");

    if ctx.emit_once(TOGGLE_SCRIPT_ASSET) {
        html.push_str(TOGGLE_SCRIPT);
    }

    html
}
