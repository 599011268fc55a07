//! Heading extraction, outline building and heading anchor injection.

mod anchors;
mod dom;
mod extract;
mod inject;
mod outline;
mod render;
mod slug;

pub use anchors::AnchorRegistry;
pub use extract::extract_headings;
pub use inject::inject_ids;
pub use outline::{build_outline, render_outline_html};
pub use render::{RenderContext, render_navigator};
