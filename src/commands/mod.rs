pub mod content;
pub mod extract;
pub mod inject;
pub mod outline;
pub mod render;
pub mod scan;
