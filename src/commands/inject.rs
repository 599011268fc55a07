use anyhow::Result;
use tracing::info;

use crate::cli::InjectArgs;
use crate::toc::{AnchorRegistry, inject_ids};
use crate::util::{read_text, write_text_output};

pub fn run(args: InjectArgs) -> Result<()> {
    let html = read_text(&args.input)?;
    let mut anchors = AnchorRegistry::from_seed(args.seed);
    let injected = inject_ids(&html, &mut anchors);

    write_text_output(args.output.as_deref(), &injected)?;

    if let Some(output) = &args.output {
        info!(input = %args.input.display(), output = %output.display(), "wrote document with heading ids");
    }

    Ok(())
}
