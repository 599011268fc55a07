use std::io::{self, Write};

use anyhow::Result;

use crate::cli::ExtractArgs;
use crate::commands::content::extract_content;
use crate::model::HeadingRecord;
use crate::util::write_json_stdout;

pub fn run(args: ExtractArgs) -> Result<()> {
    let extracted = extract_content(&args.content)?;

    if args.json {
        write_json_stdout(&extracted.headings)
    } else {
        write_text_listing(&extracted.headings)
    }
}

fn write_text_listing(headings: &[HeadingRecord]) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    writeln!(output, "Headings: {}", headings.len())?;
    for heading in headings {
        writeln!(
            output,
            "h{}\t#{}\t{}",
            heading.level, heading.id, heading.text
        )?;
    }

    output.flush()?;
    Ok(())
}
