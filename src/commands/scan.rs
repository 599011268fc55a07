use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::ScanArgs;
use crate::commands::content::parse_blocks;
use crate::model::{ContentSource, HeadingLevels, TocManifest, TocManifestEntry};
use crate::toc::{AnchorRegistry, extract_headings};
use crate::util::{now_utc_string, read_text, sha256_file, write_json_pretty};

pub const MANIFEST_FILE_NAME: &str = "toc_manifest.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Html,
    Blocks,
}

impl SourceKind {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|ext| ext.to_str())?;
        if ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm") {
            Some(Self::Html)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Blocks)
        } else {
            None
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Blocks => "blocks",
        }
    }
}

pub fn run(args: ScanArgs) -> Result<()> {
    let manifest = build_manifest(&args.content_root, &args.levels, args.seed)?;

    if args.dry_run {
        info!(
            file_count = manifest.file_count,
            heading_count = manifest.heading_count,
            source = %manifest.content_root,
            "scan dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.content_root.join(MANIFEST_FILE_NAME));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote toc manifest");
    info!(
        file_count = manifest.file_count,
        heading_count = manifest.heading_count,
        "scan completed"
    );

    Ok(())
}

pub fn build_manifest(
    content_root: &Path,
    levels: &HeadingLevels,
    seed: Option<u64>,
) -> Result<TocManifest> {
    let mut paths = discover_content(content_root)?;
    paths.sort();

    if paths.is_empty() {
        bail!("no .html or .json content found in {}", content_root.display());
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(kind) = SourceKind::from_path(&path) else {
            continue;
        };

        let source = match load_source(&path, kind) {
            Ok(source) => source,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable content file");
                continue;
            }
        };

        let mut anchors = AnchorRegistry::from_seed(seed);
        let headings = extract_headings(&source, levels, &mut anchors);
        let sha256 = sha256_file(&path)?;
        let relative = path
            .strip_prefix(content_root)
            .unwrap_or(&path)
            .display()
            .to_string();

        files.push(TocManifestEntry {
            path: relative,
            source_kind: kind.as_str().to_string(),
            sha256,
            heading_count: headings.len(),
            headings,
        });
    }

    let heading_count = files.iter().map(|entry| entry.heading_count).sum();

    Ok(TocManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        content_root: content_root.display().to_string(),
        levels: levels.iter().collect(),
        file_count: files.len(),
        heading_count,
        files,
    })
}

fn load_source(path: &Path, kind: SourceKind) -> Result<ContentSource> {
    let raw = read_text(path)?;
    match kind {
        SourceKind::Html => Ok(ContentSource::Html(raw)),
        SourceKind::Blocks => {
            let blocks = parse_blocks(&raw)
                .with_context(|| format!("failed to parse block tree {}", path.display()))?;
            Ok(ContentSource::Blocks(blocks))
        }
    }
}

fn discover_content(content_root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![content_root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries =
            fs::read_dir(&dir).with_context(|| format!("failed to read {}", dir.display()))?;

        for entry in entries {
            let entry =
                entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .with_context(|| format!("failed to inspect file type: {}", path.display()))?;

            if file_type.is_dir() {
                pending.push(path);
                continue;
            }
            if !file_type.is_file() {
                continue;
            }

            let is_manifest = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name == MANIFEST_FILE_NAME);

            if !is_manifest && SourceKind::from_path(&path).is_some() {
                found.push(path);
            }
        }
    }

    Ok(found)
}
