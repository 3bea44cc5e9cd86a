//! Collects notes and converts them one by one.
//!
//! Per-file problems never abort a run: each is printed as a `✗` line and
//! counted, and the run ends with a [`Summary`].

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context as _};
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    context::Context,
    converter::Convert,
    filename::{derive_stem, fallback_name, output_file_name},
    metadata::{self, Metadata},
};

const RULE_WIDTH: usize = 60;

#[derive(Debug)]
pub(crate) struct Inputs {
    pub files: Vec<PathBuf>,
    pub is_batch: bool,
}

/// Where one note goes, and the metadata that decided it.
#[derive(Serialize, Debug)]
pub(crate) struct Plan {
    pub input: PathBuf,
    pub output: PathBuf,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Summary {
    pub converted: usize,
    pub failed: usize,
    pub out_dir: PathBuf,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "\n{rule}")?;
        writeln!(f, "Conversion complete:")?;
        writeln!(f, "  ✓ Successful: {}", self.converted)?;
        if self.failed > 0 {
            writeln!(f, "  ✗ Failed: {}", self.failed)?;
        }
        writeln!(f, "  → Output directory: {}", self.out_dir.display())?;
        write!(f, "{rule}")
    }
}

/// A directory selects every `.md` file directly inside it; anything else must
/// be an existing file.
pub(crate) fn collect_inputs(path: &Path) -> anyhow::Result<Inputs> {
    if path.is_dir() {
        let mut files = vec![];
        for entry in std::fs::read_dir(path).with_context(|| format!("reading {path:?}"))? {
            let entry = entry?;
            let file_path = entry.path();
            // is_file follows symlinks; a bare `.md` has no extension()
            if file_path.is_file() && entry.file_name().to_string_lossy().ends_with(".md") {
                files.push(file_path);
            }
        }
        if files.is_empty() {
            bail!("No .md files found in {}", path.display());
        }
        files.sort();
        Ok(Inputs {
            files,
            is_batch: true,
        })
    } else if path.exists() {
        Ok(Inputs {
            files: vec![path.to_path_buf()],
            is_batch: false,
        })
    } else {
        bail!("File not found: {}", path.display());
    }
}

pub(crate) fn plan_file(ctx: &Context, input: &Path) -> anyhow::Result<Plan> {
    let content =
        std::fs::read_to_string(input).with_context(|| format!("reading {input:?}"))?;
    let metadata = metadata::extract(&content);
    if metadata.is_empty() {
        debug!("{input:?}: no frontmatter");
    } else {
        debug!("{input:?}: {} frontmatter field(s): {metadata:?}", metadata.len());
    }

    let stem = derive_stem(&metadata, &fallback_name(input));
    let output = ctx.out_dir.join(output_file_name(&stem, &ctx.format));
    debug!("{input:?} -> {output:?}");

    Ok(Plan {
        input: input.to_path_buf(),
        output,
        metadata,
    })
}

pub(crate) fn run(ctx: &Context, converter: &dyn Convert, inputs: &Inputs) -> Summary {
    if inputs.is_batch {
        println!(
            "Found {} markdown file(s) to convert...",
            inputs.files.len()
        );
    }

    let mut summary = Summary {
        converted: 0,
        failed: 0,
        out_dir: ctx.out_dir.clone(),
    };
    // output path -> input that produced it in this run
    let mut written: HashMap<PathBuf, PathBuf> = HashMap::new();

    for input in inputs.files.iter() {
        match process_file(ctx, converter, input, &mut written) {
            Ok(plan) => {
                if ctx.dry_run {
                    match serde_json::to_string(&plan) {
                        Ok(line) => println!("{line}"),
                        Err(e) => warn!("could not serialize plan for {input:?}: {e}"),
                    }
                } else {
                    println!(
                        "✓ Converted: {} → {}",
                        display_name(input),
                        display_name(&plan.output)
                    );
                }
                summary.converted += 1;
            }
            Err(e) => {
                println!("✗ Failed to convert {}: {e:#}", display_name(input));
                summary.failed += 1;
            }
        }
    }

    info!(
        "{} converted, {} failed",
        summary.converted, summary.failed
    );
    summary
}

fn process_file(
    ctx: &Context,
    converter: &dyn Convert,
    input: &Path,
    written: &mut HashMap<PathBuf, PathBuf>,
) -> anyhow::Result<Plan> {
    let plan = plan_file(ctx, input)?;

    if let Some(previous) = written.get(&plan.output) {
        warn!("{input:?} and {previous:?} both map to {:?}", plan.output);
        bail!(
            "output {} already written by {}",
            display_name(&plan.output),
            display_name(previous)
        );
    }

    if !ctx.dry_run {
        converter.convert(&plan.input, &plan.output)?;
    }
    written.insert(plan.output.clone(), input.to_path_buf());
    Ok(plan)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
