//! `mdpass transform`: run the passes over input files.
//!
//! A single input without `--output` is written to stdout. Multiple inputs
//! are processed in parallel into the output directory, one `<stem>.json`
//! per input.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, anyhow, bail};
use parking_lot::Mutex;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use mdpass::config::MdpassConfig;
use mdpass::core::page_id_for;
use mdpass::logger::ProgressLine;
use mdpass::mdast::{self, InputFormat};
use mdpass::pipeline::{FileContext, PageContext, Passes, TransformStats, Transformer};
use mdpass::{debug, log};

use super::TransformArgs;
use super::common::{absolute, output_path, plural_count, read_tree, write_output};

/// Shared, read-only state for every file in a batch.
struct Batch<'a> {
    args: &'a TransformArgs,
    config: &'a MdpassConfig,
    base: PageContext,
    passes: Passes,
    content_dir: PathBuf,
}

impl Batch<'_> {
    /// Page id for `path`: `--id`, then `[page] id`, then derived from the path.
    fn page_id(&self, path: &Path) -> String {
        self.args
            .id
            .clone()
            .or_else(|| self.config.page.id.clone())
            .unwrap_or_else(|| {
                page_id_for(&absolute(path), &self.content_dir, &self.config.site.index)
            })
    }

    /// Content-relative path of `path`, unless `[page] self` is set.
    fn self_path(&self, path: &Path) -> PathBuf {
        if let Some(fixed) = &self.config.page.self_path {
            return fixed.clone();
        }
        let path = absolute(path);
        path.strip_prefix(&self.content_dir)
            .map(Path::to_path_buf)
            .unwrap_or(path)
    }

    fn transformer_for(&self, path: &Path) -> Transformer {
        let context = self
            .base
            .clone()
            .with_id(self.page_id(path))
            .with_self_path(self.self_path(path));
        Transformer::new(context).with_passes(self.passes)
    }

    /// Parse, transform and serialize one file.
    fn process(&self, path: &Path, format: InputFormat) -> Result<(TransformStats, String)> {
        let mut tree = read_tree(path, format)?;
        let transformer = self.transformer_for(path);
        debug!("transform"; "{} as page `{}`", path.display(), transformer.context().id.as_deref().unwrap_or_default());

        let stats = transformer.run(&mut tree, &FileContext::new(path));
        let json = mdast::to_json(&tree, self.args.pretty)?;
        Ok((stats, json))
    }
}

/// CLI flags override `[passes]`.
fn resolve_passes(args: &TransformArgs, config: Passes) -> Passes {
    Passes {
        heading: args.heading.unwrap_or(config.heading),
        link: args.link.unwrap_or(config.link),
        entity: args.entity.unwrap_or(config.entity),
    }
}

/// Entry point for `mdpass transform`.
pub fn run_transform(args: &TransformArgs, config: &MdpassConfig) -> Result<()> {
    if args.inputs.len() > 1 && args.output.is_none() {
        bail!("{} given, --output <DIR> is required", plural_count(args.inputs.len(), "input"));
    }

    // Reject unknown extensions before doing any work
    let inputs = args
        .inputs
        .iter()
        .map(|path| -> Result<_> { Ok((path.clone(), InputFormat::from_path(path)?)) })
        .collect::<Result<Vec<_>>>()?;

    let batch = Batch {
        args,
        config,
        base: config.page_context()?,
        passes: resolve_passes(args, config.passes),
        content_dir: config.content_dir(),
    };

    let Some(out_dir) = &args.output else {
        let (path, format) = &inputs[0];
        let (_, json) = batch.process(path, *format)?;
        return write_output(None, &json);
    };

    check_output_collisions(&inputs, out_dir)?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let totals = transform_all(&batch, &inputs, out_dir)?;
    log!("done"; "{}: {} classified, {} rewritten, {} encoded",
        plural_count(inputs.len(), "file"),
        plural_count(totals.headings, "heading"),
        plural_count(totals.links, "link"),
        plural_count(totals.paragraphs, "paragraph"));
    Ok(())
}

/// Fail when two inputs would be written to the same `<stem>.json`.
fn check_output_collisions(inputs: &[(PathBuf, InputFormat)], out_dir: &Path) -> Result<()> {
    let mut seen: FxHashMap<PathBuf, &Path> = FxHashMap::default();
    for (path, _) in inputs {
        let target = output_path(out_dir, path);
        if let Some(previous) = seen.get(&target) {
            bail!(
                "{} and {} would both be written to {}",
                previous.display(),
                path.display(),
                target.display()
            );
        }
        seen.insert(target, path);
    }
    Ok(())
}

/// Process every input in parallel, stopping at the first failure.
fn transform_all(
    batch: &Batch<'_>,
    inputs: &[(PathBuf, InputFormat)],
    out_dir: &Path,
) -> Result<TransformStats> {
    let count = |f: InputFormat| inputs.iter().filter(|(_, fmt)| *fmt == f).count();
    let progress = ProgressLine::new(&[
        ("json", count(InputFormat::Json)),
        ("markdown", count(InputFormat::Markdown)),
    ]);

    let totals = Mutex::new(TransformStats::default());
    let has_error = AtomicBool::new(false);

    let result = inputs.par_iter().try_for_each(|(path, format)| {
        if has_error.load(Ordering::Relaxed) {
            return Err(anyhow!("Aborted"));
        }

        let written = batch
            .process(path, *format)
            .and_then(|(stats, json)| {
                write_output(Some(&output_path(out_dir, path)), &json)?;
                Ok(stats)
            });

        match written {
            Ok(stats) => {
                *totals.lock() += stats;
                progress.inc(match format {
                    InputFormat::Json => "json",
                    InputFormat::Markdown => "markdown",
                });
                Ok(())
            }
            Err(e) => {
                if !has_error.swap(true, Ordering::Relaxed) {
                    log!("error"; "{}: {:#}", path.display(), e);
                }
                Err(anyhow!("Transform failed"))
            }
        }
    });

    result?;
    progress.finish();
    Ok(totals.into_inner())
}
