//! `mdpass convert`: markdown to mdast JSON, no passes applied.

use anyhow::{Result, bail};

use mdpass::log;
use mdpass::mdast::{self, InputFormat};

use super::ConvertArgs;
use super::common::{read_tree, write_output};

/// Entry point for `mdpass convert`.
pub fn run_convert(args: &ConvertArgs) -> Result<()> {
    if InputFormat::from_path(&args.input)? != InputFormat::Markdown {
        bail!("{} is not a markdown file", args.input.display());
    }

    let tree = read_tree(&args.input, InputFormat::Markdown)?;
    let json = mdast::to_json(&tree, args.pretty)?;
    write_output(args.output.as_deref(), &json)?;

    if let Some(path) = &args.output {
        log!("convert"; "wrote {}", path.display());
    }
    Ok(())
}
