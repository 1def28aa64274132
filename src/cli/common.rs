//! Common utilities shared across CLI commands.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mdpass::mdast::{self, InputFormat, Node};

/// Format count with noun, handling pluralization
///
/// - `plural_count(0, "file")` -> `"0 files"`
/// - `plural_count(1, "file")` -> `"1 file"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}

/// Read and parse one input file into a tree.
pub fn read_tree(path: &Path, format: InputFormat) -> Result<Node> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    mdast::parse_tree(&content, format).with_context(|| format!("Invalid input {}", path.display()))
}

/// Absolute form of `path`, falling back to the path itself.
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// `<dir>/<stem>.json` for an input file.
pub fn output_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| "tree".into());
    dir.join(format!("{stem}.json"))
}

/// Write `content` to a file, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            writeln!(file, "{content}")?;
        }
        None => println!("{content}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "file"), "0 files");
        assert_eq!(plural_count(1, "file"), "1 file");
        assert_eq!(plural_count(3, "link"), "3 links");
    }

    #[test]
    fn test_output_path_keeps_inner_dots() {
        let out = output_path(Path::new("out"), Path::new("content/v1.2.md"));
        assert_eq!(out, PathBuf::from("out/v1.2.json"));
    }

    #[test]
    fn test_read_and_write_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.md");
        fs::write(&input, "Hello *world*\n").unwrap();

        let tree = read_tree(&input, InputFormat::Markdown).unwrap();
        let out = dir.path().join("a.json");
        write_output(Some(&out), &mdast::to_json(&tree, false).unwrap()).unwrap();

        let back = read_tree(&out, InputFormat::Json).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_tree(Path::new("/no/such/file.json"), InputFormat::Json).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read"));
    }
}
