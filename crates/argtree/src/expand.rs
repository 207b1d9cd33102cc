//! `@file` argument expansion, resolved before tokenization.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};

/// Replace every `@path` word before `--` with the lines of `path`.
///
/// Blank lines and lines starting with `#` are skipped. Expanded lines are
/// not expanded again.
pub fn expand_args(words: Vec<String>) -> Result<Vec<String>> {
    let mut out = Vec::with_capacity(words.len());
    let mut words = words.into_iter();
    while let Some(word) = words.next() {
        if word == "--" {
            out.push(word);
            out.extend(words.by_ref());
            break;
        }
        let Some(path) = word.strip_prefix('@') else {
            out.push(word);
            continue;
        };
        if path.is_empty() {
            return Err(Error::EmptyExpansion);
        }
        let path = PathBuf::from(path);
        let content = fs::read_to_string(&path).map_err(|source| Error::Expand {
            path: path.clone(),
            source,
        })?;
        let before = out.len();
        out.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
        debug!(path = %path.display(), words = out.len() - before, "expanded argument file");
    }
    Ok(out)
}
