//! Normalized-source hashing for source-code duplicate detection.
//!
//! Two source files with identical logic but different formatting or
//! comments should fingerprint equal. Normalization removes block comments,
//! truncates each line at its line-comment marker, and strips all
//! whitespace; the remaining text is hashed with the selected digest.
//!
//! Normalization is syntactic, not lexical: a comment marker inside a string
//! literal is treated as a comment start. That trade-off keeps the
//! normalizer trivial and is acceptable for a duplicate finder.

use std::path::Path;

use super::hasher::{hash_bytes, Fingerprint, HashAlgorithm, HashError};

/// Comment delimiters for a source language.
#[derive(Debug, Clone, Copy)]
pub struct CommentSyntax {
    /// Marker that starts a comment running to end of line.
    pub line: &'static str,
    /// Optional block comment delimiters (open, close).
    pub block: Option<(&'static str, &'static str)>,
}

impl CommentSyntax {
    /// Look up the comment syntax for a file extension (without the dot,
    /// case-insensitive). Unknown extensions fall back to `#` line comments,
    /// which leaves languages without that marker effectively un-stripped
    /// but still whitespace-normalized.
    pub fn for_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "rs" | "c" | "h" | "cpp" | "cc" | "hpp" | "java" | "js" | "jsx" | "ts" | "tsx"
            | "go" | "cs" | "swift" | "kt" | "scala" => Self {
                line: "//",
                block: Some(("/*", "*/")),
            },
            "sql" | "lua" | "hs" => Self {
                line: "--",
                block: None,
            },
            "html" | "htm" | "xml" => Self {
                line: "<!--",
                block: Some(("<!--", "-->")),
            },
            // py, sh, rb, pl, yaml, toml and anything unknown
            _ => Self {
                line: "#",
                block: None,
            },
        }
    }
}

/// Normalize source text: drop block comments, cut each line at the
/// line-comment marker, remove all whitespace.
pub fn normalize(text: &str, syntax: CommentSyntax) -> String {
    let without_blocks = match syntax.block {
        Some((open, close)) => strip_block_comments(text, open, close),
        None => text.to_string(),
    };

    let mut out = String::with_capacity(without_blocks.len());
    for line in without_blocks.lines() {
        let code = match line.find(syntax.line) {
            Some(idx) => &line[..idx],
            None => line,
        };
        out.extend(code.chars().filter(|c| !c.is_whitespace()));
    }
    out
}

fn strip_block_comments(text: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        match rest.find(open) {
            Some(start) => {
                out.push_str(&rest[..start]);
                match rest[start + open.len()..].find(close) {
                    Some(end) => {
                        rest = &rest[start + open.len() + end + close.len()..];
                    }
                    None => break, // unterminated comment swallows the tail
                }
            }
            None => {
                out.push_str(rest);
                break;
            }
        }
    }
    out
}

/// Fingerprint a source file after normalization.
///
/// The file is read as lossy UTF-8; the comment syntax is chosen from its
/// extension. Unreadable files surface as [`HashError`] like raw hashing.
pub fn hash_source(path: &Path, algorithm: HashAlgorithm) -> Result<Fingerprint, HashError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let text = String::from_utf8_lossy(&bytes);
    let syntax = path
        .extension()
        .and_then(|e| e.to_str())
        .map(CommentSyntax::for_extension)
        .unwrap_or(CommentSyntax {
            line: "#",
            block: None,
        });

    Ok(hash_bytes(normalize(&text, syntax).as_bytes(), algorithm))
}
