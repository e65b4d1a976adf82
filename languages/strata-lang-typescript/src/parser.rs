//! Regex-based import extraction for TypeScript and JavaScript sources.
//!
//! Comments are blanked out before matching so commented-out imports are not
//! reported. The blanking keeps every byte offset and newline in place, which
//! lets match offsets be mapped straight back to lines and columns of the
//! original text.

use crate::regex_patterns::IMPORT_PATTERNS;

/// One statically written module specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawImport {
    pub specifier: String,
    /// Byte offset of the statement keyword (`import`, `export`, `require`).
    pub offset: usize,
}

/// Finds every import specifier in `source`, in source order.
pub(crate) fn parse_imports(source: &str) -> Vec<RawImport> {
    let masked = mask_comments(source);

    // (specifier offset, statement offset, specifier)
    let mut found: Vec<(usize, usize, &str)> = Vec::new();
    for pattern in IMPORT_PATTERNS.iter() {
        for caps in pattern.captures_iter(&masked) {
            if let (Some(whole), Some(specifier)) = (caps.get(0), caps.get(1)) {
                found.push((specifier.start(), whole.start(), specifier.as_str()));
            }
        }
    }

    // A binding list may swallow an earlier keyword; the nearest one wins.
    found.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    found.dedup_by_key(|entry| entry.0);

    let mut imports: Vec<RawImport> = found
        .into_iter()
        .map(|(_, offset, specifier)| RawImport {
            specifier: specifier.to_string(),
            offset,
        })
        .collect();
    imports.sort_by_key(|import| import.offset);
    imports
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    LineComment,
    BlockComment,
    Literal(u8),
}

/// Replaces comment bytes with spaces, leaving newlines and everything else
/// untouched.
pub(crate) fn mask_comments(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut state = ScanState::Code;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            ScanState::Code => match (byte, next) {
                (b'/', Some(b'/')) => {
                    state = ScanState::LineComment;
                    out.extend_from_slice(b"  ");
                    i += 2;
                    continue;
                }
                (b'/', Some(b'*')) => {
                    state = ScanState::BlockComment;
                    out.extend_from_slice(b"  ");
                    i += 2;
                    continue;
                }
                (b'\'' | b'"' | b'`', _) => {
                    state = ScanState::Literal(byte);
                    out.push(byte);
                }
                _ => out.push(byte),
            },
            ScanState::LineComment => {
                if byte == b'\n' {
                    state = ScanState::Code;
                    out.push(byte);
                } else {
                    out.push(b' ');
                }
            }
            ScanState::BlockComment => {
                if byte == b'*' && next == Some(b'/') {
                    state = ScanState::Code;
                    out.extend_from_slice(b"  ");
                    i += 2;
                    continue;
                }
                out.push(if byte == b'\n' { b'\n' } else { b' ' });
            }
            ScanState::Literal(quote) => {
                out.push(byte);
                if byte == b'\\' {
                    if let Some(escaped) = next {
                        out.push(escaped);
                        i += 2;
                        continue;
                    }
                } else if byte == quote || (byte == b'\n' && quote != b'`') {
                    state = ScanState::Code;
                }
            }
        }
        i += 1;
    }

    // Only ASCII bytes inside comments were replaced, so this cannot fail.
    String::from_utf8(out).unwrap_or_else(|_| source.to_string())
}

/// Maps byte offsets to 1-based line and column numbers.
pub(crate) struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Line and column (in characters) of `offset`.
    pub fn locate(&self, offset: usize) -> (u32, u32) {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let start = self.line_starts[line];
        let column = self
            .source
            .get(start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);
        (line as u32 + 1, column as u32 + 1)
    }
}
