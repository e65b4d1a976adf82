//! TypeScript/JavaScript front end for strata.
//!
//! Extracts statically written module specifiers from `import`, `export ...
//! from`, `require()` and `import()` forms. Specifiers built at runtime are not
//! discovered.

mod parser;
pub mod regex_patterns;

use parser::{parse_imports, LineIndex};
use std::path::Path;
use strata_analysis_common::{ImportExtractor, ImportReference, SourceLocation};
use tracing::trace;

/// Source extensions this front end reads.
pub const EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptImportExtractor;

impl TypeScriptImportExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ImportExtractor for TypeScriptImportExtractor {
    fn extensions(&self) -> &[&'static str] {
        EXTENSIONS
    }

    fn extract(&self, path: &Path, content: &str) -> Vec<ImportReference> {
        let index = LineIndex::new(content);
        let imports: Vec<ImportReference> = parse_imports(content)
            .into_iter()
            .map(|import| {
                let (line, column) = index.locate(import.offset);
                ImportReference::new(import.specifier, SourceLocation::new(path, line, column))
            })
            .collect();
        trace!(path = %path.display(), imports = imports.len(), "Extracted imports");
        imports
    }
}
