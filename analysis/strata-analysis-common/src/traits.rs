// analysis/strata-analysis-common/src/traits.rs

use crate::types::ImportReference;
use std::path::Path;

/// Front-end seam: turns one file's text into the import references it contains.
///
/// Implementations must be pure. The project analyzer may call them from any
/// thread and in any order.
pub trait ImportExtractor: Send + Sync {
    /// File extensions (without the dot) this extractor understands.
    fn extensions(&self) -> &[&'static str];

    /// Extract every statically written import reference from `content`.
    ///
    /// `path` is only used to stamp the returned source locations.
    fn extract(&self, path: &Path, content: &str) -> Vec<ImportReference>;

    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}
