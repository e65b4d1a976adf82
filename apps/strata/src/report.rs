//! Plain-text rendering of a project report.

use std::fmt::Write;
use strata_analysis_circular_deps::ProjectReport;

/// One block per diagnostic, then a one-line summary.
///
/// Paths are shown relative to the analyzed directory.
pub fn render_text(report: &ProjectReport) -> String {
    let mut out = String::new();
    for diagnostic in &report.diagnostics {
        let location = &diagnostic.location;
        let path = location
            .path
            .strip_prefix(&report.root)
            .unwrap_or(&location.path);
        let _ = writeln!(
            out,
            "{}:{}:{} [{}] {}",
            path.display(),
            location.line,
            location.column,
            diagnostic.cycle_kind,
            diagnostic.message
        );
        let _ = writeln!(out, "  suggestion: {}", diagnostic.suggestion);
    }

    let files = report.summary.files_analyzed;
    if report.diagnostics.is_empty() {
        let _ = writeln!(out, "No dependency cycles found in {} file(s).", files);
    } else {
        let _ = writeln!(
            out,
            "{} problem(s) in {} file(s); {} module cycle group(s).",
            report.diagnostics.len(),
            files,
            report.summary.total_cycles
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use strata_analysis_circular_deps::Summary;
    use strata_analysis_common::{CycleKind, Diagnostic, SourceLocation};

    fn report(diagnostics: Vec<Diagnostic>) -> ProjectReport {
        ProjectReport {
            root: PathBuf::from("/proj"),
            diagnostics,
            cycles: Vec::new(),
            summary: Summary {
                total_cycles: 1,
                total_modules_in_cycles: 2,
                largest_cycle_size: 2,
                files_analyzed: 4,
                analysis_time_ms: 0,
            },
            modules: 4,
            edges: 3,
            files_skipped: 0,
        }
    }

    #[test]
    fn renders_relative_location_and_kind() {
        let diagnostic = Diagnostic {
            location: SourceLocation::new("/proj/src/a.ts", 3, 1),
            message: "Circular dependency detected: src/a -> src/b -> src/a".to_string(),
            suggestion: "Extract a shared module.".to_string(),
            cycle_kind: CycleKind::ModuleCycle,
            cycle: vec!["/proj/src/a".into(), "/proj/src/b".into(), "/proj/src/a".into()],
        };

        let text = render_text(&report(vec![diagnostic]));
        assert_eq!(
            text,
            "src/a.ts:3:1 [module-cycle] Circular dependency detected: src/a -> src/b -> src/a\n\
             \x20 suggestion: Extract a shared module.\n\
             1 problem(s) in 4 file(s); 1 module cycle group(s).\n"
        );
    }

    #[test]
    fn renders_clean_summary() {
        let text = render_text(&report(Vec::new()));
        assert_eq!(text, "No dependency cycles found in 4 file(s).\n");
    }
}
