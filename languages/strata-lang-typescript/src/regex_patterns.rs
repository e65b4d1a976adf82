//! Shared regex patterns for TypeScript/JavaScript import parsing
//!
//! Every pattern captures the module specifier in group 1. Patterns run over
//! comment-masked source; binding lists may span several lines.

use once_cell::sync::Lazy;
use regex::Regex;

/// ES6 import with bindings: `import ... from 'module'`
/// Matches: `import { a, b } from "./x"`, `import * as ns from "./x"`, `import type T from "./x"`
pub static ES6_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s+(?:type\s+)?[\w$*{},\s]+?\s*from\s*['"]([^'"\n]+)['"]"#)
        .expect("ES6 import regex should be valid")
});

/// Side-effect import: `import 'module'`
pub static SIDE_EFFECT_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s*['"]([^'"\n]+)['"]"#)
        .expect("side-effect import regex should be valid")
});

/// Re-export: `export ... from 'module'`
/// Matches: `export * from "./x"`, `export { a as b } from "./x"`
pub static EXPORT_FROM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bexport\s+(?:type\s+)?[\w$*{},\s]+?\s*from\s*['"]([^'"\n]+)['"]"#)
        .expect("export-from regex should be valid")
});

/// CommonJS require pattern: require('module')
/// Matches: const foo = require("module")
pub static REQUIRE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\brequire\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#)
        .expect("require regex should be valid")
});

/// Dynamic import pattern: import('module')
/// Matches: import("module")
pub static DYNAMIC_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#)
        .expect("dynamic import regex should be valid")
});

/// All import forms, in the order they are tried.
pub static IMPORT_PATTERNS: Lazy<[&'static Regex; 5]> = Lazy::new(|| {
    [
        &*ES6_IMPORT_RE,
        &*SIDE_EFFECT_IMPORT_RE,
        &*EXPORT_FROM_RE,
        &*REQUIRE_RE,
        &*DYNAMIC_IMPORT_RE,
    ]
});
