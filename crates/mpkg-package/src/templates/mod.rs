//! Text template system for package documents.
//!
//! The engine has two slot syntaxes, and a pass uses exactly one of them:
//! - Inline slots: `{{ package.name }}`, valid in any document
//! - Comment slots: the inline slot wrapped in the target language's comment
//!   tokens, e.g. `<!-- {{ package.name }} -->` in Markdown or HTML. The
//!   template stays a harmless comment until rendered.
//!
//! # Architecture
//!
//! - `language`: extension and comment-syntax lookup tables
//! - `context`: dotted-path lookups over JSON data
//! - `document`: source text plus its language
//! - `engine`: the single-pass scanner/substituter
//!
//! # Slot Syntax
//!
//! ```text
//! {{ path }}              value at path, "" when missing
//! {{ path | default }}    value at path, `default` when missing
//! {{ path | "  x  " }}    quotes keep surrounding spaces in the default
//! ```
//!
//! | Language | Extensions              | Comment slot             |
//! |----------|-------------------------|--------------------------|
//! | html     | `.html` `.htm`          | `<!-- {{ path }} -->`    |
//! | readme   | `.md`                   | `<!-- {{ path }} -->`    |
//! | haskell  | `.hs` `.lhs`            | `{- {{ path }} -}`       |
//! | pascal   | `.pp`                   | `(* {{ path }} *)`       |
//! | forth    | `.fs` `.fth` `.forth`   | `( {{ path }} )`         |

pub mod context;
pub mod document;
pub mod engine;
pub mod language;

// Re-export main types for convenience
pub use context::{stringify, Context, PACKAGE_KEY};
pub use document::Document;
pub use engine::{EngineConfig, Rendered, SlotExpr, SlotMode, TemplateEngine};
pub use language::{CommentSyntax, Language};
