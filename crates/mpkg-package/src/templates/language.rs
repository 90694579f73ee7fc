//! Target languages and their comment syntax.
//!
//! Both lookups are static tables; supporting another language means adding
//! a variant and its rows, not another branch in the engine.

use camino::Utf8Path;
use serde::Serialize;
use std::fmt;

/// Source language of a target document, derived from its file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Haskell,
    Forth,
    Pascal,
    Html,
    /// Markdown documents such as README.md
    Readme,
    /// Anything unrecognised: no comment slots
    #[default]
    Plain,
}

/// Comment tokens that wrap an inline slot in comment-slot mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    pub open: &'static str,
    pub close: &'static str,
}

/// Extension (lowercase, without dot) to language
static EXTENSIONS: &[(&str, Language)] = &[
    ("hs", Language::Haskell),
    ("lhs", Language::Haskell),
    ("fs", Language::Forth),
    ("fth", Language::Forth),
    ("forth", Language::Forth),
    ("pp", Language::Pascal),
    ("html", Language::Html),
    ("htm", Language::Html),
    ("md", Language::Readme),
];

/// Language to comment syntax; languages without a row have no comment slots
static COMMENT_SYNTAX: &[(Language, CommentSyntax)] = &[
    (
        Language::Haskell,
        CommentSyntax {
            open: "{-",
            close: "-}",
        },
    ),
    (
        Language::Forth,
        CommentSyntax {
            open: "(",
            close: ")",
        },
    ),
    (
        Language::Pascal,
        CommentSyntax {
            open: "(*",
            close: "*)",
        },
    ),
    (
        Language::Html,
        CommentSyntax {
            open: "<!--",
            close: "-->",
        },
    ),
    (
        Language::Readme,
        CommentSyntax {
            open: "<!--",
            close: "-->",
        },
    ),
];

impl Language {
    /// Look up a language by file extension, with or without the leading dot
    pub fn from_extension(extension: &str) -> Self {
        let extension = extension.trim_start_matches('.');
        EXTENSIONS
            .iter()
            .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
            .map(|(_, language)| *language)
            .unwrap_or_default()
    }

    /// Look up a language from a file path's extension
    pub fn from_path(path: &Utf8Path) -> Self {
        path.extension()
            .map(Self::from_extension)
            .unwrap_or_default()
    }

    /// Comment tokens for this language, `None` when comment slots are unsupported
    pub fn comment_syntax(self) -> Option<&'static CommentSyntax> {
        COMMENT_SYNTAX
            .iter()
            .find(|(language, _)| *language == self)
            .map(|(_, syntax)| syntax)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Haskell => "haskell",
            Self::Forth => "forth",
            Self::Pascal => "pascal",
            Self::Html => "html",
            Self::Readme => "readme",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
