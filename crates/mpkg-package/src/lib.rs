//! # mpkg-package
//!
//! Package rendering library for the mpkg CLI providing:
//! - A two-mode text template engine (inline `{{ }}` slots and
//!   language-aware comment slots)
//! - Data file loading (`.json` and the `.js` data-script format)
//! - The render pipeline behind `mpkg package render`
//!
//! # Examples
//!
//! ## Render a README in place
//!
//! ```no_run
//! use mpkg_package::render::{render, RenderRequest};
//! use camino::Utf8Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let request = RenderRequest::new(Utf8Path::new("/tmp/my-package"))
//!     .with_target("README.md")
//!     .with_data("master.json");
//! let report = render(&request)?;
//! println!("rendered {}", report.target);
//! # Ok(())
//! # }
//! ```
//!
//! ## Render a string
//!
//! ```
//! use mpkg_package::templates::{Context, Language, TemplateEngine};
//! use serde_json::json;
//!
//! let context = Context::from_value(json!({ "package": { "name": "demo" } })).unwrap();
//!
//! let slots = TemplateEngine::comment_slots(Language::Readme);
//! let pass_a = slots.render("# <!-- {{ package.name }} -->", &context);
//! assert_eq!(pass_a.text, "# demo");
//!
//! let inline = TemplateEngine::inline();
//! assert_eq!(inline.render("v{{ version | 0.0.0 }}", &context).text, "v0.0.0");
//! ```

pub mod data;
pub mod error;
pub mod manifest;
pub mod render;
pub mod templates;

pub use error::{Error, Result};

pub use data::DataFormat;
pub use manifest::Manifest;
pub use render::{render, RenderReport, RenderRequest};
pub use templates::{Context, Document, EngineConfig, Language, SlotMode, TemplateEngine};
