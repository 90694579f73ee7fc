//! Render pipeline behind `mpkg package render`.
//!
//! 1. Check the data file extension (nothing is read before this)
//! 2. Load the target document; its extension picks the comment syntax
//! 3. Load the manifest (`src/package.json`)
//! 4. Load the data file into a context. Data scripts are rendered against
//!    their own values plus the manifest first, then evaluated again, so a
//!    field may reference `{{ package.name }}`
//! 5. Render the target: comment slots first, then inline slots
//! 6. Overwrite the target, once, at the very end
//!
//! Any failure before step 6 leaves the target untouched.

use crate::data::{script, DataFormat, DEFAULT_DATA_FILE};
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::templates::{Context, Document, Language, TemplateEngine};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Target rendered when none is given
pub const DEFAULT_TARGET_FILE: &str = "README.md";

/// What to render, relative to which package root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Package root; relative target and data paths resolve against it
    pub working_dir: Utf8PathBuf,
    pub target: Utf8PathBuf,
    pub data: Utf8PathBuf,
}

impl RenderRequest {
    /// Request with the default target (`README.md`) and data (`master.json`)
    pub fn new(working_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            target: Utf8PathBuf::from(DEFAULT_TARGET_FILE),
            data: Utf8PathBuf::from(DEFAULT_DATA_FILE),
        }
    }

    pub fn with_target(mut self, target: impl Into<Utf8PathBuf>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_data(mut self, data: impl Into<Utf8PathBuf>) -> Self {
        self.data = data.into();
        self
    }

    pub fn target_path(&self) -> Utf8PathBuf {
        self.working_dir.join(&self.target)
    }

    pub fn data_path(&self) -> Utf8PathBuf {
        self.working_dir.join(&self.data)
    }

    fn validate(&self) -> Result<()> {
        if self.target.as_str().trim().is_empty() {
            return Err(Error::missing_argument("target file"));
        }
        if self.data.as_str().trim().is_empty() {
            return Err(Error::missing_argument("data file"));
        }
        Ok(())
    }
}

/// Summary of a completed render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    pub target: Utf8PathBuf,
    pub language: Language,
    pub comment_substitutions: usize,
    pub inline_substitutions: usize,
}

impl RenderReport {
    pub fn substitutions(&self) -> usize {
        self.comment_substitutions + self.inline_substitutions
    }
}

/// Target text after both passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub text: String,
    pub comment_substitutions: usize,
    pub inline_substitutions: usize,
}

/// Render the request's target in place
///
/// # Errors
/// - [`Error::MissingArgument`] if the target or data path is empty
/// - [`Error::UnsupportedFormat`] if the data file is not `.js`/`.json`
/// - [`Error::ReadFailure`] if the target, manifest or data file is unreadable
/// - [`Error::InvalidManifest`], [`Error::InvalidData`],
///   [`Error::EvaluationFailure`] for unusable content
/// - [`Error::WriteFailure`] if the result cannot be written
pub fn render(request: &RenderRequest) -> Result<RenderReport> {
    request.validate()?;

    let data_path = request.data_path();
    let format = DataFormat::from_path(&data_path)?;

    let target_path = request.target_path();
    info!("Loading target: {}", target_path);
    let target = Document::load(&target_path)?;
    debug!("Target language: {}", target.language());

    let manifest = Manifest::load(&request.working_dir)?;
    info!("Loaded manifest for package: {}", manifest.name());

    info!("Loading data: {} ({})", data_path, format);
    let data_text =
        std::fs::read_to_string(&data_path).map_err(|e| Error::read_failure(&data_path, e))?;
    let context = build_context(format, &data_path, &data_text, &manifest.to_value())?;

    let rendered = render_document(&target, &context);

    std::fs::write(&target_path, &rendered.text)
        .map_err(|e| Error::write_failure(&target_path, e))?;
    info!("Rendered {}", target_path);

    Ok(RenderReport {
        target: target_path,
        language: target.language(),
        comment_substitutions: rendered.comment_substitutions,
        inline_substitutions: rendered.inline_substitutions,
    })
}

/// Turn data file text into the final render context
///
/// The manifest always ends up under `package`, replacing any `package` key
/// the data defined. Data scripts are rendered (inline slots only) against
/// their first evaluation plus the manifest, and the rendered text is what
/// gets evaluated for the final context. Substituted values are escaped for
/// a string literal, so quotes and backslashes in the manifest survive.
pub fn build_context(
    format: DataFormat,
    data_path: &Utf8Path,
    data_text: &str,
    manifest: &Value,
) -> Result<Context> {
    let mut context = format.evaluate(data_path, data_text)?;
    context.merge_package(manifest.clone());

    if !format.is_self_templated() {
        return Ok(context);
    }

    let rendered = TemplateEngine::inline().render_escaped(
        data_text,
        &context,
        script::escape_string_content,
    );
    debug!(
        "Self-rendered {}: {} substitution(s)",
        data_path, rendered.substitutions
    );

    let mut context = format.evaluate(data_path, &rendered.text)?;
    context.merge_package(manifest.clone());
    Ok(context)
}

/// Render a document with both passes: comment slots, then inline slots
pub fn render_document(document: &Document, context: &Context) -> RenderedDocument {
    let comment_pass =
        TemplateEngine::comment_slots(document.language()).render(document.text(), context);
    debug!(
        "Comment-slot pass ({}): {} substitution(s)",
        document.language(),
        comment_pass.substitutions
    );

    let inline_pass = TemplateEngine::inline().render(&comment_pass.text, context);
    debug!("Inline pass: {} substitution(s)", inline_pass.substitutions);

    RenderedDocument {
        text: inline_pass.text,
        comment_substitutions: comment_pass.substitutions,
        inline_substitutions: inline_pass.substitutions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults() {
        let request = RenderRequest::new("/work/pkg");

        assert_eq!(request.target_path(), Utf8PathBuf::from("/work/pkg/README.md"));
        assert_eq!(request.data_path(), Utf8PathBuf::from("/work/pkg/master.json"));
    }

    #[test]
    fn test_request_absolute_paths_win() {
        let request = RenderRequest::new("/work/pkg")
            .with_target("/elsewhere/index.html")
            .with_data("data/master.js");

        assert_eq!(request.target_path(), Utf8PathBuf::from("/elsewhere/index.html"));
        assert_eq!(request.data_path(), Utf8PathBuf::from("/work/pkg/data/master.js"));
    }

    #[test]
    fn test_empty_arguments_are_missing() {
        let err = render(&RenderRequest::new("/work/pkg").with_target("")).unwrap_err();
        assert!(matches!(err, Error::MissingArgument { .. }));

        let err = render(&RenderRequest::new("/work/pkg").with_data(" ")).unwrap_err();
        assert!(matches!(err, Error::MissingArgument { .. }));
    }

    #[test]
    fn test_unsupported_format_fails_before_reading() {
        // Nothing exists under this root; the format check must fire first
        let request = RenderRequest::new("/nonexistent/pkg").with_data("master.yaml");
        let err = render(&request).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_build_context_json_is_not_self_rendered() {
        let ctx = build_context(
            DataFormat::Json,
            Utf8Path::new("master.json"),
            r#"{"title": "{{package.name}}"}"#,
            &json!({ "name": "demo" }),
        )
        .unwrap();

        assert_eq!(ctx.get("title"), Some(&json!("{{package.name}}")));
        assert_eq!(ctx.get("package"), Some(&json!({ "name": "demo" })));
    }

    #[test]
    fn test_build_context_script_is_self_rendered() {
        let ctx = build_context(
            DataFormat::Script,
            Utf8Path::new("master.js"),
            r#"({ name: "{{package.name}}" })"#,
            &json!({ "name": "demo" }),
        )
        .unwrap();

        assert_eq!(
            ctx.into_value(),
            json!({ "name": "demo", "package": { "name": "demo" } })
        );
    }

    #[test]
    fn test_build_context_script_can_reference_own_fields() {
        let ctx = build_context(
            DataFormat::Script,
            Utf8Path::new("master.js"),
            r#"({ org: "master-style", url: "https://github.com/{{ org }}/{{ package.name }}" })"#,
            &json!({ "name": "demo" }),
        )
        .unwrap();

        assert_eq!(
            ctx.get("url"),
            Some(&json!("https://github.com/master-style/demo"))
        );
    }

    #[test]
    fn test_build_context_script_keeps_quotes_and_backslashes() {
        let manifest = json!({
            "name": "demo",
            "description": r#"Run "m" in C:\tools"#,
            "bin": "C:\\tools\\new",
        });

        let ctx = build_context(
            DataFormat::Script,
            Utf8Path::new("master.js"),
            r#"({ about: "{{ package.description }}", bin: '{{ package.bin }}' })"#,
            &manifest,
        )
        .unwrap();

        assert_eq!(ctx.get("about"), Some(&json!(r#"Run "m" in C:\tools"#)));
        assert_eq!(ctx.get("bin"), Some(&json!("C:\\tools\\new")));
    }

    #[test]
    fn test_build_context_manifest_replaces_data_package() {
        let ctx = build_context(
            DataFormat::Json,
            Utf8Path::new("master.json"),
            r#"{"name": "data-name", "package": {"name": "old", "extra": true}}"#,
            &json!({ "name": "demo" }),
        )
        .unwrap();

        assert_eq!(ctx.get("name"), Some(&json!("data-name")));
        assert_eq!(ctx.get("package"), Some(&json!({ "name": "demo" })));
    }

    #[test]
    fn test_render_document_two_passes() {
        let ctx = Context::from_value(json!({ "x": "5", "tpl": "{{x}}" })).unwrap();
        let document = Document::new("<!-- {{ tpl }} --> / {{x}}", Language::Html);

        let rendered = render_document(&document, &ctx);

        assert_eq!(rendered.text, "5 / 5");
        assert_eq!(rendered.comment_substitutions, 1);
        assert_eq!(rendered.inline_substitutions, 2);
    }

    #[test]
    fn test_render_document_plain_language_skips_comment_pass() {
        let ctx = Context::from_value(json!({ "x": "5" })).unwrap();
        let document = Document::new("<!-- {{ x }} -->", Language::Plain);

        let rendered = render_document(&document, &ctx);

        assert_eq!(rendered.text, "<!-- 5 -->");
        assert_eq!(rendered.comment_substitutions, 0);
        assert_eq!(rendered.inline_substitutions, 1);
    }
}
