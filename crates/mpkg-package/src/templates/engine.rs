//! Slot substitution engine.
//!
//! A slot is `{{ path }}` or `{{ path | default }}`. In inline mode the bare
//! markers are matched anywhere. In comment-slot mode the markers must be
//! wrapped in the target language's comment tokens (`<!-- {{ path }} -->`)
//! and the whole comment is replaced.
//!
//! Scanning is a single left-to-right pass over the source: substituted text
//! is never rescanned, so values containing markers come out literally.

use super::context::{stringify, Context};
use super::language::{CommentSyntax, Language};
use regex::Regex;
use std::sync::LazyLock;

/// Opening slot marker
pub const OPEN_MARKER: &str = "{{";

/// Closing slot marker
pub const CLOSE_MARKER: &str = "}}";

/// Separates a slot path from its default value
pub const DEFAULT_SEPARATOR: char = '|';

static PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_$-]+(?:\.[A-Za-z0-9_$-]+)*$").expect("slot path pattern is valid")
});

/// Which delimiters a pass matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotMode {
    /// Bare `{{ }}` markers
    #[default]
    Inline,
    /// `{{ }}` wrapped in the language's comment tokens
    Comment,
}

/// Engine configuration for one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub mode: SlotMode,
    pub language: Language,
}

impl EngineConfig {
    pub fn inline() -> Self {
        Self::default()
    }

    pub fn comment(language: Language) -> Self {
        Self {
            mode: SlotMode::Comment,
            language,
        }
    }
}

/// Output of one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Number of slots replaced
    pub substitutions: usize,
}

/// A parsed slot expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotExpr<'a> {
    pub path: &'a str,
    pub default: Option<&'a str>,
}

impl<'a> SlotExpr<'a> {
    /// Parse the text between the markers; `None` if it is not a valid slot
    pub fn parse(raw: &'a str) -> Option<Self> {
        let (path, default) = match raw.split_once(DEFAULT_SEPARATOR) {
            Some((path, default)) => (path.trim(), Some(unquote(default.trim()))),
            None => (raw.trim(), None),
        };

        PATH_PATTERN
            .is_match(path)
            .then_some(Self { path, default })
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Delimiters active for one pass
#[derive(Debug, Clone, Copy)]
enum Delimiters {
    Inline,
    Comment(&'static CommentSyntax),
}

impl Delimiters {
    /// If an opening delimiter starts exactly at `pos`, the index after it
    fn open_at(self, text: &str, pos: usize) -> Option<usize> {
        let rest = &text[pos..];
        match self {
            Self::Inline => rest.starts_with(OPEN_MARKER).then(|| pos + OPEN_MARKER.len()),
            Self::Comment(syntax) => {
                let after_comment = rest.strip_prefix(syntax.open)?;
                let after_ws = after_comment.trim_start();
                after_ws
                    .starts_with(OPEN_MARKER)
                    .then(|| text.len() - after_ws.len() + OPEN_MARKER.len())
            }
        }
    }

    /// First opening delimiter at or after `from` and before `until`: (start, end)
    fn find_open(self, text: &str, from: usize, until: usize) -> Option<(usize, usize)> {
        let needle = match self {
            Self::Inline => OPEN_MARKER,
            Self::Comment(syntax) => syntax.open,
        };

        let mut cursor = from;
        while cursor < until {
            let start = cursor + text[cursor..until].find(needle)?;
            if let Some(end) = self.open_at(text, start) {
                return Some((start, end));
            }
            // Tokens are ASCII, so the next byte is a char boundary
            cursor = start + 1;
        }
        None
    }

    /// First closing delimiter at or after `from`: (start, end)
    fn find_close(self, text: &str, from: usize) -> Option<(usize, usize)> {
        let mut cursor = from;
        loop {
            let start = cursor + text[cursor..].find(CLOSE_MARKER)?;
            let after_marker = start + CLOSE_MARKER.len();
            match self {
                Self::Inline => return Some((start, after_marker)),
                Self::Comment(syntax) => {
                    let rest = text[after_marker..].trim_start();
                    if rest.starts_with(syntax.close) {
                        let end = text.len() - rest.len() + syntax.close.len();
                        return Some((start, end));
                    }
                    cursor = start + 1;
                }
            }
        }
    }
}

/// Stateless slot substitution engine
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine {
    config: EngineConfig,
}

impl TemplateEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine matching bare `{{ }}` slots
    pub fn inline() -> Self {
        Self::new(EngineConfig::inline())
    }

    /// Engine matching comment-wrapped slots for `language`
    pub fn comment_slots(language: Language) -> Self {
        Self::new(EngineConfig::comment(language))
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Replace every well-formed slot in `source` with its value from `context`.
    ///
    /// Malformed slots and unterminated markers are kept as literal text.
    /// Missing paths resolve to the slot's default, else to "". In comment
    /// mode for a language without comment syntax the source is returned
    /// unchanged.
    pub fn render(&self, source: &str, context: &Context) -> Rendered {
        self.render_escaped(source, context, str::to_string)
    }

    /// Like [`render`](Self::render), but every value found in `context`
    /// goes through `escape` before it is spliced in.
    ///
    /// Defaults are taken verbatim: they are already text of the source.
    pub fn render_escaped<F>(&self, source: &str, context: &Context, escape: F) -> Rendered
    where
        F: Fn(&str) -> String,
    {
        let delimiters = match self.config.mode {
            SlotMode::Inline => Delimiters::Inline,
            SlotMode::Comment => match self.config.language.comment_syntax() {
                Some(syntax) => Delimiters::Comment(syntax),
                None => return unchanged(source),
            },
        };

        let mut output = String::with_capacity(source.len());
        let mut substitutions = 0;
        let mut copied = 0;
        let mut cursor = 0;
        // Last close found; still the first close for any search starting
        // at or before its start
        let mut next_close: Option<(usize, usize)> = None;

        while let Some((start, body_start)) = delimiters.find_open(source, cursor, source.len()) {
            let close = match next_close {
                Some(close) if close.0 >= body_start => close,
                _ => match delimiters.find_close(source, body_start) {
                    Some(close) => close,
                    // Unterminated: everything from here on is literal
                    None => break,
                },
            };
            next_close = Some(close);
            let (body_end, end) = close;

            // Slots do not nest; a later opener wins
            if let Some((inner, _)) = delimiters.find_open(source, start + 1, body_end) {
                cursor = inner;
                continue;
            }

            match SlotExpr::parse(&source[body_start..body_end]) {
                Some(slot) => {
                    output.push_str(&source[copied..start]);
                    match context.resolve(slot.path) {
                        Some(value) => output.push_str(&escape(&stringify(value))),
                        None => output.push_str(slot.default.unwrap_or_default()),
                    }
                    substitutions += 1;
                    copied = end;
                    cursor = end;
                }
                None => cursor = start + 1,
            }
        }

        if substitutions == 0 {
            return unchanged(source);
        }

        output.push_str(&source[copied..]);
        Rendered {
            text: output,
            substitutions,
        }
    }
}

fn unchanged(source: &str) -> Rendered {
    Rendered {
        text: source.to_string(),
        substitutions: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn context(value: Value) -> Context {
        Context::from_value(value).unwrap()
    }

    fn inline(source: &str, ctx: &Context) -> String {
        TemplateEngine::inline().render(source, ctx).text
    }

    fn slots(language: Language, source: &str, ctx: &Context) -> String {
        TemplateEngine::comment_slots(language).render(source, ctx).text
    }

    #[test]
    fn test_slot_expr_parse() {
        assert_eq!(
            SlotExpr::parse(" package.name "),
            Some(SlotExpr {
                path: "package.name",
                default: None
            })
        );
        assert_eq!(
            SlotExpr::parse("version | 0.0.0"),
            Some(SlotExpr {
                path: "version",
                default: Some("0.0.0")
            })
        );
        assert_eq!(
            SlotExpr::parse("title|\" spaced \""),
            Some(SlotExpr {
                path: "title",
                default: Some(" spaced ")
            })
        );
        assert_eq!(
            SlotExpr::parse("title|''"),
            Some(SlotExpr {
                path: "title",
                default: Some("")
            })
        );
    }

    #[test]
    fn test_slot_expr_rejects_bad_paths() {
        assert_eq!(SlotExpr::parse(""), None);
        assert_eq!(SlotExpr::parse("   "), None);
        assert_eq!(SlotExpr::parse("a b"), None);
        assert_eq!(SlotExpr::parse("a..b"), None);
        assert_eq!(SlotExpr::parse(".a"), None);
        assert_eq!(SlotExpr::parse("fn()"), None);
    }

    #[test]
    fn test_empty_document_unchanged() {
        let ctx = context(json!({ "x": 1 }));
        assert_eq!(inline("", &ctx), "");
        assert_eq!(slots(Language::Html, "", &ctx), "");
    }

    #[test]
    fn test_document_without_slots_is_identity() {
        let ctx = context(json!({ "x": 1 }));
        let source = "# Title\n\nSome { braces } and <!-- a comment -->\n";

        let rendered = TemplateEngine::inline().render(source, &ctx);
        assert_eq!(rendered.text, source);
        assert_eq!(rendered.substitutions, 0);

        let rendered = TemplateEngine::comment_slots(Language::Readme).render(source, &ctx);
        assert_eq!(rendered.text, source);
        assert_eq!(rendered.substitutions, 0);
    }

    #[test]
    fn test_inline_substitution() {
        let ctx = context(json!({
            "package": { "name": "@master/demo", "version": 3 }
        }));

        let rendered = TemplateEngine::inline()
            .render("{{package.name}} v{{ package.version }}", &ctx);

        assert_eq!(rendered.text, "@master/demo v3");
        assert_eq!(rendered.substitutions, 2);
    }

    #[test]
    fn test_missing_key_without_default_is_empty() {
        let ctx = context(json!({ "a": { "b": {} } }));
        assert_eq!(inline("[{{ a.b.c }}]", &ctx), "[]");
    }

    #[test]
    fn test_missing_key_uses_default() {
        let ctx = context(json!({ "a": { "b": {} } }));
        assert_eq!(inline("[{{ a.b.c | X }}]", &ctx), "[X]");
    }

    #[test]
    fn test_present_key_ignores_default() {
        let ctx = context(json!({ "license": "Apache-2.0" }));
        assert_eq!(inline("{{ license | MIT }}", &ctx), "Apache-2.0");
    }

    #[test]
    fn test_unterminated_slot_is_literal() {
        let ctx = context(json!({ "a": "A", "b": "B" }));
        assert_eq!(inline("{{a}} then {{ b", &ctx), "A then {{ b");
        assert_eq!(inline("{{ b", &ctx), "{{ b");
    }

    #[test]
    fn test_malformed_slot_is_literal() {
        let ctx = context(json!({ "a": "A" }));
        assert_eq!(inline("{{ not a path }} {{a}}", &ctx), "{{ not a path }} A");
        assert_eq!(inline("{{}}", &ctx), "{{}}");
    }

    #[test]
    fn test_nested_open_restarts_at_inner_marker() {
        let ctx = context(json!({ "b": "B" }));
        assert_eq!(inline("{{ a {{ b }}", &ctx), "{{ a B");
    }

    #[test]
    fn test_extra_braces_stay_literal() {
        let ctx = context(json!({ "x": "X" }));
        assert_eq!(inline("{{{x}}}", &ctx), "{X}");
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        let ctx = context(json!({ "a": "{{b}}", "b": "B" }));
        assert_eq!(inline("{{a}}", &ctx), "{{b}}");
    }

    #[test]
    fn test_inline_pass_is_idempotent() {
        let ctx = context(json!({ "name": "demo", "n": 2 }));
        let once = inline("{{name}} has {{n}} parts, {{missing|none}}", &ctx);
        let twice = inline(&once, &ctx);

        assert_eq!(once, "demo has 2 parts, none");
        assert_eq!(twice, once);
    }

    #[test]
    fn test_comment_slot_replaces_whole_comment() {
        let ctx = context(json!({ "package": { "name": "demo" } }));

        assert_eq!(
            slots(Language::Html, "<h1><!-- {{ package.name }} --></h1>", &ctx),
            "<h1>demo</h1>"
        );
        assert_eq!(
            slots(Language::Readme, "# <!--{{package.name}}-->", &ctx),
            "# demo"
        );
        assert_eq!(
            slots(Language::Haskell, "name = \"{- {{ package.name }} -}\"", &ctx),
            "name = \"demo\""
        );
        assert_eq!(
            slots(Language::Pascal, "program (* {{ package.name }} *);", &ctx),
            "program demo;"
        );
        assert_eq!(
            slots(Language::Forth, ": name ( {{ package.name }} ) ;", &ctx),
            ": name demo ;"
        );
    }

    #[test]
    fn test_comment_mode_ignores_bare_slots() {
        let ctx = context(json!({ "x": "5" }));
        let source = "{{x}} and <!-- plain comment -->";

        let rendered = TemplateEngine::comment_slots(Language::Html).render(source, &ctx);
        assert_eq!(rendered.text, source);
        assert_eq!(rendered.substitutions, 0);
    }

    #[test]
    fn test_inline_mode_ignores_comment_tokens() {
        let ctx = context(json!({ "x": "5" }));
        assert_eq!(inline("<!-- {{x}} -->", &ctx), "<!-- 5 -->");
    }

    #[test]
    fn test_comment_mode_other_language_tokens_untouched() {
        let ctx = context(json!({ "x": "5" }));
        let source = "{- {{x}} -} (* {{x}} *)";
        assert_eq!(slots(Language::Html, source, &ctx), source);
    }

    #[test]
    fn test_unknown_language_comment_mode_is_noop() {
        let ctx = context(json!({ "x": "5" }));
        let source = "<!-- {{x}} --> {{x}}";

        let rendered = TemplateEngine::comment_slots(Language::Plain).render(source, &ctx);
        assert_eq!(rendered.text, source);
        assert_eq!(rendered.substitutions, 0);
    }

    #[test]
    fn test_comment_slot_without_closing_comment_is_literal() {
        let ctx = context(json!({ "x": "5" }));
        let source = "<!-- {{x}} and more text";
        assert_eq!(slots(Language::Html, source, &ctx), source);
    }

    #[test]
    fn test_comment_slot_default() {
        let ctx = context(json!({}));
        assert_eq!(
            slots(Language::Readme, "<!-- {{ package.description | TBD }} -->", &ctx),
            "TBD"
        );
    }

    #[test]
    fn test_two_pass_ordering() {
        let ctx = context(json!({ "x": "5", "tpl": "{{x}}" }));
        let source = "A: <!-- {{ tpl }} -->, B: {{x}}";

        let pass_a = slots(Language::Html, source, &ctx);
        assert_eq!(pass_a, "A: {{x}}, B: {{x}}");

        let pass_b = inline(&pass_a, &ctx);
        assert_eq!(pass_b, "A: 5, B: 5");
        assert!(!pass_b.contains("{{x}}"));
    }

    #[test]
    fn test_multibyte_text_is_preserved() {
        let ctx = context(json!({ "name": "套件" }));
        assert_eq!(
            inline("名稱：{{name}} ✓ {{ 壞", &ctx),
            "名稱：套件 ✓ {{ 壞"
        );
    }

    #[test]
    fn test_render_escaped_only_touches_resolved_values() {
        let ctx = context(json!({ "quote": "say \"hi\"" }));
        let engine = TemplateEngine::inline();

        let rendered = engine.render_escaped(
            "{{ quote }} / {{ missing | \"raw\" }}",
            &ctx,
            |value| value.replace('"', "\\\""),
        );

        assert_eq!(rendered.text, r#"say \"hi\" / raw"#);
        assert_eq!(rendered.substitutions, 2);
    }

    #[test]
    fn test_long_opener_chain_resolves_last_slot() {
        let ctx = context(json!({ "x": "1" }));
        let openers = "{{ ".repeat(5_000);
        let source = format!("{}x }}}} {{{{ x }}}}", openers);

        let rendered = TemplateEngine::inline().render(&source, &ctx);

        assert_eq!(rendered.text, format!("{}1 1", "{{ ".repeat(4_999)));
        assert_eq!(rendered.substitutions, 2);
    }

    #[test]
    fn test_long_comment_opener_chain_without_close() {
        let ctx = context(json!({ "x": "1" }));
        let source = format!("{}x }}}}", "<!-- {{ ".repeat(5_000));

        let rendered = TemplateEngine::comment_slots(Language::Html).render(&source, &ctx);

        assert_eq!(rendered.substitutions, 0);
        assert_eq!(rendered.text, source);
    }
}
