//! Two-pass markdown pipeline.
//!
//! 1. **Parse** ([`MarkdownPipeline::parse`]): maps out the inline text of the
//!    source with a first pulldown-cmark pass, offers marker characters in it
//!    to the inline rules, swaps every recognized span for an intermediate
//!    `<rw-inline>` element and runs the core rules once the whole document
//!    has been scanned. A span may continue over soft line breaks up to the
//!    end of its paragraph, heading, table cell or list item.
//!
//! 2. **Render** ([`MarkdownPipeline::render`]): renders the rewritten source
//!    with pulldown-cmark and replaces each intermediate element with the HTML
//!    of its token.
//!
//! Intermediate elements are raw inline HTML to pulldown-cmark, so they pass
//! through paragraphs, emphasis and tables unchanged.

use std::fmt::Write;
use std::sync::LazyLock;

use pulldown_cmark::{Options, Parser};
use regex::{Captures, Regex};

use crate::directive::{DirectiveRule, InlineDirective};
use crate::scan::text_runs;
use crate::{
    CoreRule, InlineRule, InlineToken, Recognized, RenderEnv, RenderError, TokenRenderer,
    escape_html,
};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<rw-inline data-token="(\d+)"></rw-inline>"#).unwrap());

/// Output of the parse pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    source: String,
    tokens: Vec<InlineToken>,
}

impl ParsedDocument {
    /// Source with recognized spans replaced by intermediate elements.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Tokens in document order; the index is the `data-token` value.
    #[must_use]
    pub fn tokens(&self) -> &[InlineToken] {
        &self.tokens
    }
}

/// Markdown pipeline with pluggable inline rules, renderers and core rules.
///
/// # Example
///
/// ```
/// use rw_renderer::{MarkdownPipeline, RenderEnv};
///
/// let mut pipeline = MarkdownPipeline::new();
/// let html = pipeline.process("Hello, *world*!", &mut RenderEnv::new()).unwrap();
/// assert_eq!(html, "<p>Hello, <em>world</em>!</p>\n");
/// ```
pub struct MarkdownPipeline {
    rules: Vec<Box<dyn InlineRule>>,
    directives: DirectiveRule,
    renderers: Vec<Box<dyn TokenRenderer>>,
    core_rules: Vec<Box<dyn CoreRule>>,
    gfm: bool,
}

impl Default for MarkdownPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownPipeline {
    /// Create a pipeline with GFM enabled and no extensions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            directives: DirectiveRule::new(),
            renderers: Vec::new(),
            core_rules: Vec::new(),
            gfm: true,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports tables,
    /// strikethrough and task lists.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Add an inline rule. Rules are tried in registration order.
    #[must_use]
    pub fn with_rule<R: InlineRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Register a handler for the `:name[...]` directive syntax.
    ///
    /// Directives are tried after the plain inline rules.
    #[must_use]
    pub fn with_inline_directive<D: InlineDirective + 'static>(mut self, handler: D) -> Self {
        self.directives.register(Box::new(handler));
        self
    }

    /// Add a token renderer, replacing any earlier one for the same kind.
    #[must_use]
    pub fn with_renderer<R: TokenRenderer + 'static>(mut self, renderer: R) -> Self {
        self.renderers.retain(|r| r.kind() != renderer.kind());
        self.renderers.push(Box::new(renderer));
        self
    }

    /// Add a rule run at the end of every parse pass.
    #[must_use]
    pub fn with_core_rule<C: CoreRule + 'static>(mut self, rule: C) -> Self {
        self.core_rules.push(Box::new(rule));
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
        } else {
            Options::empty()
        }
    }

    /// Run the parse pass: recognize inline tokens, then run core rules.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a core rule. Inline recognition itself
    /// cannot fail.
    pub fn parse(
        &mut self,
        markdown: &str,
        env: &mut RenderEnv,
    ) -> Result<ParsedDocument, RenderError> {
        let mut doc = ParsedDocument {
            source: String::with_capacity(markdown.len()),
            tokens: Vec::new(),
        };
        let mut copied = 0;

        for run in text_runs(markdown, self.parser_options()) {
            let src = &markdown[..run.bound];
            let mut pos = run.range.start.max(copied);

            while pos < run.range.end {
                let Some(c) = src[pos..].chars().next() else {
                    break;
                };

                match self.recognize(c, src, pos, env) {
                    Some(recognized) => {
                        tracing::debug!(
                            kind = recognized.token.kind,
                            offset = pos,
                            "Recognized inline token"
                        );
                        doc.source.push_str(&markdown[copied..pos]);
                        write!(
                            doc.source,
                            r#"<rw-inline data-token="{}"></rw-inline>"#,
                            doc.tokens.len()
                        )
                        .unwrap();
                        doc.tokens.push(recognized.token);
                        pos += recognized.consumed;
                        copied = pos;
                    }
                    None => pos += c.len_utf8(),
                }
            }
        }
        doc.source.push_str(&markdown[copied..]);

        for rule in &mut self.core_rules {
            tracing::debug!(rule = rule.name(), "Running core rule");
            rule.run(env)?;
        }

        Ok(doc)
    }

    /// Run the render pass over a parsed document.
    ///
    /// Tokens without a registered renderer fall back to their escaped content.
    #[must_use]
    pub fn render(&self, doc: &ParsedDocument) -> String {
        let mut html = String::with_capacity(doc.source.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, Parser::new_ext(&doc.source, self.parser_options()));

        if doc.tokens.is_empty() {
            return html;
        }

        PLACEHOLDER_RE
            .replace_all(&html, |caps: &Captures<'_>| {
                let token = caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| doc.tokens.get(index));
                match token {
                    Some(token) => self.render_token(token),
                    None => {
                        tracing::warn!(placeholder = &caps[0], "Dangling inline token placeholder");
                        caps[0].to_owned()
                    }
                }
            })
            .into_owned()
    }

    /// Parse and render a document in one call.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a core rule.
    pub fn process(&mut self, markdown: &str, env: &mut RenderEnv) -> Result<String, RenderError> {
        let doc = self.parse(markdown, env)?;
        Ok(self.render(&doc))
    }

    fn render_token(&self, token: &InlineToken) -> String {
        if let Some(renderer) = self.renderers.iter().find(|r| r.kind() == token.kind) {
            renderer.render(token)
        } else {
            tracing::warn!(kind = token.kind, "No renderer registered for inline token");
            escape_html(&token.content)
        }
    }

    fn recognize(
        &self,
        marker: char,
        src: &str,
        pos: usize,
        env: &mut RenderEnv,
    ) -> Option<Recognized> {
        for rule in &self.rules {
            if rule.marker() == marker
                && let Some(recognized) = rule.try_recognize(src, pos, env)
                && recognized.consumed > 0
            {
                return Some(recognized);
            }
        }

        if !self.directives.is_empty() && self.directives.marker() == marker {
            return self
                .directives
                .try_recognize(src, pos, env)
                .filter(|recognized| recognized.consumed > 0);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Recognizes `@@word` mentions.
    struct MentionRule;

    impl InlineRule for MentionRule {
        fn name(&self) -> &'static str {
            "mention"
        }

        fn marker(&self) -> char {
            '@'
        }

        fn try_recognize(&self, src: &str, pos: usize, env: &mut RenderEnv) -> Option<Recognized> {
            let rest = src[pos..].strip_prefix("@@")?;
            let len = rest
                .find(|c: char| !c.is_alphanumeric())
                .unwrap_or(rest.len());
            if len == 0 {
                return None;
            }

            let mut token = InlineToken::new("mention", "@@");
            token.content = rest[..len].to_owned();
            env.set_flag("mention");
            Some(Recognized {
                token,
                consumed: 2 + len,
            })
        }
    }

    /// Recognizes `<<...>>`, which may wrap over lines.
    struct SpanRule;

    impl InlineRule for SpanRule {
        fn name(&self) -> &'static str {
            "span"
        }

        fn marker(&self) -> char {
            '<'
        }

        fn try_recognize(&self, src: &str, pos: usize, _env: &mut RenderEnv) -> Option<Recognized> {
            let rest = src[pos..].strip_prefix("<<")?;
            let end = rest.find(">>")?;

            let mut token = InlineToken::new("span", "<<");
            token.content = rest[..end].to_owned();
            Some(Recognized {
                token,
                consumed: end + 4,
            })
        }
    }

    struct MentionRenderer;

    impl TokenRenderer for MentionRenderer {
        fn kind(&self) -> &'static str {
            "mention"
        }

        fn render(&self, token: &InlineToken) -> String {
            format!(r#"<span class="mention">{}</span>"#, escape_html(&token.content))
        }
    }

    struct CountMentions;

    impl CoreRule for CountMentions {
        fn name(&self) -> &'static str {
            "count_mentions"
        }

        fn run(&mut self, env: &mut RenderEnv) -> Result<(), RenderError> {
            if env.has_flag("mention") {
                env.meta_mut()
                    .style
                    .get_or_insert_with(Vec::new)
                    .push("mention.css".to_owned());
            }
            Ok(())
        }
    }

    struct FailingRule;

    impl CoreRule for FailingRule {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn run(&mut self, _env: &mut RenderEnv) -> Result<(), RenderError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }
    }

    fn pipeline() -> MarkdownPipeline {
        MarkdownPipeline::new()
            .with_rule(MentionRule)
            .with_renderer(MentionRenderer)
            .with_core_rule(CountMentions)
    }

    fn render(markdown: &str) -> String {
        pipeline().process(markdown, &mut RenderEnv::new()).unwrap()
    }

    #[test]
    fn test_plain_paragraph() {
        assert_eq!(render("Hello, world!"), "<p>Hello, world!</p>\n");
    }

    #[test]
    fn test_rule_inside_paragraph() {
        assert_eq!(
            render("ping @@alice please"),
            "<p>ping <span class=\"mention\">alice</span> please</p>\n"
        );
    }

    #[test]
    fn test_rule_at_line_start() {
        assert_eq!(
            render("@@bob"),
            "<p><span class=\"mention\">bob</span></p>\n"
        );
    }

    #[test]
    fn test_rule_inside_emphasis() {
        assert_eq!(
            render("*@@carol*"),
            "<p><em><span class=\"mention\">carol</span></em></p>\n"
        );
    }

    #[test]
    fn test_declined_match_stays_text() {
        assert_eq!(render("email@@ me"), "<p>email@@ me</p>\n");
    }

    #[test]
    fn test_code_span_is_skipped() {
        assert_eq!(
            render("`@@alice` and @@bob"),
            "<p><code>@@alice</code> and <span class=\"mention\">bob</span></p>\n"
        );
    }

    #[test]
    fn test_unclosed_backticks_are_text() {
        assert_eq!(
            render("`` @@alice"),
            "<p>`` <span class=\"mention\">alice</span></p>\n"
        );
    }

    #[test]
    fn test_fenced_code_is_skipped() {
        let html = render("```\n@@alice\n```\n\n@@bob");
        assert_eq!(
            html,
            "<pre><code>@@alice\n</code></pre>\n<p><span class=\"mention\">bob</span></p>\n"
        );
    }

    #[test]
    fn test_indented_code_is_skipped() {
        let mut env = RenderEnv::new();
        let html = pipeline().process("para\n\n    @@alice\n", &mut env).unwrap();

        assert_eq!(html, "<p>para</p>\n<pre><code>@@alice\n</code></pre>\n");
        assert!(env.meta.is_none());
    }

    #[test]
    fn test_escaped_marker_is_literal() {
        let mut env = RenderEnv::new();
        let html = pipeline().process("\\@@alice and @@bob", &mut env).unwrap();

        assert_eq!(
            html,
            "<p>@@alice and <span class=\"mention\">bob</span></p>\n"
        );
    }

    #[test]
    fn test_html_block_is_skipped() {
        let mut env = RenderEnv::new();
        let html = pipeline()
            .process("<div>\n@@alice\n</div>\n", &mut env)
            .unwrap();

        assert_eq!(html, "<div>\n@@alice\n</div>\n");
        assert!(env.meta.is_none());
    }

    #[test]
    fn test_inline_html_is_skipped() {
        assert_eq!(
            render(r#"<span title="@@alice">x</span>"#),
            "<p><span title=\"@@alice\">x</span></p>\n"
        );
    }

    #[test]
    fn test_entity_does_not_start_a_token() {
        assert_eq!(render("&#64;@alice"), "<p>@@alice</p>\n");
    }

    #[test]
    fn test_rule_sees_rest_of_paragraph() {
        let mut env = RenderEnv::new();
        let doc = pipeline()
            .with_rule(SpanRule)
            .parse("a <<one\ntwo>> b\n\n<<three\n\nfour>>\n", &mut env)
            .unwrap();

        assert_eq!(doc.tokens().len(), 1);
        assert_eq!(doc.tokens()[0].content, "one\ntwo");
        assert_eq!(
            doc.source(),
            "a <rw-inline data-token=\"0\"></rw-inline> b\n\n<<three\n\nfour>>\n"
        );
    }

    #[test]
    fn test_parse_keeps_line_endings() {
        let mut env = RenderEnv::new();
        let doc = pipeline().parse("a @@x\r\nb\n", &mut env).unwrap();

        assert_eq!(
            doc.source(),
            "a <rw-inline data-token=\"0\"></rw-inline>\r\nb\n"
        );
        assert_eq!(doc.tokens().len(), 1);
        assert_eq!(doc.tokens()[0].content, "x");
    }

    #[test]
    fn test_core_rule_sees_flag() {
        let mut env = RenderEnv::new();
        pipeline().process("@@alice", &mut env).unwrap();
        assert_eq!(
            env.meta.and_then(|m| m.style),
            Some(vec!["mention.css".to_owned()])
        );
    }

    #[test]
    fn test_core_rule_without_flag() {
        let mut env = RenderEnv::new();
        pipeline().process("nobody here", &mut env).unwrap();
        assert!(env.meta.is_none());
    }

    #[test]
    fn test_core_rule_error_propagates() {
        let mut pipeline = pipeline().with_core_rule(FailingRule);
        let err = pipeline.process("text", &mut RenderEnv::new()).unwrap_err();

        assert!(matches!(err, RenderError::Io(_)));
        assert_eq!(err.to_string(), "denied");
    }

    #[test]
    fn test_render_is_repeatable() {
        let mut pipeline = pipeline();
        let doc = pipeline.parse("hi @@dave", &mut RenderEnv::new()).unwrap();
        assert_eq!(pipeline.render(&doc), pipeline.render(&doc));
    }

    #[test]
    fn test_missing_renderer_falls_back_to_text() {
        let mut pipeline = MarkdownPipeline::new().with_rule(MentionRule);
        let html = pipeline.process("hi @@eve", &mut RenderEnv::new()).unwrap();
        assert_eq!(html, "<p>hi eve</p>\n");
    }

    #[test]
    fn test_dangling_placeholder_is_kept() {
        let pipeline = pipeline();
        let doc = ParsedDocument {
            source: r#"<rw-inline data-token="7"></rw-inline>"#.to_owned(),
            tokens: vec![InlineToken::new("mention", "@@")],
        };
        assert_eq!(
            pipeline.render(&doc),
            "<p><rw-inline data-token=\"7\"></rw-inline></p>\n"
        );
    }

    #[test]
    fn test_gfm_table() {
        let html = render("| a |\n|---|\n| @@bob |");
        assert!(html.contains("<table>"));
        assert!(html.contains(r#"<span class="mention">bob</span>"#));
    }
}
