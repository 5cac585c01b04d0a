//! Incremental rewrite engine over `lol_html`.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use lol_html::html_content::{ContentType, Element};
use lol_html::{ElementContentHandlers, HandlerResult, HtmlRewriter, OutputSink, Selector, Settings};
use roofer_core::{Branding, BrandingError};

use crate::rules::{RewriteAction, RewriteTargets};

/// Collects rewriter output between `write` calls.
struct OutputCollector(Rc<RefCell<Vec<u8>>>);

impl OutputSink for OutputCollector {
    fn handle_chunk(&mut self, chunk: &[u8]) {
        self.0.borrow_mut().extend_from_slice(chunk);
    }
}

/// Streaming rewriter bound to one request's branding.
///
/// Input may be split at any byte; output is returned as soon as the
/// underlying parser releases it, so the document is never buffered whole.
pub struct StreamRewriter {
    rewriter: HtmlRewriter<'static, OutputCollector>,
    output: Rc<RefCell<Vec<u8>>>,
}

impl StreamRewriter {
    /// Build a rewriter applying `targets` with values from `branding`.
    ///
    /// Fails only when a selector in the table does not parse.
    pub fn new(targets: &RewriteTargets, branding: &Branding) -> Result<Self, BrandingError> {
        let mut handlers = Vec::with_capacity(targets.len());

        for rule in targets.rules() {
            let selector: Selector = rule.selector.parse().map_err(|e| {
                BrandingError::RewriteFailure(format!("invalid selector {:?}: {}", rule.selector, e))
            })?;
            let action = rule.action.clone();
            let value = resolve(&action, branding);

            handlers.push((
                Cow::Owned(selector),
                ElementContentHandlers::default().element(
                    move |el: &mut Element<'_, '_>| -> HandlerResult { apply(&action, &value, el) },
                ),
            ));
        }

        let output = Rc::new(RefCell::new(Vec::new()));
        let rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: handlers,
                ..Settings::new()
            },
            OutputCollector(Rc::clone(&output)),
        );

        Ok(Self {
            rewriter,
            output,
        })
    }

    /// Feed a chunk and return whatever output is ready.
    pub fn write(&mut self, chunk: &[u8]) -> Result<Vec<u8>, BrandingError> {
        self.rewriter
            .write(chunk)
            .map_err(|e| BrandingError::RewriteFailure(e.to_string()))?;
        Ok(self.take_output())
    }

    /// Finish the document and return the remaining output.
    pub fn end(self) -> Result<Vec<u8>, BrandingError> {
        let output = self.output;
        self.rewriter
            .end()
            .map_err(|e| BrandingError::RewriteFailure(e.to_string()))?;
        let rest = std::mem::take(&mut *output.borrow_mut());
        Ok(rest)
    }

    fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut *self.output.borrow_mut())
    }
}

/// Rewrite a complete document in one call.
pub fn rewrite_document(
    html: &[u8],
    targets: &RewriteTargets,
    branding: &Branding,
) -> Result<Vec<u8>, BrandingError> {
    let mut rewriter = StreamRewriter::new(targets, branding)?;
    let mut out = rewriter.write(html)?;
    out.extend(rewriter.end()?);
    Ok(out)
}

fn resolve(action: &RewriteAction, branding: &Branding) -> String {
    match action {
        RewriteAction::SetText(r)
        | RewriteAction::SetInnerHtml(r)
        | RewriteAction::AppendHtml(r)
        | RewriteAction::SetAttribute { value: r, .. } => r.resolve(branding),
        RewriteAction::Remove => String::new(),
    }
}

fn apply(action: &RewriteAction, value: &str, el: &mut Element<'_, '_>) -> HandlerResult {
    match action {
        RewriteAction::SetText(_) => el.set_inner_content(value, ContentType::Text),
        RewriteAction::SetAttribute { name, .. } => el.set_attribute(name, value)?,
        RewriteAction::SetInnerHtml(_) => el.set_inner_content(value, ContentType::Html),
        RewriteAction::AppendHtml(_) => el.append(value, ContentType::Html),
        RewriteAction::Remove => el.remove(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Replacement, RewriteRule};
    use roofer_core::ClientConfig;
    use url::Url;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Roofer</title>
<meta name="description" content="Generic">
<meta property="og:title" content="Generic">
<meta property="og:description" content="Generic">
<meta property="og:site_name" content="Generic">
<meta property="og:image" content="">
<meta property="og:url" content="">
<meta property="og:type" content="article">
<meta property="twitter:title" content="Generic">
<meta property="twitter:description" content="Generic">
<meta property="twitter:image" content="">
<meta property="twitter:card" content="summary">
</head>
<body>
<section class="hero"><h1 class="hero-title">Roofing Cost Estimate</h1></section>
</body>
</html>"#;

    fn branding(name: &str) -> Branding {
        let config = ClientConfig {
            name: Some(name.to_string()),
            ..ClientConfig::default()
        };
        Branding::derive(&config, &Url::parse("https://acme.pages.dev/").unwrap())
    }

    fn rewrite(html: &str, branding: &Branding) -> String {
        let out = rewrite_document(html.as_bytes(), &RewriteTargets::standard(), branding).unwrap();
        String::from_utf8(out).unwrap()
    }

    // === Rewrite Tests ===

    #[test]
    fn test_rewrites_title_and_meta() {
        let out = rewrite(PAGE, &branding("Acme Roofing"));

        assert!(out.contains("<title>Acme Roofing - Roofing Cost Estimate</title>"));
        assert!(out.contains(
            r#"<meta name="description" content="Get an accurate roofing estimate from Acme Roofing in minutes. Interactive and easy to use.">"#
        ));
        assert!(out.contains(
            r#"<meta property="og:title" content="Acme Roofing - Roofing Cost Estimate">"#
        ));
        assert!(out.contains(
            r#"<meta property="og:description" content="Get an accurate roofing estimate from Acme Roofing in minutes. Interactive and easy to use.">"#
        ));
        assert!(out.contains(
            r#"<meta property="og:image" content="https://image.thum.io/get/width/1200/crop/630/noanim/https://acme.pages.dev">"#
        ));
        assert!(out.contains(r#"<meta property="og:site_name" content="Acme Roofing">"#));
        assert!(out.contains(r#"<meta property="og:url" content="https://acme.pages.dev">"#));
        assert!(out.contains(r#"<meta property="og:type" content="website">"#));
        assert!(out.contains(
            r#"<meta property="twitter:image" content="https://image.thum.io/get/width/1200/crop/630/noanim/https://acme.pages.dev">"#
        ));
        assert!(out.contains(
            r#"<meta property="twitter:title" content="Acme Roofing - Roofing Cost Estimate">"#
        ));
        assert!(out.contains(
            r#"<meta property="twitter:description" content="Get an accurate roofing estimate from Acme Roofing in minutes. Interactive and easy to use.">"#
        ));
        assert!(out.contains(r#"<meta property="twitter:card" content="summary_large_image">"#));
    }

    #[test]
    fn test_rewrites_hero_and_appends_styles() {
        let out = rewrite(PAGE, &branding("Acme Roofing"));

        assert!(out.contains(
            "<span class=\"line brand-line\">by <span class=\"company-brand\">Acme Roofing</span></span></h1>"
        ));
        assert!(out.contains("</style></head>"));
        assert_eq!(out.matches("id=\"roofer-preview-styles\"").count(), 1);
    }

    #[test]
    fn test_title_text_is_escaped() {
        let out = rewrite(PAGE, &branding("Smith & <Sons>"));
        assert!(out.contains("<title>Smith &amp; &lt;Sons&gt; - Roofing Cost Estimate</title>"));
        assert!(out.contains("company-brand\">Smith &amp; &lt;Sons&gt;</span>"));
    }

    #[test]
    fn test_missing_targets_are_skipped() {
        let html = "<html><head></head><body><p>Hi</p></body></html>";
        let out = rewrite(html, &branding("Acme Roofing"));
        assert!(out.contains("<p>Hi</p>"));
        assert!(out.contains("roofer-preview-styles"));
    }

    // === Idempotence Tests ===

    #[test]
    fn test_rewrite_is_idempotent() {
        let branding = branding("Acme Roofing");
        let once = rewrite(PAGE, &branding);
        let twice = rewrite(&once, &branding);
        assert_eq!(once, twice);
    }

    // === Streaming Tests ===

    #[test]
    fn test_split_input_matches_whole_document() {
        let branding = branding("Acme Roofing");
        let whole = rewrite(PAGE, &branding);

        let mut rewriter = StreamRewriter::new(&RewriteTargets::standard(), &branding).unwrap();
        let mut out = Vec::new();
        for chunk in PAGE.as_bytes().chunks(7) {
            out.extend(rewriter.write(chunk).unwrap());
        }
        out.extend(rewriter.end().unwrap());

        assert_eq!(String::from_utf8(out).unwrap(), whole);
    }

    // === Error Tests ===

    #[test]
    fn test_invalid_selector_rejected() {
        let targets = RewriteTargets::new().with_rule(RewriteRule::new("[[", RewriteAction::Remove));
        let err = StreamRewriter::new(&targets, &branding("Acme")).err().unwrap();
        assert_eq!(err.kind(), "rewrite_failure");
    }

    #[test]
    fn test_handler_failure_surfaces_as_rewrite_failure() {
        let targets = RewriteTargets::new().with_rule(RewriteRule::new(
            "body",
            RewriteAction::SetAttribute {
                name: "bad name".to_string(),
                value: Replacement::CompanyName,
            },
        ));
        let err = rewrite_document(PAGE.as_bytes(), &targets, &branding("Acme")).unwrap_err();
        assert_eq!(err.kind(), "rewrite_failure");
    }
}
