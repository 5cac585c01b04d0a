//! Declarative rewrite table.

use roofer_core::Branding;

use crate::markup;

/// Where a rewritten value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// `Branding::page_title`.
    PageTitle,
    /// `Branding::description`.
    Description,
    /// `Branding::company_name`.
    CompanyName,
    /// `Branding::preview_image_url`.
    PreviewImage,
    /// `Branding::origin`.
    Origin,
    /// A fixed value.
    Literal(String),
    /// Hero heading markup for the company.
    HeroMarkup,
    /// The preview style block.
    PreviewStyles,
}

impl Replacement {
    /// Resolve against request branding.
    pub fn resolve(&self, branding: &Branding) -> String {
        match self {
            Self::PageTitle => branding.page_title.clone(),
            Self::Description => branding.description.clone(),
            Self::CompanyName => branding.company_name.clone(),
            Self::PreviewImage => branding.preview_image_url.clone(),
            Self::Origin => branding.origin.clone(),
            Self::Literal(value) => value.clone(),
            Self::HeroMarkup => markup::hero_markup(&branding.company_name),
            Self::PreviewStyles => markup::preview_styles(),
        }
    }
}

/// What to do with a matched element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteAction {
    /// Replace the inner content with escaped text.
    SetText(Replacement),
    /// Set an attribute value.
    SetAttribute {
        name: String,
        value: Replacement,
    },
    /// Replace the inner content with raw markup.
    SetInnerHtml(Replacement),
    /// Append raw markup before the end tag.
    AppendHtml(Replacement),
    /// Remove the element and its content.
    Remove,
}

/// One row of the rewrite table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    /// CSS selector.
    pub selector: String,
    /// Action applied to each match.
    pub action: RewriteAction,
}

impl RewriteRule {
    /// Create a rule.
    pub fn new(selector: impl Into<String>, action: RewriteAction) -> Self {
        Self {
            selector: selector.into(),
            action,
        }
    }

    /// Set the `content` attribute of a meta tag.
    pub fn meta_content(selector: impl Into<String>, value: Replacement) -> Self {
        Self::new(
            selector,
            RewriteAction::SetAttribute {
                name: "content".to_string(),
                value,
            },
        )
    }
}

/// Ordered rewrite table applied in a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteTargets {
    rules: Vec<RewriteRule>,
}

impl RewriteTargets {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The branding table: title, description, Open Graph and Twitter card
    /// tags, the hero heading and the preview style block.
    ///
    /// A previously injected style block is removed before the new one is
    /// appended, so rewriting rewritten output is a no-op.
    pub fn standard() -> Self {
        use Replacement::*;

        Self::new()
            .with_rule(RewriteRule::new("title", RewriteAction::SetText(PageTitle)))
            .with_rule(RewriteRule::meta_content(
                r#"meta[name="description"]"#,
                Description,
            ))
            .with_rule(RewriteRule::meta_content(
                r#"meta[property="og:title"]"#,
                PageTitle,
            ))
            .with_rule(RewriteRule::meta_content(
                r#"meta[property="og:description"]"#,
                Description,
            ))
            .with_rule(RewriteRule::meta_content(
                r#"meta[property="og:site_name"]"#,
                CompanyName,
            ))
            .with_rule(RewriteRule::meta_content(
                r#"meta[property="og:image"]"#,
                PreviewImage,
            ))
            .with_rule(RewriteRule::meta_content(
                r#"meta[property="og:url"]"#,
                Origin,
            ))
            .with_rule(RewriteRule::meta_content(
                r#"meta[property="og:type"]"#,
                Literal("website".to_string()),
            ))
            .with_rule(RewriteRule::meta_content(
                r#"meta[property="twitter:title"]"#,
                PageTitle,
            ))
            .with_rule(RewriteRule::meta_content(
                r#"meta[property="twitter:description"]"#,
                Description,
            ))
            .with_rule(RewriteRule::meta_content(
                r#"meta[property="twitter:image"]"#,
                PreviewImage,
            ))
            .with_rule(RewriteRule::meta_content(
                r#"meta[property="twitter:card"]"#,
                Literal("summary_large_image".to_string()),
            ))
            .with_rule(RewriteRule::new(
                ".hero-title",
                RewriteAction::SetInnerHtml(HeroMarkup),
            ))
            .with_rule(RewriteRule::new(
                markup::PREVIEW_STYLE_SELECTOR,
                RewriteAction::Remove,
            ))
            .with_rule(RewriteRule::new(
                "head",
                RewriteAction::AppendHtml(PreviewStyles),
            ))
    }

    /// Add a rule.
    pub fn with_rule(mut self, rule: RewriteRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in application order.
    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
