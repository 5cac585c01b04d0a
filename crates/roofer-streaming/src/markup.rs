//! Markup injected into branded pages.

/// `id` of the injected style block.
pub const PREVIEW_STYLE_ID: &str = "roofer-preview-styles";

/// Selector matching a previously injected style block.
pub const PREVIEW_STYLE_SELECTOR: &str = "style#roofer-preview-styles";

/// Heading markup for `.hero-title`.
pub fn hero_markup(company_name: &str) -> String {
    format!(
        "<span class=\"line\">Roofing Cost Estimate</span>\n\
         <span class=\"line brand-line\">by <span class=\"company-brand\">{}</span></span>",
        escape_html(company_name)
    )
}

/// Style block that makes screenshot services render a static page.
///
/// Hides the 3D canvas and particles, gives the hero a flat background and
/// turns off every animation and transition.
pub fn preview_styles() -> String {
    format!(
        "<style id=\"{}\">\
         #canvas-container, .particles {{ display: none !important; }} \
         .hero {{ background: #111827 !important; }} \
         * {{ animation: none !important; transition: none !important; }}\
         </style>",
        PREVIEW_STYLE_ID
    )
}

/// Escape text for use inside HTML markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
