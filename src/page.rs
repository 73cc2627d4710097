//! HTML page renderer.
//! Builds the static links page from a parsed configuration: profile slots,
//! the themed body class, and the links container markup. Every piece of
//! user-supplied text goes through [`escape_html`] before interpolation;
//! icons are trusted glyphs and URLs land in attributes.

use tracing::warn;

use crate::config::{Content, Link, LinksConfig, Profile, Section, Theme};

/// Default document wrapped around the rendered container.
pub const DEFAULT_TEMPLATE: &str = include_str!("../assets/page.html");

/// Slot the container markup replaces. Custom templates without it have
/// nowhere to render links into.
const CONTAINER_SLOT: &str = "{{links}}";

/// Icon used when a link does not supply one.
const FALLBACK_ICON: &str = "🔗";

/// Seconds of entrance-animation delay added per link position.
const STAGGER_STEP_SECS: f32 = 0.1;

/// Escapes the five HTML-significant characters. Ampersand is replaced
/// first so entities introduced by the later substitutions are not
/// escaped again.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Renders one link as a `link-item` anchor. `index` is the zero-based
/// position across all rendered links and drives the staggered entrance
/// delay. The anchor opens in a new browsing context without an opener
/// back-reference.
pub fn render_link(link: &Link, index: usize) -> String {
    let icon = link.icon.as_deref().unwrap_or(FALLBACK_ICON);
    let description = link
        .description
        .as_deref()
        .map(|d| format!("<div class=\"link-description\">{}</div>", escape_html(d)))
        .unwrap_or_default();
    format!(
        "<a class=\"link-item\" href=\"{href}\" target=\"_blank\" rel=\"noopener noreferrer\" \
         style=\"animation-delay: {delay:.1}s\">\
         <div class=\"link-content\">\
         <div class=\"link-icon\">{icon}</div>\
         <div class=\"link-text\">\
         <div class=\"link-title\">{title}</div>{description}\
         </div></div></a>",
        href = escape_html(&link.url),
        delay = index as f32 * STAGGER_STEP_SECS,
        title = escape_html(&link.title),
    )
}

/// List mode: one element per link, index = position in the sequence.
pub fn render_links(links: &[Link]) -> String {
    links
        .iter()
        .enumerate()
        .map(|(index, link)| render_link(link, index))
        .collect()
}

/// Section mode: a `section-header` block then a grouped `section-links`
/// block per section. The link index keeps counting across section
/// boundaries so the entrance cascade runs through the whole page.
pub fn render_sections(sections: &[Section]) -> String {
    let mut out = String::new();
    let mut link_index = 0;
    for section in sections {
        out.push_str("<div class=\"section-header\">");
        out.push_str(&format!("<h2>{}</h2>", escape_html(&section.title)));
        if let Some(description) = &section.description {
            out.push_str(&format!(
                "<p class=\"section-description\">{}</p>",
                escape_html(description)
            ));
        }
        out.push_str("</div>");
        out.push_str("<div class=\"section-links\">");
        for link in &section.links {
            out.push_str(&render_link(link, link_index));
            link_index += 1;
        }
        out.push_str("</div>");
    }
    out
}

/// Renders the container body for a configuration: sections take
/// precedence over the legacy flat list; neither present leaves the
/// container empty.
pub fn render_content(config: &LinksConfig) -> String {
    match config.content() {
        Content::Sections(sections) => render_sections(sections),
        Content::Links(links) => render_links(links),
        Content::Empty => String::new(),
    }
}

/// Fixed card shown when the configuration cannot be loaded. One
/// `link-item`-classed element, no anchors.
pub fn render_error() -> String {
    "<div class=\"link-item\" style=\"text-align: center; cursor: default;\">\
     <div class=\"link-content\">\
     <div class=\"link-icon\">⚠️</div>\
     <div class=\"link-text\">\
     <div class=\"link-title\">Error Loading Links</div>\
     <div class=\"link-description\">Please check your links.json file</div>\
     </div></div></div>"
        .to_string()
}

/// Fills one `{{slot}}` marker. Custom templates may drop a slot, in which
/// case there is nothing to set and the page passes through unchanged.
fn fill_slot(page: String, slot: &str, value: &str) -> String {
    page.replace(&format!("{{{{{slot}}}}}"), value)
}

/// Fills the four profile display slots. Text values are escaped; the
/// avatar URL lands in an attribute like link targets do.
pub fn apply_profile(page: String, profile: &Profile) -> String {
    let page = fill_slot(page, "page-title", &escape_html(&profile.page_title()));
    let page = fill_slot(page, "profile-name", &escape_html(profile.display_name()));
    let page = fill_slot(page, "profile-bio", &escape_html(profile.display_bio()));
    fill_slot(page, "avatar", &escape_html(profile.avatar_url()))
}

/// Sets the mutually exclusive visual mode class on the body slot.
pub fn apply_theme(page: String, theme: Theme) -> String {
    fill_slot(page, "theme", theme.class_name())
}

/// Replaces the links container contents. A template without the container
/// slot has nowhere to render into: the condition is logged and the page
/// is returned unchanged.
pub fn apply_container(page: String, content: &str) -> String {
    if !page.contains(CONTAINER_SLOT) {
        warn!("Links container not found in template");
        return page;
    }
    page.replace(CONTAINER_SLOT, content)
}

/// Renders the full page document for a configuration.
pub fn render_page(config: &LinksConfig, template: &str) -> String {
    let page = apply_profile(template.to_string(), &config.profile);
    let page = apply_theme(page, config.profile.theme());
    apply_container(page, &render_content(config))
}

/// Renders the full page in its failed state: default profile slots and
/// the fixed error card in the container.
pub fn render_error_page(template: &str) -> String {
    let page = apply_profile(template.to_string(), &Profile::default());
    let page = apply_theme(page, Theme::Dark);
    apply_container(page, &render_error())
}
