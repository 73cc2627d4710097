//! Configuration model for the links page.
//! Deserializes links.json (one profile plus a flat `links` list or grouped
//! `sections`) with serde. All profile fields are optional and fall back to
//! fixed defaults; a link missing its title or url degrades to empty strings
//! instead of failing the parse.

use serde::Deserialize;

/// Shown when the profile has no name.
pub const DEFAULT_NAME: &str = "Your Name";
/// Shown when the profile has no bio.
pub const DEFAULT_BIO: &str = "Your bio here";
/// Placeholder used when the profile has no avatar URL.
pub const DEFAULT_AVATAR: &str = "https://via.placeholder.com/150";

/// Root configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinksConfig {
    #[serde(default)]
    pub profile: Profile,
    pub sections: Option<Vec<Section>>,
    pub links: Option<Vec<Link>>,
}

/// The one profile per page load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub theme: Option<String>,
}

/// One navigable entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    pub icon: Option<String>,
    pub description: Option<String>,
}

/// A titled, ordered group of links.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Which shape of the configuration drives rendering.
#[derive(Debug)]
pub enum Content<'a> {
    Sections(&'a [Section]),
    Links(&'a [Link]),
    Empty,
}

impl LinksConfig {
    /// Resolves the rendered content. `sections` wins when both shapes are
    /// present; neither present renders an empty container, not an error.
    pub fn content(&self) -> Content<'_> {
        if let Some(sections) = &self.sections {
            Content::Sections(sections)
        } else if let Some(links) = &self.links {
            Content::Links(links)
        } else {
            Content::Empty
        }
    }
}

impl Profile {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    pub fn display_bio(&self) -> &str {
        self.bio.as_deref().unwrap_or(DEFAULT_BIO)
    }

    pub fn avatar_url(&self) -> &str {
        self.avatar.as_deref().unwrap_or(DEFAULT_AVATAR)
    }

    /// Document title, derived from the display name.
    pub fn page_title(&self) -> String {
        format!("{} - Links", self.display_name())
    }

    pub fn theme(&self) -> Theme {
        Theme::from_value(self.theme.as_deref())
    }
}

/// Visual mode for the page. Two states only: "light" selects Light, any
/// other value (absent included) is Dark.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    /// Class name applied to the page body.
    pub fn class_name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.class_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections_config() {
        let json = r#"{
            "profile": {"name": "Ada", "theme": "light"},
            "sections": [
                {"title": "Work", "links": [{"title": "Site", "url": "https://example.com"}]}
            ]
        }"#;
        let config: LinksConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.profile.display_name(), "Ada");
        assert!(matches!(config.content(), Content::Sections(s) if s.len() == 1));
    }

    #[test]
    fn test_sections_take_precedence_over_links() {
        let json = r#"{
            "profile": {},
            "sections": [{"title": "A", "links": []}],
            "links": [{"title": "legacy", "url": "https://example.com"}]
        }"#;
        let config: LinksConfig = serde_json::from_str(json).unwrap();
        // Both shapes present: only sections are consulted
        assert!(matches!(config.content(), Content::Sections(_)));
    }

    #[test]
    fn test_legacy_links_config() {
        let json = r#"{"profile": {}, "links": [{"title": "a", "url": "b"}]}"#;
        let config: LinksConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(config.content(), Content::Links(l) if l.len() == 1));
    }

    #[test]
    fn test_neither_shape_renders_empty() {
        let config: LinksConfig = serde_json::from_str(r#"{"profile": {}}"#).unwrap();
        assert!(matches!(config.content(), Content::Empty));
    }

    #[test]
    fn test_profile_fallback_defaults() {
        let profile = Profile::default();
        assert_eq!(profile.display_name(), DEFAULT_NAME);
        assert_eq!(profile.display_bio(), DEFAULT_BIO);
        assert_eq!(profile.avatar_url(), DEFAULT_AVATAR);
        assert_eq!(profile.page_title(), "Your Name - Links");
    }

    #[test]
    fn test_missing_link_fields_degrade_to_empty() {
        // No title/url: renders empty content rather than rejecting the config
        let link: Link = serde_json::from_str(r#"{"icon": "🎵"}"#).unwrap();
        assert_eq!(link.title, "");
        assert_eq!(link.url, "");
        assert_eq!(link.icon.as_deref(), Some("🎵"));
    }

    #[test]
    fn test_theme_two_state_toggle() {
        assert_eq!(Theme::from_value(Some("light")), Theme::Light);
        assert_eq!(Theme::from_value(Some("dark")), Theme::Dark);
        // Unrecognized values fall back to dark
        assert_eq!(Theme::from_value(Some("purple")), Theme::Dark);
        assert_eq!(Theme::from_value(None), Theme::Dark);
    }

    #[test]
    fn test_theme_class_name() {
        assert_eq!(Theme::Light.class_name(), "light");
        assert_eq!(format!("{}", Theme::Dark), "dark");
    }
}
