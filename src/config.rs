use serde::Deserialize;

/// Element ids the catalog widget reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogIds {
    pub grid: String,
    pub empty: String,
    pub tags: String,
    pub search: String,
    /// Attribute naming the tag on each generated filter button.
    pub tag_attribute: String,
}

impl Default for CatalogIds {
    fn default() -> Self {
        Self {
            grid: "tools-grid".to_string(),
            empty: "tools-empty".to_string(),
            tags: "tools-tags".to_string(),
            search: "tools-search".to_string(),
            tag_attribute: "data-tag".to_string(),
        }
    }
}

/// Selectors for the pre-rendered blog listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PostIds {
    pub search: String,
    pub clear: String,
    pub post_classes: Vec<String>,
    pub tag_button_class: String,
    pub tags_attribute: String,
    pub tag_attribute: String,
}

impl Default for PostIds {
    fn default() -> Self {
        Self {
            search: "post-search".to_string(),
            clear: "clear-search".to_string(),
            post_classes: vec!["post".to_string(), "featured-post".to_string()],
            tag_button_class: "tag-btn".to_string(),
            tags_attribute: "data-tags".to_string(),
            tag_attribute: "data-tag".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub attribute: String,
    pub toggle_class: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "eclipsesec-theme".to_string(),
            attribute: "data-theme".to_string(),
            toggle_class: "theme-toggle".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub catalog: CatalogIds,
    pub posts: PostIds,
    pub theme: ThemeConfig,
    /// Tags never offered as catalog filter buttons.
    pub excluded_tags: Vec<String>,
}

pub const DEFAULT_EXCLUDED_TAGS: &[&str] = &["WDAC", "Hardening", "Defense"];

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogIds::default(),
            posts: PostIds::default(),
            theme: ThemeConfig::default(),
            excluded_tags: DEFAULT_EXCLUDED_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
