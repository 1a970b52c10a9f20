use serde::{Deserialize, Serialize};

/// Placeholder left in a gid that has not been filled in yet
pub const GID_PLACEHOLDER: &str = "PUT_";

/// Key of the category backed by the bundled sample sheet
pub const SAMPLE_CATEGORY_KEY: &str = "sample";

/// A themed question set backed by one published sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub title: String,
    pub gid: String,
    pub enabled: bool,
}

impl Category {
    pub fn new(key: &str, title: &str, gid: &str, enabled: bool) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            gid: gid.to_string(),
            enabled,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.gid.contains(GID_PLACEHOLDER)
    }

    /// TSV export URL of this category's sheet
    pub fn published_tsv_url(&self, published_base: &str) -> String {
        format!(
            "{}/pub?output=tsv&gid={}",
            published_base.trim_end_matches('/'),
            self.gid
        )
    }

    /// Category that reads the sheet compiled into the binary
    pub fn sample() -> Self {
        Self::new(SAMPLE_CATEGORY_KEY, "Sample", "sample", true)
    }
}

/// Categories shipped in the default configuration
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("eiken4", "Eiken Grade 4", "1582643347", true),
        Category::new("eiken3", "Eiken Grade 3", "174274981", true),
        Category::new("eiken2-", "Eiken Grade Pre-2", "1090561184", true),
        Category::new("rails", "Rails", "1983224616", false),
    ]
}

/// Categories that may be offered to the user, in configured order
pub fn enabled(categories: &[Category]) -> Vec<&Category> {
    categories.iter().filter(|c| c.enabled).collect()
}

/// Look up an enabled category by key; disabled and unknown keys yield None
pub fn find_enabled<'a>(categories: &'a [Category], key: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.enabled && c.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_published_url() {
        let cat = Category::new("k", "K", "42", true);
        assert_eq!(
            cat.published_tsv_url("https://example.com/d/e/abc/"),
            "https://example.com/d/e/abc/pub?output=tsv&gid=42"
        );
    }

    #[test]
    fn test_find_enabled_skips_disabled_and_unknown() {
        let cats = default_categories();
        assert_eq!(find_enabled(&cats, "eiken3").unwrap().title, "Eiken Grade 3");
        assert!(find_enabled(&cats, "rails").is_none());
        assert!(find_enabled(&cats, "nope").is_none());
    }

    #[test]
    fn test_enabled_keeps_configured_order() {
        let cats = default_categories();
        let keys: Vec<&str> = enabled(&cats).iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["eiken4", "eiken3", "eiken2-"]);
    }

    #[test]
    fn test_placeholder_gid_is_unconfigured() {
        assert!(!Category::new("x", "X", "PUT_GID_HERE", true).is_configured());
        assert!(Category::sample().is_configured());
    }
}
