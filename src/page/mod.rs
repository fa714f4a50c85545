//! Page module
//!
//! The wiki's only entity: a titled blob of text persisted as one file per page.

mod store;

pub use store::PageStore;

use std::fmt;

/// Title of the page rendered on `/`
pub const HOME_PAGE_TITLE: &str = "homePage";

/// Validated page title
///
/// Only non-empty ASCII alphanumeric tokens are accepted, which keeps
/// `<title>.txt` a plain file name inside the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    /// Title of the home page
    pub fn home() -> Self {
        Self(HOME_PAGE_TITLE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// On-disk file name for this page
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.0)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A wiki page, built per request and never cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Title,
    pub body: Vec<u8>,
}

impl Page {
    pub const fn new(title: Title, body: Vec<u8>) -> Self {
        Self { title, body }
    }

    /// Page with no content, used when editing a page that does not exist yet
    pub const fn empty(title: Title) -> Self {
        Self {
            title,
            body: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_accepts_alphanumeric() {
        assert!(Title::parse("FrontPage").is_some());
        assert!(Title::parse("abc123").is_some());
        assert!(Title::parse("42").is_some());
    }

    #[test]
    fn test_title_rejects_everything_else() {
        assert!(Title::parse("").is_none());
        assert!(Title::parse("has space").is_none());
        assert!(Title::parse("../etc/passwd").is_none());
        assert!(Title::parse("dot.txt").is_none());
        assert!(Title::parse("ünïcode").is_none());
    }

    #[test]
    fn test_home_title_is_valid() {
        assert_eq!(Some(Title::home()), Title::parse(HOME_PAGE_TITLE));
        assert_eq!(Title::home().file_name(), "homePage.txt");
    }

    #[test]
    fn test_file_name() {
        let title = Title::parse("TestPage").unwrap();
        assert_eq!(title.file_name(), "TestPage.txt");
        assert_eq!(title.to_string(), "TestPage");
    }
}
