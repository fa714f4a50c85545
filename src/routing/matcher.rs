//! Route matching module
//!
//! Implements the `/(edit|save|view)/<title>` path grammar.

use regex::Regex;
use std::sync::LazyLock;

use crate::page::Title;

static PAGE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(edit|save|view)/([a-zA-Z0-9]+)$").expect("page path pattern is valid")
});

/// A validated wiki route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WikiRoute {
    Home,
    View(Title),
    Edit(Title),
    Save(Title),
}

impl WikiRoute {
    /// Short operation name, used in logs
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::View(_) => "view",
            Self::Edit(_) => "edit",
            Self::Save(_) => "save",
        }
    }
}

/// Match a request path to a wiki route.
///
/// Returns `None` for anything outside the grammar; the caller answers 404.
pub fn match_route(path: &str) -> Option<WikiRoute> {
    if path == "/" {
        return Some(WikiRoute::Home);
    }

    let caps = PAGE_PATH.captures(path)?;
    let title = Title::parse(caps.get(2)?.as_str())?;
    match caps.get(1)?.as_str() {
        "view" => Some(WikiRoute::View(title)),
        "edit" => Some(WikiRoute::Edit(title)),
        "save" => Some(WikiRoute::Save(title)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(raw: &str) -> Title {
        Title::parse(raw).unwrap()
    }

    #[test]
    fn test_match_home() {
        assert_eq!(match_route("/"), Some(WikiRoute::Home));
    }

    #[test]
    fn test_match_operations() {
        assert_eq!(
            match_route("/view/abc123"),
            Some(WikiRoute::View(title("abc123")))
        );
        assert_eq!(
            match_route("/edit/FrontPage"),
            Some(WikiRoute::Edit(title("FrontPage")))
        );
        assert_eq!(
            match_route("/save/Notes2"),
            Some(WikiRoute::Save(title("Notes2")))
        );
    }

    #[test]
    fn test_reject_invalid_titles() {
        assert_eq!(match_route("/view/"), None);
        assert_eq!(match_route("/view/has space"), None);
        assert_eq!(match_route("/view/has%20space"), None);
        assert_eq!(match_route("/view/../secret"), None);
        assert_eq!(match_route("/view/a.txt"), None);
        assert_eq!(match_route("/view/abc/"), None);
        assert_eq!(match_route("/view/abc/def"), None);
    }

    #[test]
    fn test_reject_unknown_paths() {
        assert_eq!(match_route(""), None);
        assert_eq!(match_route("/delete/abc"), None);
        assert_eq!(match_route("/View/abc"), None);
        assert_eq!(match_route("/viewabc"), None);
        assert_eq!(match_route("/favicon.ico"), None);
        assert_eq!(match_route("//"), None);
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(match_route("/save/Draft").unwrap().operation(), "save");
        assert_eq!(WikiRoute::Home.operation(), "home");
    }
}
