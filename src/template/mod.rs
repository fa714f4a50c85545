//! Template rendering module
//!
//! Holds the named HTML templates (`home`, `edit`, `view`) and renders a page
//! into them. The registry is built once at startup and never mutated.

use handlebars::Handlebars;
use serde::Serialize;
use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::page::Page;

/// Templates every wiki instance must provide
pub const REQUIRED_TEMPLATES: [&str; 3] = ["home", "edit", "view"];

const TEMPLATE_EXTENSION: &str = "html";

/// Startup-time template loading errors
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template '{name}' not found at {}", .path.display())]
    Missing { name: String, path: PathBuf },
    #[error("template '{name}' failed to load: {source}")]
    Parse {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },
}

/// Template execution error, surfaced to the client as a 500
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct RenderError(#[from] handlebars::RenderError);

/// Values exposed to templates
#[derive(Debug, Serialize)]
struct PageContext<'a> {
    title: &'a str,
    body: Cow<'a, str>,
}

impl<'a> From<&'a Page> for PageContext<'a> {
    fn from(page: &'a Page) -> Self {
        Self {
            title: page.title.as_str(),
            body: String::from_utf8_lossy(&page.body),
        }
    }
}

/// Read-only registry of named templates
pub struct TemplateRegistry {
    handlebars: Handlebars<'static>,
}

impl TemplateRegistry {
    /// Load every required template from `dir`.
    ///
    /// Fails on the first template that is missing or does not parse; a
    /// server must not start with an incomplete set.
    pub fn load(dir: &Path, dev_mode: bool) -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_dev_mode(dev_mode);

        for name in REQUIRED_TEMPLATES {
            let path = dir.join(format!("{name}.{TEMPLATE_EXTENSION}"));
            if !path.is_file() {
                return Err(TemplateError::Missing {
                    name: name.to_string(),
                    path,
                });
            }
            handlebars
                .register_template_file(name, &path)
                .map_err(|e| TemplateError::Parse {
                    name: name.to_string(),
                    source: Box::new(e),
                })?;
        }

        Ok(Self { handlebars })
    }

    /// Render `name` against `page` into a string.
    ///
    /// A `None` page renders with an empty context. Output is buffered in
    /// full, so a failure leaves nothing half-written.
    pub fn render(&self, name: &str, page: Option<&Page>) -> Result<String, RenderError> {
        let mut buf = Vec::new();
        self.render_to(&mut buf, name, page)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Render `name` against `page`, streaming into `writer`
    pub fn render_to<W: Write>(
        &self,
        writer: W,
        name: &str,
        page: Option<&Page>,
    ) -> Result<(), RenderError> {
        let context = page.map(PageContext::from);
        Ok(self.handlebars.render_to_write(name, &context, writer)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::page::Title;

    /// Write a minimal but complete template set into `dir`
    pub fn write_templates(dir: &Path) {
        std::fs::write(
            dir.join("home.html"),
            "<h1>Home</h1><div>{{body}}</div>",
        )
        .unwrap();
        std::fs::write(
            dir.join("view.html"),
            "<h1>{{title}}</h1><p>[<a href=\"/edit/{{title}}\">edit</a>]</p><div>{{body}}</div>",
        )
        .unwrap();
        std::fs::write(
            dir.join("edit.html"),
            "<h1>Editing {{title}}</h1>\
             <form action=\"/save/{{title}}\" method=\"POST\">\
             <textarea name=\"body\">{{body}}</textarea></form>",
        )
        .unwrap();
    }

    fn page(title: &str, body: &str) -> Page {
        Page::new(Title::parse(title).unwrap(), body.as_bytes().to_vec())
    }

    #[test]
    fn test_load_complete_set() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path());

        let registry = TemplateRegistry::load(dir.path(), false).unwrap();
        for name in REQUIRED_TEMPLATES {
            assert!(registry.render(name, None).is_ok(), "template {name}");
        }
    }

    #[test]
    fn test_missing_template_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path());
        std::fs::remove_file(dir.path().join("edit.html")).unwrap();

        let err = TemplateRegistry::load(dir.path(), false).err().unwrap();
        assert!(matches!(err, TemplateError::Missing { ref name, .. } if name == "edit"));
    }

    #[test]
    fn test_invalid_template_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path());
        std::fs::write(dir.path().join("view.html"), "{{#if title}}unclosed").unwrap();

        let err = TemplateRegistry::load(dir.path(), false).err().unwrap();
        assert!(matches!(err, TemplateError::Parse { ref name, .. } if name == "view"));
    }

    #[test]
    fn test_render_view_escapes_body() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path());
        let registry = TemplateRegistry::load(dir.path(), false).unwrap();

        let html = registry
            .render("view", Some(&page("Demo", "<script>x</script>")))
            .unwrap();
        assert!(html.contains("<h1>Demo</h1>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_render_without_page() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path());
        let registry = TemplateRegistry::load(dir.path(), false).unwrap();

        let html = registry.render("home", None).unwrap();
        assert_eq!(html, "<h1>Home</h1><div></div>");
    }

    #[test]
    fn test_render_to_writer() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path());
        let registry = TemplateRegistry::load(dir.path(), false).unwrap();

        let mut out = Vec::new();
        registry
            .render_to(&mut out, "edit", Some(&page("Fresh", "")))
            .unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains("action=\"/save/Fresh\""));
        assert!(html.contains("<textarea name=\"body\"></textarea>"));
    }

    #[test]
    fn test_render_unknown_template_errors() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path());
        let registry = TemplateRegistry::load(dir.path(), false).unwrap();

        assert!(registry.render("missing", None).is_err());
    }
}
