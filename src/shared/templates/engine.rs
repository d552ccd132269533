//! Page template engine using Jinja2 syntax.
//!
//! Templates live in `templates/pages/` and are embedded at compile time, so
//! the binary renders pages regardless of its working directory. Names end in
//! `.html`, which turns on minijinja's HTML autoescaping.

use minijinja::Environment;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Embedded page templates, keyed by template name
const PAGES: &[(&str, &str)] = &[
    (
        "base.html",
        include_str!("../../../templates/pages/base.html"),
    ),
    (
        "index.html",
        include_str!("../../../templates/pages/index.html"),
    ),
    (
        "data.html",
        include_str!("../../../templates/pages/data.html"),
    ),
    (
        "edit.html",
        include_str!("../../../templates/pages/edit.html"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    for &(name, source) in PAGES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a page with a serializable context.
///
/// # Example
/// ```ignore
/// let html = render_page("data.html", minijinja::context! { records => records })?;
/// ```
pub fn render_page<S: Serialize>(template_name: &str, ctx: S) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_pages_load() {
        for (name, _) in PAGES {
            assert!(get_environment().get_template(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_missing_template() {
        let result = render_page("nonexistent.html", context! {});
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_render_escapes_html() {
        let html = render_page(
            "edit.html",
            context! {
                record => context! {
                    id => 1,
                    nama => "<script>alert(1)</script>",
                    nim => "1",
                    kelas => "A",
                    umkm => "U",
                    kategori => "K",
                    pegawai => "1",
                },
            },
        )
        .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
