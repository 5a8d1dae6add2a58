//! Page templates
//!
//! Templates are compiled into the binary and registered once at start-up.

use crate::error::Result;
use axum::response::Html;
use minijinja::{Environment, Value};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("error.html", include_str!("../templates/error.html")),
];

/// The registered page templates
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Render a page with the given context
    pub fn render(&self, name: &str, ctx: Value) -> Result<Html<String>> {
        let html = self.env.get_template(name)?.render(ctx)?;
        Ok(Html(html))
    }
}
