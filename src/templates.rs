//! Template rendering module
//!
//! Thin wrapper around a [`tera::Tera`] environment compiled once at
//! startup from the configured template directory. An unknown template
//! name or a render failure is an infrastructure error; callers surface
//! it as HTTP 500.

use tera::Tera;

// Re-export so handlers build contexts without importing tera directly
pub use tera::Context;

/// Compiled template environment
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Compile all `.html` templates under `templates_dir`
    pub fn load(templates_dir: &str) -> Result<Self, tera::Error> {
        let glob = format!("{}/**/*.html", templates_dir.trim_end_matches('/'));
        let tera = Tera::new(&glob)?;
        Ok(Self { tera })
    }

    /// Render a template with the given named values
    pub fn render(&self, name: &str, context: &Context) -> Result<String, tera::Error> {
        self.tera.render(name, context)
    }
}

#[cfg(test)]
impl TemplateEngine {
    /// Build an engine from in-memory templates, bypassing the filesystem
    pub fn from_raw(templates: &[(&str, &str)]) -> Self {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates.to_vec())
            .expect("raw test templates should compile");
        Self { tera }
    }
}
