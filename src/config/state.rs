// Application state module
// One immutable state object shared by every request

use chrono::FixedOffset;

use super::types::Config;
use crate::templates::TemplateEngine;

/// Application state
///
/// Built once at startup from the loaded [`Config`] and handed to the
/// server entry point behind an `Arc`. Handlers only ever read from it.
pub struct AppState {
    pub config: Config,
    pub templates: TemplateEngine,
    /// Fixed display timezone for the date/time page
    pub tz: FixedOffset,
}

impl AppState {
    /// Create `AppState` from a loaded configuration
    ///
    /// Fails if the configured UTC offset is out of range or the template
    /// directory cannot be compiled.
    pub fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let tz = config
            .site
            .utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                format!(
                    "Invalid site.utc_offset_hours: {}",
                    config.site.utc_offset_hours
                )
            })?;

        let templates = TemplateEngine::load(&config.site.templates_dir)?;

        Ok(Self {
            config,
            templates,
            tz,
        })
    }
}

#[cfg(test)]
impl AppState {
    /// State with default config and in-memory templates, for handler tests
    pub fn for_tests() -> Self {
        let config = Config::load_from("nonexistent-config").expect("default config");
        let templates = TemplateEngine::from_raw(&[
            ("today.html", "<p>現在時刻：{{ datetime }}</p>"),
            (
                "account.html",
                "<form method='post'><input name='user'><input name='pwd'></form>",
            ),
            ("welcome.html", "<h1>歡迎，{{ name }}！</h1>"),
        ]);
        let tz = FixedOffset::east_opt(8 * 3600).expect("UTC+8 is a valid offset");
        Self {
            config,
            templates,
            tz,
        }
    }
}
