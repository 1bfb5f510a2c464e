use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const ENV_PREFIX: &str = "MAN2SITE";
pub const DEFAULT_RENDERER: &str = "mandoc";
pub const DEFAULT_REPO_URL: &str = "https://github.com/openzfs/zfs/";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Program invoked as `<renderer> -T html -O fragment <page>`.
    pub renderer: String,
    /// Repository the man sources live in; `github_url` links are built on it.
    pub repo_url: String,
    /// Draw a progress bar while rendering.
    pub progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            renderer: DEFAULT_RENDERER.to_string(),
            repo_url: DEFAULT_REPO_URL.to_string(),
            progress: true,
        }
    }
}

impl Settings {
    /// Defaults, then `file` if given, then `MAN2SITE_*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Settings> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("renderer", defaults.renderer)?
            .set_default("repo_url", defaults.repo_url)?
            .set_default("progress", defaults.progress)?;
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        Ok(settings.normalized())
    }

    /// Command-line values win over every other layer.
    pub fn with_overrides(
        mut self,
        renderer: Option<String>,
        repo_url: Option<String>,
        no_progress: bool,
    ) -> Self {
        if let Some(renderer) = renderer {
            self.renderer = renderer;
        }
        if let Some(repo_url) = repo_url {
            self.repo_url = repo_url;
        }
        if no_progress {
            self.progress = false;
        }
        self.normalized()
    }

    /// Ensure `repo_url` ends with exactly one `/` so paths can be appended.
    pub fn normalized(mut self) -> Self {
        let trimmed = self.repo_url.trim_end_matches('/');
        self.repo_url = format!("{}/", trimmed);
        self
    }
}
