//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "ai-panel";
const PROJECT_FILES: [&str; 2] = ["panel.toml", ".panel.toml"];
const ENV_PREFIX: &str = "AI_PANEL_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `AI_PANEL_*` environment variables (`AI_PANEL_PANEL__TIMEOUT_SECS=10`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./panel.toml` or `./.panel.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/ai-panel/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path,
        )
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // An explicit path is merged even if missing, so a typo is reported
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/ai-panel/config.toml if set,
    /// otherwise falls back to ~/.config/ai-panel/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for --show-config)
    pub fn config_sources_report(explicit: Option<&Path>) -> String {
        let mut out = String::from("Configuration sources (in priority order):\n");

        let _ = writeln!(out, "  [ENV  ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            let _ = writeln!(out, "  [{}] --config: {}", mark, path.display());
        }

        match Self::project_config_path() {
            Some(path) => {
                let _ = writeln!(out, "  [FOUND] Project: {}", path.display());
            }
            None => {
                let _ = writeln!(out, "  [     ] Project: ./panel.toml or ./.panel.toml");
            }
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            let _ = writeln!(out, "  [{}] Global:  {}", mark, path.display());
        }

        out.push_str("  [     ] Default: built-in defaults\n");
        out
    }
}
