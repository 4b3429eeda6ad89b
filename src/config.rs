use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".comptreerc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory the component files are discovered under.
    #[serde(default = "default_source_root")]
    pub source_root: String,
    /// Stable ancestor that template paths are rooted at.
    #[serde(default = "default_anchor")]
    pub anchor: String,
    /// Logical application name, used in the output file name.
    #[serde(default = "default_app")]
    pub app: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_declaration_suffix")]
    pub declaration_suffix: String,
    #[serde(default = "default_markup_suffix")]
    pub markup_suffix: String,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    /// Drop top-level components that have no children from the output.
    #[serde(default)]
    pub prune_leaves: bool,
}

fn default_source_root() -> String {
    "./src/app".to_string()
}

fn default_anchor() -> String {
    "src/app".to_string()
}

fn default_app() -> String {
    "app".to_string()
}

fn default_output_dir() -> String {
    "./public/data".to_string()
}

fn default_declaration_suffix() -> String {
    ".component.ts".to_string()
}

fn default_markup_suffix() -> String {
    ".component.html".to_string()
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            anchor: default_anchor(),
            app: default_app(),
            output_dir: default_output_dir(),
            declaration_suffix: default_declaration_suffix(),
            markup_suffix: default_markup_suffix(),
            ignores: default_ignores(),
            prune_leaves: false,
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if self.declaration_suffix.is_empty() {
            bail!("'declarationSuffix' must not be empty");
        }
        if self.markup_suffix.is_empty() {
            bail!("'markupSuffix' must not be empty");
        }
        if self.declaration_suffix == self.markup_suffix {
            bail!("'declarationSuffix' and 'markupSuffix' must differ");
        }

        if self.app.is_empty() || self.app.contains(['/', '\\']) {
            bail!("Invalid 'app' name: \"{}\"", self.app);
        }

        Ok(())
    }

    /// Path of the JSON document for this app, e.g. `./public/data/portal-data.json`.
    pub fn output_file(&self) -> PathBuf {
        Path::new(&self.output_dir).join(format!("{}-data.json", self.app))
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
    /// Directory relative paths in the config are resolved against: the
    /// config file's directory, or the search start when using defaults.
    pub base_dir: PathBuf,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                from_file: true,
                base_dir,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
            base_dir: start_dir.to_path_buf(),
        }),
    }
}
