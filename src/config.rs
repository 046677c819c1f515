//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/argoeks/argoeks.toml`
//! 3. Repository config: `<repo_root>/.argoeks.toml`
//! 4. Environment variables: `ARGOEKS_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, normalize_name, DocumentRegistry};

/// Repository-level config file name.
pub const LOCAL_CONFIG_FILE: &str = ".argoeks.toml";

/// Files marking a repository root during discovery.
const ROOT_MARKERS: [&str; 2] = [LOCAL_CONFIG_FILE, ".git"];

/// Values used when `--env` / `--region` are omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Defaults {
    pub env: String,
    pub region: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            env: "dev".into(),
            region: "us-east-1".into(),
        }
    }
}

/// Raw defaults for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDefaults {
    pub env: Option<String>,
    pub region: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub repo_root: Option<PathBuf>,
    pub make: Option<String>,
    pub pager: Option<String>,
    pub freshness_script: Option<PathBuf>,
    pub defaults: RawDefaults,
    pub docs: BTreeMap<String, PathBuf>,
}

/// Unified configuration for argoeks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Repository root; children run here and document paths resolve against it
    pub repo_root: PathBuf,
    /// Program behind `env` actions (default: make)
    pub make: String,
    /// Program paging `docs open` (default: less)
    pub pager: String,
    /// Freshness-check script run by `docs status`, relative to `repo_root`
    pub freshness_script: PathBuf,
    /// Fallbacks for omitted `--env` / `--region`
    pub defaults: Defaults,
    /// Document registry: display name -> path relative to `repo_root`
    pub docs: BTreeMap<String, PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Self {
            repo_root: discover_repo_root(&cwd),
            make: "make".into(),
            pager: "less".into(),
            freshness_script: PathBuf::from("automation/scripts/check_docs_freshness.sh"),
            defaults: Defaults::default(),
            docs: default_docs(),
        }
    }
}

/// Compiled document registry.
pub fn default_docs() -> BTreeMap<String, PathBuf> {
    [
        ("quick start", "docs/QuickStart.md"),
        ("readme", "README.md"),
        ("architecture", "docs/Architecture.md"),
        ("troubleshooting", "docs/Troubleshooting.md"),
    ]
    .into_iter()
    .map(|(name, path)| (name.to_string(), PathBuf::from(path)))
    .collect()
}

/// Merge document tables with union semantics and negation support.
///
/// - Entries from overlay are added to base, replacing an entry with the same
///   normalized name
/// - A key prefixed with `!` removes the corresponding entry from the result
///
/// # Examples
/// ```ignore
/// merge_docs({readme: README.md}, {runbook: docs/Runbook.md}) // → both
/// merge_docs({readme: README.md}, {"!README": ""})            // → {}
/// ```
pub fn merge_docs(
    base: &BTreeMap<String, PathBuf>,
    overlay: &BTreeMap<String, PathBuf>,
) -> BTreeMap<String, PathBuf> {
    let mut result = base.clone();

    for (name, path) in overlay {
        let (removal, key) = match name.strip_prefix('!') {
            Some(negated) => (true, negated),
            None => (false, name.as_str()),
        };
        let normalized = normalize_name(key);
        result.retain(|existing, _| normalize_name(existing) != normalized);
        if !removal {
            result.insert(name.clone(), path.clone());
        }
    }

    result
}

/// Nearest ancestor of `start` holding a root marker, else `start` itself.
pub fn discover_repo_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| ROOT_MARKERS.iter().any(|marker| dir.join(marker).exists()))
        .unwrap_or(start)
        .to_path_buf()
}

/// Get the XDG config directory for argoeks.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "argoeks").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("argoeks.toml"))
}

/// Get the path to the repository config file.
pub fn local_config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(expand_env_vars(path.to_string_lossy().as_ref()))
}

fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

impl Settings {
    /// Document registry built from the `docs` table.
    pub fn document_registry(&self) -> DocumentRegistry {
        self.docs
            .iter()
            .map(|(name, path)| (name.clone(), path.clone()))
            .collect()
    }

    /// Absolute path of the freshness-check script.
    pub fn freshness_script_path(&self) -> PathBuf {
        if self.freshness_script.is_absolute() {
            self.freshness_script.clone()
        } else {
            self.repo_root.join(&self.freshness_script)
        }
    }

    /// Path of this repository's config file.
    pub fn local_config_path(&self) -> PathBuf {
        local_config_path(&self.repo_root)
    }

    /// Expand shell variables and tilde in path-like fields.
    ///
    /// Handles `~`, `$VAR`, and `${VAR}` syntax.
    fn expand_paths(&mut self) {
        self.repo_root = absolutize(expand_path(&self.repo_root));
        self.freshness_script = expand_path(&self.freshness_script);

        // Program names may be paths like ~/bin/make
        self.make = expand_env_vars(&self.make);
        self.pager = expand_env_vars(&self.pager);
    }

    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Docs table: union merge with negation support
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            repo_root: overlay
                .repo_root
                .clone()
                .unwrap_or_else(|| self.repo_root.clone()),
            make: overlay.make.clone().unwrap_or_else(|| self.make.clone()),
            pager: overlay.pager.clone().unwrap_or_else(|| self.pager.clone()),
            freshness_script: overlay
                .freshness_script
                .clone()
                .unwrap_or_else(|| self.freshness_script.clone()),
            defaults: Defaults {
                env: overlay
                    .defaults
                    .env
                    .clone()
                    .unwrap_or_else(|| self.defaults.env.clone()),
                region: overlay
                    .defaults
                    .region
                    .clone()
                    .unwrap_or_else(|| self.defaults.region.clone()),
            },
            docs: merge_docs(&self.docs, &overlay.docs),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `repo_root` - Explicit repository root (`-C` / `ARGOEKS_REPO_ROOT`)
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/argoeks/argoeks.toml`
    /// 3. Repository config: `<repo_root>/.argoeks.toml`
    /// 4. Environment variables: `ARGOEKS_*` prefix
    ///
    /// The repository root itself comes from the explicit argument, else the
    /// global config, else discovery from the working directory. A
    /// `repo_root` key inside the repository config is ignored.
    pub fn load(repo_root: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(root) = repo_root {
            current.repo_root = root.to_path_buf();
        }
        let root = absolutize(expand_path(&current.repo_root));

        let local_path = local_config_path(&root);
        if local_path.exists() {
            debug!("load: repository config {}", local_path.display());
            let raw = load_raw_settings(&local_path)?;
            current = current.merge_with(&raw);
        }

        current = current.merge_with(&Self::env_overrides()?);
        current.repo_root = root;

        current.expand_paths();
        debug!("load: repo_root={}", current.repo_root.display());

        // Children run in repo_root, so it must exist before anything spawns
        if !current.repo_root.is_dir() {
            return Err(ApplicationError::Config {
                message: format!(
                    "repository root {} is not a directory",
                    current.repo_root.display()
                ),
            });
        }

        Ok(current)
    }

    /// Read ARGOEKS_* environment variables as explicit overrides.
    ///
    /// The repository root is handled by the CLI (`ARGOEKS_REPO_ROOT`).
    fn env_overrides() -> Result<RawSettings, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ARGOEKS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let mut raw = RawSettings::default();
        if let Ok(val) = config.get_string("make") {
            raw.make = Some(val);
        }
        if let Ok(val) = config.get_string("pager") {
            raw.pager = Some(val);
        }
        if let Ok(val) = config.get_string("freshness_script") {
            raw.freshness_script = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("defaults.env") {
            raw.defaults.env = Some(val);
        }
        if let Ok(val) = config.get_string("defaults.region") {
            raw.defaults.region = Some(val);
        }

        Ok(raw)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# argoeks configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/argoeks/argoeks.toml  (personal baseline)
#   Repo:   <repo_root>/.argoeks.toml       (repository additions)
#   Env:    ARGOEKS_* environment variables (explicit overrides,
#           nested keys use "__", e.g. ARGOEKS_DEFAULTS__REGION)
#
# The [docs] table merges across layers. Use "!name" to REMOVE an
# inherited document:
#   "!troubleshooting" = ""

# Repository root (global config only; default: discovered from cwd)
# repo_root = "~/src/argoeks"

# Program behind `env` actions
# make = "make"

# Pager for `docs open`
# pager = "less"

# Freshness check run by `docs status`, relative to repo_root
# freshness_script = "automation/scripts/check_docs_freshness.sh"

[defaults]
# env = "dev"
# region = "us-east-1"

[docs]
# "quick start" = "docs/QuickStart.md"
# readme = "README.md"
"#
        .to_string()
    }
}

/// Convert config crate errors to ApplicationError.
fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
