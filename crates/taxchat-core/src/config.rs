//! Configuration management for taxchat.
//!
//! Loads configuration from ${TAXCHAT_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Chat role for the role-aware flow.
///
/// Selects the starter suggestions and is forwarded to the backend with every
/// message so replies can be tailored to the audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Role {
    /// A taxpayer preparing their own return (default).
    #[default]
    IndividualUser,
    /// A professional reviewing returns for clients.
    TaxSpecialist,
}

impl Role {
    /// Returns the wire name sent to the backend (`role` field).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::IndividualUser => "IndividualUser",
            Role::TaxSpecialist => "TaxSpecialist",
        }
    }

    /// Returns all roles for iteration.
    pub fn all() -> &'static [Role] {
        &[Role::IndividualUser, Role::TaxSpecialist]
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "individualuser" | "individual-user" | "individual" => Ok(Role::IndividualUser),
            "taxspecialist" | "tax-specialist" | "specialist" => Ok(Role::TaxSpecialist),
            other => anyhow::bail!(
                "unknown role '{other}' (expected 'individual' or 'specialist')"
            ),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in starter suggestions for the individual flow.
const INDIVIDUAL_STARTERS: &[&str] = &[
    "Guide me with my Tax calculation",
    "What can I do for max refund?",
    "Missing any deductions to reduce my taxes",
    "List different retirement plans",
    "Provide Tax Optimization Checklist",
    "Provide strategies for AGI reduction",
    "Tax Planning for Next Year",
];

/// Built-in starter suggestions for the specialist flow.
const SPECIALIST_STARTERS: &[&str] = &[
    "Help review with tax calculation",
    "List missing deductions/provisions",
    "How to file for Income Tax?",
    "How to file FBAR?",
    "Payment/Refund process",
    "Tax Scenario Comparison",
];

/// Starter suggestion overrides, keyed by role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StartersConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub individual_user: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tax_specialist: Vec<String>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the chat backend.
    pub base_url: String,

    /// Chat role (starter selection + `role` field on send).
    ///
    /// None selects the anonymous flow: no `role` field on the wire and the
    /// individual starter list as the fallback.
    pub role: Option<Role>,

    /// Username used to derive session identifiers.
    pub username: Option<String>,

    /// Starter suggestion overrides.
    #[serde(default)]
    pub starters: StartersConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            role: None,
            username: None,
            starters: StartersConfig::default(),
        }
    }
}

impl Config {
    const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Initializes a config file with the commented default template.
    ///
    /// Fails if the file already exists (no silent overwrite).
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Returns the starter suggestions for the given role.
    ///
    /// Config overrides win; otherwise the built-in lists apply. The
    /// anonymous flow falls back to the individual list.
    pub fn starters_for(&self, role: Option<Role>) -> Vec<String> {
        let role = role.unwrap_or_default();
        let overrides = match role {
            Role::IndividualUser => &self.starters.individual_user,
            Role::TaxSpecialist => &self.starters.tax_specialist,
        };
        if !overrides.is_empty() {
            return overrides.clone();
        }
        let built_in = match role {
            Role::IndividualUser => INDIVIDUAL_STARTERS,
            Role::TaxSpecialist => SPECIALIST_STARTERS,
        };
        built_in.iter().map(|s| (*s).to_string()).collect()
    }
}

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for taxchat configuration and data directories.
    //!
    //! TAXCHAT_HOME resolution order:
    //! 1. TAXCHAT_HOME environment variable (if set)
    //! 2. ~/.config/taxchat (default)

    use std::path::PathBuf;

    /// Returns the taxchat home directory.
    ///
    /// Checks TAXCHAT_HOME env var first, falls back to ~/.config/taxchat
    pub fn taxchat_home() -> PathBuf {
        if let Ok(home) = std::env::var("TAXCHAT_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("taxchat"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        taxchat_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        taxchat_home().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.role, None);
        assert_eq!(config.username, None);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "role = \"TaxSpecialist\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.role, Some(Role::TaxSpecialist));
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("base_url"));
        assert!(contents.contains("# role ="));
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_default_template_parses_to_defaults() {
        let parsed: Config = toml::from_str(default_config_template()).unwrap();
        assert_eq!(parsed.base_url, Config::default().base_url);
        assert_eq!(parsed.role, None);
    }

    #[test]
    fn test_role_parsing_aliases() {
        assert_eq!("individual".parse::<Role>().unwrap(), Role::IndividualUser);
        assert_eq!("Specialist".parse::<Role>().unwrap(), Role::TaxSpecialist);
        assert_eq!(
            "TaxSpecialist".parse::<Role>().unwrap(),
            Role::TaxSpecialist
        );
        assert!("auditor".parse::<Role>().is_err());
    }

    #[test]
    fn test_starters_default_lists_differ_by_role() {
        let config = Config::default();
        let individual = config.starters_for(Some(Role::IndividualUser));
        let specialist = config.starters_for(Some(Role::TaxSpecialist));
        assert!(individual.contains(&"Tax Planning for Next Year".to_string()));
        assert!(specialist.contains(&"How to file FBAR?".to_string()));
        assert_ne!(individual, specialist);
    }

    #[test]
    fn test_starters_anonymous_flow_uses_individual_list() {
        let config = Config::default();
        assert_eq!(
            config.starters_for(None),
            config.starters_for(Some(Role::IndividualUser))
        );
    }

    #[test]
    fn test_starters_override_wins() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[starters]\nindividual_user = [\"Only one\"]\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(
            config.starters_for(Some(Role::IndividualUser)),
            vec!["Only one".to_string()]
        );
        // The other role still falls back to the built-ins.
        assert!(!config.starters_for(Some(Role::TaxSpecialist)).is_empty());
    }
}
