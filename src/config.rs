//! Configuration handling for the portal

use crate::services::{
    generate_user_id, Identity, UploadPolicy, DEFAULT_CHECKOUT_NAME, DEFAULT_MAX_UPLOAD_BYTES,
};
use crate::state::UserRole;
use anyhow::Result;
use chrono::Utc;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Overrides the record file location
pub const STORE_PATH_ENV: &str = "REGIPRO_STORE_PATH";

/// Overrides the user directory location
pub const USERS_PATH_ENV: &str = "REGIPRO_USERS_PATH";

const RECORDS_FILE: &str = "records.json";
const USERS_FILE: &str = "users.json";

/// User configuration for the portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PortalConfig {
    /// Record file location
    pub store_path: Option<PathBuf>,
    /// User directory location
    pub users_path: Option<PathBuf>,
    /// Account id, minted on first run
    pub uid: Option<String>,
    /// Customer id, minted on first run
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    /// Role given to this account when it first registers
    pub role: Option<UserRole>,
    /// Largest accepted attachment in bytes
    pub max_upload_bytes: Option<u64>,
    /// Accepted attachment extensions, without the dot
    pub accepted_extensions: Option<Vec<String>>,
    /// Merchant name shown on the checkout
    pub checkout_name: Option<String>,
}

impl PortalConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("in", "regipro", "regipro-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: PortalConfig = serde_json::from_str(&content)?;
            return Ok(config);
        }
        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Record file: environment, then config, then the platform data dir
    pub fn store_path(&self) -> PathBuf {
        self.resolve_store_path(std::env::var_os(STORE_PATH_ENV).map(PathBuf::from))
    }

    fn resolve_store_path(&self, env_override: Option<PathBuf>) -> PathBuf {
        Self::resolve(env_override, self.store_path.as_ref(), RECORDS_FILE)
    }

    /// User directory: environment, then config, then the platform data dir
    pub fn users_path(&self) -> PathBuf {
        self.resolve_users_path(std::env::var_os(USERS_PATH_ENV).map(PathBuf::from))
    }

    fn resolve_users_path(&self, env_override: Option<PathBuf>) -> PathBuf {
        Self::resolve(env_override, self.users_path.as_ref(), USERS_FILE)
    }

    fn resolve(env_override: Option<PathBuf>, configured: Option<&PathBuf>, file: &str) -> PathBuf {
        env_override
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| configured.cloned())
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().join(file)))
            .unwrap_or_else(|| PathBuf::from(file))
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        let defaults = UploadPolicy::default();
        UploadPolicy::new(
            self.accepted_extensions
                .clone()
                .unwrap_or(defaults.accepted_extensions),
            self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        )
    }

    pub fn checkout_name(&self) -> &str {
        self.checkout_name.as_deref().unwrap_or(DEFAULT_CHECKOUT_NAME)
    }

    /// Identity of the local user. Returns true when an id was minted and
    /// the config needs saving.
    pub fn identity(&mut self) -> (Identity, bool) {
        let minted = self.uid.is_none() || self.user_id.is_none();
        let uid = self
            .uid
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        let user_id = self
            .user_id
            .get_or_insert_with(|| generate_user_id(Utc::now()))
            .clone();
        let display_name = self.display_name.clone().unwrap_or_default();
        let identity =
            Identity::new(uid, user_id, display_name).with_role(self.role.unwrap_or_default());
        (identity, minted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = PortalConfig::default();
        assert!(config.store_path.is_none());
        assert!(config.user_id.is_none());
        assert_eq!(config.checkout_name(), "RegiPRO Government Services");
        assert_eq!(config.upload_policy(), UploadPolicy::default());
    }

    #[test]
    fn test_serialization() {
        let config = PortalConfig {
            store_path: Some(PathBuf::from("/tmp/records.json")),
            users_path: Some(PathBuf::from("/tmp/users.json")),
            uid: Some("u-1".to_string()),
            user_id: Some("USR-2024-101".to_string()),
            display_name: Some("Asha".to_string()),
            role: Some(UserRole::Admin),
            max_upload_bytes: Some(1024),
            accepted_extensions: Some(vec!["pdf".to_string()]),
            checkout_name: None,
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"max_upload_bytes\":1024"));
        assert!(json.contains("\"role\":\"admin\""));
        let parsed: PortalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: PortalConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, PortalConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        let json = r#"{"user_id": "USR-2024-002", "theme": "dark"}"#;
        let parsed: PortalConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.user_id.as_deref(), Some("USR-2024-002"));
    }

    #[test]
    fn test_save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        assert_eq!(PortalConfig::load_from(&path).unwrap(), PortalConfig::default());

        let config = PortalConfig {
            display_name: Some("Asha".to_string()),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(PortalConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_store_path_precedence() {
        let config = PortalConfig {
            store_path: Some(PathBuf::from("/data/records.json")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_store_path(Some(PathBuf::from("/env/records.json"))),
            PathBuf::from("/env/records.json")
        );
        assert_eq!(
            config.resolve_store_path(Some(PathBuf::new())),
            PathBuf::from("/data/records.json")
        );
        assert_eq!(
            config.resolve_store_path(None),
            PathBuf::from("/data/records.json")
        );
        assert!(PortalConfig::default()
            .resolve_store_path(None)
            .ends_with("records.json"));
    }

    #[test]
    fn test_users_path_precedence() {
        let config = PortalConfig {
            users_path: Some(PathBuf::from("/data/users.json")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_users_path(Some(PathBuf::from("/env/users.json"))),
            PathBuf::from("/env/users.json")
        );
        assert_eq!(
            config.resolve_users_path(None),
            PathBuf::from("/data/users.json")
        );
        assert!(PortalConfig::default()
            .resolve_users_path(None)
            .ends_with("users.json"));
    }

    #[test]
    fn test_identity_mints_once() {
        let mut config = PortalConfig::default();
        let (first, minted) = config.identity();
        assert!(minted);
        assert!(first.user_id.starts_with("USR-"));
        assert!(!first.uid.is_empty());
        assert_eq!(first.role, UserRole::Customer);

        let (second, minted) = config.identity();
        assert!(!minted);
        assert_eq!(second.user_id, first.user_id);
        assert_eq!(second.uid, first.uid);
    }

    #[test]
    fn test_identity_kept_across_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = PortalConfig {
            role: Some(UserRole::Superadmin),
            ..Default::default()
        };
        let (first, _) = config.identity();
        config.save_to(&path).unwrap();

        let mut reloaded = PortalConfig::load_from(&path).unwrap();
        let (second, minted) = reloaded.identity();
        assert!(!minted);
        assert_eq!(second, first);
        assert_eq!(second.role, UserRole::Superadmin);
    }

    #[test]
    fn test_upload_policy_overrides() {
        let config = PortalConfig {
            max_upload_bytes: Some(512),
            accepted_extensions: Some(vec![".PDF".to_string()]),
            ..Default::default()
        };
        let policy = config.upload_policy();
        assert_eq!(policy.accepted_extensions, vec!["pdf".to_string()]);
        assert_eq!(policy.max_bytes, 512);
    }
}
