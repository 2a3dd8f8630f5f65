//! Persisted client configuration.
//!
//! A small JSON record `{server, port, theme}` written when the address
//! form is submitted on a first run and read back on later starts. Only
//! the resolved address ever reaches the network layer; the file itself is
//! a presentation concern.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tincan_core::{AddressErrors, PeerAddr};

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "files/config.json";

/// Errors from loading or storing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem error other than a missing file.
    #[error("config file I/O: {0}")]
    Io(#[from] io::Error),
    /// The file exists but does not parse as a config record.
    #[error("config file malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Persisted connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Server host as entered, a dotted quad.
    pub server: String,
    /// Server port.
    pub port: u16,
    /// Palette name; defaults when the field is missing.
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    "default".to_owned()
}

impl ChatConfig {
    /// Build the record for an address picked in the form.
    #[must_use]
    pub fn for_addr(addr: PeerAddr) -> Self {
        Self {
            server: addr.host.to_string(),
            port: addr.port,
            theme: default_theme(),
        }
    }

    /// Validate the stored address.
    ///
    /// Stored files come from old runs or hand edits, so they go through
    /// the same classification as interactive input. The port is typed and
    /// cannot fail; only the host can.
    ///
    /// # Errors
    ///
    /// Returns the per-field [`AddressErrors`] when the host is not a
    /// dotted quad.
    pub fn peer_addr(&self) -> Result<PeerAddr, AddressErrors> {
        let errors = AddressErrors::check(&self.server, &self.port.to_string());
        match self.server.parse() {
            Ok(host) if errors.is_valid() => Ok(PeerAddr::new(host, self.port)),
            _ => Err(errors),
        }
    }
}

/// Read the config. A missing file is `Ok(None)`: a first run.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file exists but cannot be read or
/// parsed.
pub fn load(path: &Path) -> Result<Option<ChatConfig>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Write the config, creating the parent directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the directory or file cannot be
/// written.
pub fn store(path: &Path, config: &ChatConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(fs::write(path, serde_json::to_string(config)?)?)
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = ChatConfig {
            server: "192.168.1.7".to_owned(),
            port: 9092,
            theme: "default".to_owned(),
        };

        store(&path, &config).unwrap();
        assert_eq!(load(&path).unwrap(), Some(config));
    }

    #[test]
    fn missing_file_is_a_first_run() {
        let dir = tempdir().unwrap();
        assert_eq!(load(&dir.path().join("config.json")).unwrap(), None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load(&path), Err(ConfigError::Malformed(_))));
    }

    #[test]
    fn theme_field_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"server": "10.0.0.1", "port": 4000}"#).unwrap();

        let config = load(&path).unwrap().unwrap();
        assert_eq!(config.theme, "default");
        assert_eq!(config.peer_addr().unwrap(), PeerAddr::new(Ipv4Addr::new(10, 0, 0, 1), 4000));
    }

    #[test]
    fn store_creates_the_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("files").join("config.json");
        let addr = PeerAddr::new(Ipv4Addr::LOCALHOST, 9092);

        store(&path, &ChatConfig::for_addr(addr)).unwrap();
        assert_eq!(load(&path).unwrap().unwrap().peer_addr().unwrap(), addr);
    }

    #[test]
    fn stale_addresses_classify_like_form_input() {
        let config = ChatConfig {
            server: "256.1.1.1".to_owned(),
            port: 9092,
            theme: "default".to_owned(),
        };
        let errors = config.peer_addr().unwrap_err();
        assert!(errors.invalid_host());
        assert!(!errors.invalid_port());
    }
}
