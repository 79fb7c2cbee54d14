/// Adresa produkčního KSP API
pub const DEFAULT_API_URL: &str = "https://ksp.mff.cuni.cz/api/";
/// Jméno souboru s API tokenem v konfiguračním adresáři
pub const TOKEN_FILE_NAME: &str = "ksp-api-token";
/// Jméno volitelného souboru s nastavením v konfiguračním adresáři
pub const SETTINGS_FILE_NAME: &str = "ksp-klient.toml";

use serde::Deserialize;
use std::env;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::messages::{fill, Msg};

/// Konfigurační adresář (`~/.config` nebo `$XDG_CONFIG_HOME`)
pub fn get_config_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        dirs::config_dir().unwrap_or_else(|| PathBuf::from("."))
    } else {
        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
    }
}

/// Výchozí umístění souboru s tokenem
pub fn get_token_file() -> PathBuf {
    get_config_dir().join(TOKEN_FILE_NAME)
}

/// Výchozí umístění souboru s nastavením
pub fn get_settings_file() -> PathBuf {
    get_config_dir().join(SETTINGS_FILE_NAME)
}

/// Obsah souboru `ksp-klient.toml`, všechny položky jsou nepovinné
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub api_url: Option<String>,
    pub token_path: Option<PathBuf>,
    pub training_ground: Option<bool>,
}

#[derive(Debug)]
pub struct SettingsError {
    path: PathBuf,
    source: Box<dyn Error>,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            fill(Msg::SettingsInvalid, &[&self.path.display()]),
            self.source
        )
    }
}

impl Error for SettingsError {}

impl Settings {
    /// Načte nastavení; chybějící soubor znamená výchozí hodnoty
    pub fn load(path: &Path) -> Result<Settings, SettingsError> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let wrap = |source: Box<dyn Error>| SettingsError {
            path: path.to_path_buf(),
            source,
        };
        let content = fs::read_to_string(path).map_err(|e| wrap(e.into()))?;
        toml::from_str(&content).map_err(|e| wrap(e.into()))
    }
}

/// Výsledná konfigurace klienta po sloučení příkazové řádky, souboru a výchozích hodnot
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub token_path: PathBuf,
    pub training_ground: bool,
}

impl ClientConfig {
    /// Přednost má příkazová řádka, potom soubor s nastavením, nakonec výchozí hodnoty
    pub fn resolve(
        api_url: Option<String>,
        training_ground: bool,
        settings: Settings,
    ) -> ClientConfig {
        let api_url = api_url
            .or(settings.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        ClientConfig {
            api_url: normalize_api_url(&api_url),
            token_path: settings.token_path.unwrap_or_else(get_token_file),
            training_ground: training_ground || settings.training_ground.unwrap_or(false),
        }
    }
}

/// Cesty k endpointům se připojují za adresu, proto musí končit lomítkem
pub fn normalize_api_url(api_url: &str) -> String {
    if api_url.ends_with('/') {
        api_url.to_string()
    } else {
        format!("{}/", api_url)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_get_token_file_with_xdg_config_home() {
        if cfg!(target_os = "linux") {
            let original = env::var_os("XDG_CONFIG_HOME");
            let temp_xdg_config = "/tmp/mock_xdg_config";
            env::set_var("XDG_CONFIG_HOME", temp_xdg_config);
            let token_path = get_token_file();
            let expected_path = PathBuf::from(temp_xdg_config).join("ksp-api-token");
            assert_eq!(token_path, expected_path);

            // obnovení proměnné prostředí
            match original {
                Some(value) => env::set_var("XDG_CONFIG_HOME", value),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_get_token_file_without_xdg_config_home() {
        if cfg!(target_os = "linux") {
            let original = env::var_os("XDG_CONFIG_HOME");
            env::remove_var("XDG_CONFIG_HOME");
            let token_path = get_token_file();

            let home = dirs::home_dir().expect("domovský adresář není k dispozici");
            assert_eq!(token_path, home.join(".config/ksp-api-token"));

            if let Some(value) = original {
                env::set_var("XDG_CONFIG_HOME", value);
            }
        }
    }

    #[test]
    fn test_settings_missing_file_gives_defaults() {
        let work_dir = tempfile::tempdir().expect("");
        let settings = Settings::load(&work_dir.path().join("ksp-klient.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_load() {
        let work_dir = tempfile::tempdir().expect("");
        let path = work_dir.path().join("ksp-klient.toml");
        fs::write(
            &path,
            r#"
api_url = "http://localhost:8000/api"
token_path = "/tmp/token"
training_ground = true
"#,
        )
        .unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.api_url.as_deref(), Some("http://localhost:8000/api"));
        assert_eq!(settings.token_path, Some(PathBuf::from("/tmp/token")));
        assert_eq!(settings.training_ground, Some(true));
    }

    #[test]
    fn test_settings_invalid_file() {
        let work_dir = tempfile::tempdir().expect("");
        let path = work_dir.path().join("ksp-klient.toml");
        fs::write(&path, "api_url = [").unwrap();
        let result = Settings::load(&path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("je poškozený"));
    }

    #[test]
    fn test_resolve_prefers_command_line() {
        let settings = Settings {
            api_url: Some("http://from-file/api/".to_string()),
            token_path: Some(PathBuf::from("/tmp/token")),
            training_ground: Some(false),
        };
        let config = ClientConfig::resolve(
            Some("http://from-cli/api".to_string()),
            true,
            settings,
        );
        assert_eq!(config.api_url, "http://from-cli/api/");
        assert_eq!(config.token_path, PathBuf::from("/tmp/token"));
        assert!(config.training_ground);
    }

    #[test]
    fn test_resolve_defaults() {
        let config = ClientConfig::resolve(None, false, Settings::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(!config.training_ground);
    }

    #[test]
    fn test_normalize_api_url() {
        assert_eq!(normalize_api_url("http://a/api"), "http://a/api/");
        assert_eq!(normalize_api_url("http://a/api/"), "http://a/api/");
    }
}
