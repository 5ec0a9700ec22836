//! CLI Configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub default_format: Option<String>,
    pub timeout_secs: Option<u64>,
    pub exclusive: Option<bool>,
    pub schema: Option<String>,
}

impl Config {
    pub const KEYS: [&'static str; 5] = ["api_url", "default_format", "timeout_secs", "exclusive", "schema"];

    pub fn load(profile: Option<&str>) -> Result<Self, String> {
        let path = Self::config_path(profile)?;
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| e.to_string())?;
            toml::from_str(&content).map_err(|e| e.to_string())
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf, String> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, content).map_err(|e| e.to_string())?;
        Ok(path)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(match key {
            "api_url" => self.api_url.clone(),
            "default_format" => self.default_format.clone(),
            "timeout_secs" => self.timeout_secs.map(|t| t.to_string()),
            "exclusive" => self.exclusive.map(|e| e.to_string()),
            "schema" => self.schema.clone(),
            _ => return Err(format!("Unknown config key: {}", key)),
        })
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), String> {
        match key {
            "api_url" => self.api_url = Some(value),
            "default_format" => self.default_format = Some(value),
            "timeout_secs" => {
                let secs = value
                    .parse()
                    .map_err(|_| format!("timeout_secs must be a whole number, got `{}`", value))?;
                self.timeout_secs = Some(secs);
            }
            "exclusive" => {
                let exclusive = value
                    .parse()
                    .map_err(|_| format!("exclusive must be true or false, got `{}`", value))?;
                self.exclusive = Some(exclusive);
            }
            "schema" => self.schema = Some(value),
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf, String> {
        let home = dirs::home_dir().ok_or("Cannot find home directory")?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".cropsense").join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();
        config.set("api_url", "http://localhost:5000".into()).unwrap();
        config.set("timeout_secs", "5".into()).unwrap();
        config.set("exclusive", "true".into()).unwrap();

        assert_eq!(config.get("api_url").unwrap().as_deref(), Some("http://localhost:5000"));
        assert_eq!(config.get("timeout_secs").unwrap().as_deref(), Some("5"));
        assert_eq!(config.exclusive, Some(true));
        assert_eq!(config.get("schema").unwrap(), None);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("timeout_secs", "soon".into()).is_err());
        assert!(config.set("exclusive", "maybe".into()).is_err());
        assert!(config.set("tenant_id", "x".into()).is_err());
        assert!(config.get("tenant_id").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.set("default_format", "json".into()).unwrap();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.default_format.as_deref(), Some("json"));
    }
}
