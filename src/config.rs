use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::env;
use config; // Explicitly import the config crate

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub web: WebConfig,
    // Everything below is populated from the .env file
    pub database_path: String,
    pub media_path: String,
    pub site_url: String,
    pub allowed_origins: String,
    pub log_level: String,
    pub session_secret_key: String,
    pub use_secure_cookies: bool,
    pub max_upload_size_mb: u64,
}

fn required_var(name: &str) -> Result<String, config::ConfigError> {
    env::var(name).map_err(|_| config::ConfigError::Message(format!(
        "FATAL: Environment variable '{}' is not set in your .env file.", name
    )))
}

fn require_absolute(name: &str, value: &str) -> Result<(), config::ConfigError> {
    if Path::new(value).is_relative() {
        return Err(config::ConfigError::Message(format!(
            "FATAL: The '{}' in your .env file is a relative path ('{}'). It MUST be an absolute path.",
            name, value
        )));
    }
    Ok(())
}

impl Config {
    pub fn from_env(env_path: &Path) -> Result<Self, config::ConfigError> {
        dotenvy::from_path(env_path)
            .map_err(|e| config::ConfigError::Message(format!(
                "FATAL: Failed to load .env file from '{}'. Error: {}", env_path.display(), e
            )))?;

        let database_path = required_var("DATABASE_PATH")?;
        let media_path = required_var("MEDIA_PATH")?;
        let session_secret_key = required_var("SESSION_SECRET_KEY")?;

        // 128 hex characters decode to the 64 byte key actix-session needs.
        if session_secret_key.len() != 128 || !session_secret_key.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(config::ConfigError::Message(
                "FATAL: 'SESSION_SECRET_KEY' must be 128 hexadecimal characters long (64 bytes).".to_string()
            ));
        }

        let site_url = env::var("SITE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let allowed_origins = env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "".to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        // The session cookie is secure unless explicitly turned off for local http.
        let use_secure_cookies = env::var("USE_SECURE_COOKIES")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .unwrap_or(true);

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(25);

        require_absolute("DATABASE_PATH", &database_path)?;
        require_absolute("MEDIA_PATH", &media_path)?;

        let builder = config::Config::builder()
            // Web host/port live in the TOML file.
            .add_source(config::File::new("config/default.toml", config::FileFormat::Toml))
            .set_override("database_path", database_path)?
            .set_override("media_path", media_path)?
            .set_override("site_url", site_url)?
            .set_override("session_secret_key", session_secret_key)?
            .set_override("allowed_origins", allowed_origins)?
            .set_override("log_level", log_level)?
            .set_override("use_secure_cookies", use_secure_cookies)?
            .set_override("max_upload_size_mb", max_upload_size_mb)?
            .build()?;

        builder.try_deserialize()
    }

    /// Returns the full path to the admin accounts database file inside its own folder.
    pub fn accounts_db_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
            .join("accounts")
            .join("accounts.db")
    }

    /// Returns the full path to the content documents database file inside its own folder.
    pub fn documents_db_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
            .join("documents")
            .join("documents.db")
    }

    /// Root folder uploads are written to and served from under `/media`.
    pub fn media_root(&self) -> &Path {
        Path::new(&self.media_path)
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        (self.max_upload_size_mb as usize) * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            web: WebConfig { host: "127.0.0.1".to_string(), port: 8080 },
            database_path: "/var/lib/endfgm".to_string(),
            media_path: "/var/lib/endfgm/media".to_string(),
            site_url: "https://traveltoendfgm.org".to_string(),
            allowed_origins: String::new(),
            log_level: "info".to_string(),
            session_secret_key: "ab".repeat(64),
            use_secure_cookies: true,
            max_upload_size_mb: 2,
        }
    }

    #[test]
    fn database_files_live_in_their_own_folders() {
        let config = sample();
        assert_eq!(config.documents_db_path(), PathBuf::from("/var/lib/endfgm/documents/documents.db"));
        assert_eq!(config.accounts_db_path(), PathBuf::from("/var/lib/endfgm/accounts/accounts.db"));
    }

    #[test]
    fn upload_limit_is_converted_to_bytes() {
        assert_eq!(sample().max_upload_size_bytes(), 2 * 1024 * 1024);
    }

    #[test]
    fn relative_paths_are_rejected() {
        assert!(require_absolute("MEDIA_PATH", "media").is_err());
        assert!(require_absolute("MEDIA_PATH", "/srv/media").is_ok());
    }
}
