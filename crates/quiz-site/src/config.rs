use std::path::PathBuf;

use crate::error::AppError;

const OUTPUT_DIR: &str = "dist";
const FIELDS_FILE: &str = "fields.json";
const LOGO_FILE: &str = "logo.png";

/// Build configuration.
///
/// Only the two Notion credentials come from the environment (or a `.env`
/// file loaded beforehand); everything else is a fixed location relative to
/// the working directory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Notion integration token.
    pub notion_token: String,
    /// Database holding the questions.
    pub database_id: String,
    /// Directory the site is written to.
    pub output_dir: PathBuf,
    /// Optional field table overriding the built-in property names.
    pub fields_path: PathBuf,
    /// Optional image copied next to the page.
    pub logo_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `NOTION_API_KEY`: integration token
    /// - `NOTION_DATABASE_ID`: id of the question database
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |name: &str| {
            var(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::Config(format!("{name} environment variable is required")))
        };

        Ok(Self {
            notion_token: required("NOTION_API_KEY")?,
            database_id: required("NOTION_DATABASE_ID")?,
            output_dir: PathBuf::from(OUTPUT_DIR),
            fields_path: PathBuf::from(FIELDS_FILE),
            logo_path: PathBuf::from(LOGO_FILE),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_both_credentials() {
        let config = Config::from_vars(vars(&[
            ("NOTION_API_KEY", "secret_abc"),
            ("NOTION_DATABASE_ID", " db123 "),
        ]))
        .unwrap();
        assert_eq!(config.notion_token, "secret_abc");
        assert_eq!(config.database_id, "db123");
        assert_eq!(config.output_dir, PathBuf::from("dist"));
    }

    #[test]
    fn missing_or_blank_credential_is_an_error() {
        let err = Config::from_vars(vars(&[("NOTION_API_KEY", "x")])).unwrap_err();
        assert!(err.to_string().contains("NOTION_DATABASE_ID"));

        let err = Config::from_vars(vars(&[
            ("NOTION_API_KEY", ""),
            ("NOTION_DATABASE_ID", "db"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("NOTION_API_KEY"));
    }
}
