use serde::Deserialize;

/// Deployment environment, drives log formatting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReviewConfig {
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,
    #[serde(default)]
    pub env: Environment,
}

const fn default_max_connections() -> u32 {
    10
}

impl ReviewConfig {
    /// Read `DATABASE_URL`, `DB_MAX_CONNECTIONS` and `ENV` from the process
    /// environment. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Same as [`ReviewConfig::from_env`] over an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config =
            ReviewConfig::from_vars(vars(&[("DATABASE_URL", "postgres://localhost/afc")]))
                .unwrap();

        assert_eq!(config.database_url, "postgres://localhost/afc");
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.env, Environment::Development);
        assert!(config.env.is_development());
    }

    #[test]
    fn test_overrides() {
        let config = ReviewConfig::from_vars(vars(&[
            ("DATABASE_URL", "postgres://db/afc"),
            ("DB_MAX_CONNECTIONS", "25"),
            ("ENV", "production"),
        ]))
        .unwrap();

        assert_eq!(config.db_max_connections, 25);
        assert_eq!(config.env, Environment::Production);
        assert!(!config.env.is_development());
    }

    #[test]
    fn test_missing_database_url() {
        assert!(ReviewConfig::from_vars(vars(&[("ENV", "production")])).is_err());
    }

    #[test]
    fn test_unknown_environment() {
        let result = ReviewConfig::from_vars(vars(&[
            ("DATABASE_URL", "postgres://db/afc"),
            ("ENV", "staging"),
        ]));
        assert!(result.is_err());
    }
}
