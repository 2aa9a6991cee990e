use std::{env, str::FromStr};

use crate::error::ConfigError;

/// Runtime settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub body_limit_bytes: usize,
    pub min_images: usize,
    pub leaf_model: ModelSource,
    pub palm_model: ModelSource,
    pub input_op: String,
    pub output_op: String,
}

/// Where a frozen graph lives on disk and, optionally, where to fetch it from.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSource {
    pub path: String,
    pub url: Option<String>,
    pub url_var: &'static str,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let body_limit_mb: usize =
            parse_or(&lookup, "BODY_LIMIT_MB", 20, "a valid integer")?;
        let port = parse_or(&lookup, "PORT", 5020, "a valid number between 0 and 65535")?;
        let min_images = parse_or(&lookup, "MIN_IMAGES", 3, "a positive integer")?;
        if min_images == 0 {
            return Err(ConfigError::Invalid {
                name: "MIN_IMAGES",
                expected: "a positive integer",
                value: "0".into(),
            });
        }

        Ok(Config {
            port,
            body_limit_bytes: body_limit_mb * 1024 * 1024,
            min_images,
            leaf_model: ModelSource {
                path: lookup("LEAF_MODEL_PATH").unwrap_or_else(|| "./model/leaf_model.pb".into()),
                url: lookup("LEAF_MODEL_URL"),
                url_var: "LEAF_MODEL_URL",
            },
            palm_model: ModelSource {
                path: lookup("PALM_MODEL_PATH").unwrap_or_else(|| "./model/palm_model.pb".into()),
                url: lookup("PALM_MODEL_URL"),
                url_var: "PALM_MODEL_URL",
            },
            input_op: lookup("MODEL_INPUT_OP").unwrap_or_else(|| "x".into()),
            output_op: lookup("MODEL_OUTPUT_OP").unwrap_or_else(|| "Identity".into()),
        })
    }
}

fn parse_or<F, T>(
    lookup: &F,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.port, 5020);
        assert_eq!(config.body_limit_bytes, 20 * 1024 * 1024);
        assert_eq!(config.min_images, 3);
        assert_eq!(config.leaf_model.path, "./model/leaf_model.pb");
        assert_eq!(config.leaf_model.url, None);
        assert_eq!(config.input_op, "x");
        assert_eq!(config.output_op, "Identity");
    }

    #[test]
    fn overrides_are_read() {
        let config = config_with(&[
            ("PORT", "8080"),
            ("BODY_LIMIT_MB", "2"),
            ("PALM_MODEL_URL", "https://example.com/palm.pb"),
            ("MIN_IMAGES", "5"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.body_limit_bytes, 2 * 1024 * 1024);
        assert_eq!(config.min_images, 5);
        assert_eq!(
            config.palm_model.url.as_deref(),
            Some("https://example.com/palm.pb")
        );
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = config_with(&[("PORT", "99999")]).unwrap_err();
        assert!(err.to_string().starts_with("PORT must be"));
    }

    #[test]
    fn zero_min_images_is_rejected() {
        assert!(config_with(&[("MIN_IMAGES", "0")]).is_err());
    }
}
