use std::time::Duration;

pub use engine_validation::OperationLimits;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid engine configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Settings applied to every request executed by a schema.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Whether `__schema` and `__type` are available.
    pub introspection: bool,
    /// Limits on the size of operations.
    pub limits: OperationLimits,
    /// Deadline for each resolver call, counted from the start of the request.
    #[serde(deserialize_with = "duration_str::deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            introspection: true,
            limits: OperationLimits::default(),
            timeout: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(config: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(config)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.introspection);
    }

    #[test]
    fn full() {
        let config = EngineConfig::from_toml_str(
            r#"
            introspection = false
            timeout = "2s"

            [limits]
            depth = 10
            aliases = 3
            root_fields = 4
            complexity = 100
            "#,
        )
        .unwrap();

        assert_eq!(
            config,
            EngineConfig {
                introspection: false,
                limits: OperationLimits {
                    depth: Some(10),
                    aliases: Some(3),
                    root_fields: Some(4),
                    complexity: Some(100),
                },
                timeout: Some(Duration::from_secs(2)),
            }
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = EngineConfig::from_toml_str("introspect = true").unwrap_err();
        assert!(err.to_string().contains("unknown field `introspect`"), "{err}");

        let err = EngineConfig::from_toml_str("[limits]\nheight = 3").unwrap_err();
        assert!(err.to_string().contains("unknown field `height`"), "{err}");
    }
}
