//! Configuration for the tenant resolver module.

use serde::Deserialize;

/// Module configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TenantResolverConfig {
    /// How long a positive tenant validation stays cached, in seconds.
    ///
    /// Only successful validations are cached; rejections and directory
    /// outages always hit the directory again on the next request.
    pub validation_ttl_secs: u64,
}

impl Default for TenantResolverConfig {
    fn default() -> Self {
        Self {
            validation_ttl_secs: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn default_ttl_is_five_minutes() {
        assert_eq!(TenantResolverConfig::default().validation_ttl_secs, 300);
    }

    #[test]
    fn deserializes_with_defaults() {
        let cfg: TenantResolverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.validation_ttl_secs, 300);

        let cfg: TenantResolverConfig =
            serde_json::from_str(r#"{"validation_ttl_secs": 60}"#).unwrap();
        assert_eq!(cfg.validation_ttl_secs, 60);
    }
}
