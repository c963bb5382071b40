//! Configuration for the compliance store module.

use complykit_paging::LimitCfg;
use serde::Deserialize;

/// Module configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// TTL for cached reads, in seconds.
    pub cache_ttl_secs: u64,
    /// Page size used when the caller does not ask for one.
    pub default_page_size: u64,
    /// Hard ceiling on caller-requested page sizes.
    pub max_page_size: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            default_page_size: 25,
            max_page_size: 100,
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn limits(&self) -> LimitCfg {
        LimitCfg {
            default: self.default_page_size,
            max: self.max_page_size,
        }
    }
}
