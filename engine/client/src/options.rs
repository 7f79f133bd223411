use config::CacheConfig;

/// Construction options for [`crate::RegistryClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Keep fetched schemas in the dual index. Default `true`.
    pub cache_enabled: bool,
    /// Allow [`crate::RegistryClient::codec_for_id`]. Default `false`.
    pub codec_creation_enabled: bool,
}

impl ClientOptions {
    /// Options for a client that never retains schemas.
    pub fn uncached() -> Self { Self { cache_enabled: false, ..Self::default() } }

    /// Enables codec creation.
    pub fn with_codecs(self) -> Self { Self { codec_creation_enabled: true, ..self } }
}

impl Default for ClientOptions {
    fn default() -> Self { Self { cache_enabled: true, codec_creation_enabled: false } }
}

impl From<&CacheConfig> for ClientOptions {
    fn from(config: &CacheConfig) -> Self {
        Self { cache_enabled: config.enabled, codec_creation_enabled: config.codec_creation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cache_config() {
        assert_eq!(ClientOptions::from(&CacheConfig::default()), ClientOptions::default());
        assert!(!ClientOptions::uncached().cache_enabled);
        assert!(ClientOptions::uncached().with_codecs().codec_creation_enabled);
    }
}
