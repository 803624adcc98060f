use std::time::Duration;

use strum::{Display, EnumString};

/// Block-level payload compression negotiated for a connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum CompressionMethod {
    #[default]
    None,
    Lz4,
    Zstd,
}

/// Options resolved for a Rowhouse connection before any block is exchanged.
///
/// The codec layer never reads these. They parameterize the transport and
/// block-orchestration layers that drive it, and are carried here only so
/// the whole driver shares one vocabulary for them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionOptions {
    /// Username credential
    pub user:               String,
    /// Password credential
    pub password:           String,
    /// Scope the connection to a specific database, otherwise 'default'
    pub database:           String,
    /// API token credential, overriding user/password when present
    pub token:              Option<String>,
    /// Whether the connection should be made over tls
    pub secure:             bool,
    /// Skip certificate verification (self-signed deployments)
    pub skip_verification:  bool,
    pub connection_timeout: Duration,
    pub read_timeout:       Duration,
    pub write_timeout:      Duration,
    /// Rows per block the orchestration layer cuts batches into
    pub block_size:         usize,
    /// Connections the pool keeps open
    pub pool_size:          usize,
    pub compression:        CompressionMethod,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        ConnectionOptions {
            user:               "default".to_string(),
            password:           String::new(),
            database:           "default".to_string(),
            token:              None,
            secure:             false,
            skip_verification:  false,
            connection_timeout: Duration::from_secs(30),
            read_timeout:       Duration::from_secs(60),
            write_timeout:      Duration::from_secs(60),
            block_size:         65_536,
            pool_size:          10,
            compression:        CompressionMethod::default(),
        }
    }
}

impl ConnectionOptions {
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_compression(mut self, compression: CompressionMethod) -> Self {
        self.compression = compression;
        self
    }

    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    #[must_use]
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConnectionOptions::default();
        assert_eq!(options.user, "default");
        assert_eq!(options.database, "default");
        assert_eq!(options.compression, CompressionMethod::None);
        assert_eq!(options.block_size, 65_536);
    }

    #[test]
    fn test_builder_methods() {
        let options = ConnectionOptions::default()
            .with_user("reader")
            .with_database("metrics")
            .with_compression(CompressionMethod::Lz4)
            .with_pool_size(4);
        assert_eq!(options.user, "reader");
        assert_eq!(options.database, "metrics");
        assert_eq!(options.compression, CompressionMethod::Lz4);
        assert_eq!(options.pool_size, 4);
    }

    #[test]
    fn test_compression_method_strings() {
        assert_eq!(CompressionMethod::Lz4.to_string(), "lz4");
        assert_eq!("zstd".parse::<CompressionMethod>().unwrap(), CompressionMethod::Zstd);
        assert_eq!("NONE".parse::<CompressionMethod>().unwrap(), CompressionMethod::None);
        assert!("brotli".parse::<CompressionMethod>().is_err());
    }
}
