//! Token signing key configuration.

use serde::{Deserialize, Serialize};

/// Where the RSA signing key pair lives and how long it may be cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Object storage bucket holding the PEM key pair.
    #[serde(default = "default_key_bucket")]
    pub key_bucket: String,
    /// Object name of the PKCS#8 / PKCS#1 private key.
    #[serde(default = "default_private_key_name")]
    pub private_key_name: String,
    /// Object name of the public key.
    #[serde(default = "default_public_key_name")]
    pub public_key_name: String,
    /// Seconds parsed keys stay cached in memory. `0` fetches on every use.
    #[serde(default)]
    pub key_cache_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            key_bucket: default_key_bucket(),
            private_key_name: default_private_key_name(),
            public_key_name: default_public_key_name(),
            key_cache_ttl_seconds: 0,
        }
    }
}

fn default_key_bucket() -> String {
    "gabb-certificates".to_string()
}

fn default_private_key_name() -> String {
    "private.pem".to_string()
}

fn default_public_key_name() -> String {
    "public.pem".to_string()
}
