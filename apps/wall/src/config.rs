//! Application configuration loaded from environment variables.

use std::env;

use wall_core::domain::Identity;
use wall_core::wall::DEFAULT_CHANNEL;

#[cfg(feature = "supabase")]
use wall_infra::SupabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub identity: Identity,
    pub channel: String,
    /// Hosted backend; `None` runs against the in-memory backend.
    #[cfg(feature = "supabase")]
    pub backend: Option<SupabaseConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            identity: Self::identity(&lookup),
            channel: lookup("WALL_CHANNEL").unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
            #[cfg(feature = "supabase")]
            backend: SupabaseConfig::from_lookup(&lookup),
        }
    }

    /// Profile shown beside the wall. Unset fields keep their defaults.
    fn identity(lookup: &impl Fn(&str) -> Option<String>) -> Identity {
        let defaults = Identity::default();
        Identity {
            name: lookup("WALL_USER_NAME").unwrap_or(defaults.name),
            avatar: lookup("WALL_AVATAR").unwrap_or(defaults.avatar),
            section: defaults.section,
            networks: lookup("WALL_NETWORKS").unwrap_or(defaults.networks),
            current_city: lookup("WALL_CITY").unwrap_or(defaults.current_city),
        }
    }
}
