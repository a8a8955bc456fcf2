//! Backend wiring - picks hosted or in-memory adapters.

use std::sync::Arc;

use wall_core::WallBackend;
use wall_infra::{InMemoryObjectStorage, InMemoryPostRepository, InMemoryPushChannel};

use crate::config::AppConfig;

/// In-memory backend: inserts are echoed on the in-process push channel.
pub fn in_memory_backend() -> WallBackend {
    let push = Arc::new(InMemoryPushChannel::default());
    let posts = InMemoryPostRepository::new().with_push(push.clone());

    WallBackend {
        posts: Arc::new(posts),
        storage: Arc::new(InMemoryObjectStorage::default()),
        push,
    }
}

/// Build the backend with appropriate implementations.
pub fn build_backend(config: &AppConfig) -> WallBackend {
    #[cfg(feature = "supabase")]
    {
        if let Some(hosted) = &config.backend {
            match hosted_backend(hosted.clone()) {
                Ok(backend) => {
                    tracing::info!(url = %hosted.url, table = %hosted.table, bucket = %hosted.bucket, "Using hosted backend");
                    return backend;
                }
                Err(e) => {
                    tracing::error!("Failed to set up hosted backend: {}. Using in-memory fallback.", e);
                    return in_memory_backend();
                }
            }
        }
        tracing::warn!("SUPABASE_URL not set. Running without a hosted backend (in-memory mode).");
    }

    #[cfg(not(feature = "supabase"))]
    {
        let _ = config;
        tracing::info!("Running without supabase feature - using in-memory backend");
    }

    in_memory_backend()
}

#[cfg(feature = "supabase")]
fn hosted_backend(config: wall_infra::SupabaseConfig) -> Result<WallBackend, String> {
    use wall_infra::{BucketStorage, RealtimeChannel, RestPostRepository};

    let config = Arc::new(config);
    let posts = RestPostRepository::new(config.clone()).map_err(|e| e.to_string())?;
    let storage = BucketStorage::new(config.clone()).map_err(|e| e.to_string())?;

    Ok(WallBackend {
        posts: Arc::new(posts),
        storage: Arc::new(storage),
        push: Arc::new(RealtimeChannel::new(config)),
    })
}
