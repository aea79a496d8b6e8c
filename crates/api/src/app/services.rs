//! Store selection and service wiring.

use std::sync::Arc;

use chrono::Duration;

use hireboard_auth::Hs256TokenService;
use hireboard_infra::{
    AccountService, ApplicationLifecycle, Engagement, InMemoryStore, JobLifecycle, PgStore, Store,
    StoreError,
};

use crate::config::ApiConfig;

pub type SharedStore = Arc<dyn Store>;

/// Everything a handler can call, shared behind an `Arc`.
pub struct AppServices {
    pub accounts: AccountService<SharedStore>,
    pub jobs: JobLifecycle<SharedStore>,
    pub engagement: Engagement<SharedStore>,
    pub applications: ApplicationLifecycle<SharedStore>,
    pub tokens: Hs256TokenService,
}

impl AppServices {
    pub fn new(store: SharedStore, tokens: Hs256TokenService) -> Self {
        Self {
            accounts: AccountService::new(store.clone(), tokens.clone()),
            jobs: JobLifecycle::new(store.clone()),
            engagement: Engagement::new(store.clone()),
            applications: ApplicationLifecycle::new(store),
            tokens,
        }
    }
}

pub async fn build_services(config: &ApiConfig) -> Result<AppServices, StoreError> {
    let tokens = Hs256TokenService::with_ttl(
        config.jwt_secret.as_bytes(),
        Duration::hours(config.token_ttl_hours),
    );

    let store: SharedStore = match (config.use_persistent_stores, config.database_url.as_deref()) {
        (true, Some(url)) => {
            let store = PgStore::connect(url).await?;
            store.ensure_schema().await?;
            tracing::info!("using postgres stores");
            Arc::new(store)
        }
        (true, None) => {
            tracing::warn!("persistent stores requested without DATABASE_URL, falling back to in-memory");
            Arc::new(InMemoryStore::new())
        }
        (false, _) => {
            tracing::info!("using in-memory stores");
            Arc::new(InMemoryStore::new())
        }
    };

    Ok(AppServices::new(store, tokens))
}
