use std::sync::Arc;

use anyhow::Result;
use repairdesk_core::{AppConfig, BookingSession, CallSession, REMOTE_CACHE_TTL_SECS, TaskKind};
use repairdesk_http::{AppState, create_router};
use repairdesk_remote::{ExternalTaskClient, PollPolicy, TaskClient};
use repairdesk_service::{
    BookingService, QuoteCallService, ShopSearchService, run_startup_reconciliation,
};
use repairdesk_storage::{
    JsonSnapshotStore, LocalCacheTier, RemoteCacheTier, RestCacheTier, ShopCache,
};

fn open_shop_cache(config: &AppConfig) -> Result<ShopCache> {
    let ttl = chrono::Duration::seconds(REMOTE_CACHE_TTL_SECS);
    let local = LocalCacheTier::open(config.shop_cache_path())?;
    let remote: Option<Arc<dyn RemoteCacheTier>> = match &config.remote_cache {
        Some(remote) => match RestCacheTier::new(remote, ttl) {
            Ok(tier) => {
                tracing::info!(
                    url = %remote.base_url,
                    table = %remote.table,
                    "remote shop cache enabled"
                );
                Some(Arc::new(tier))
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to set up remote shop cache, using local cache only");
                None
            },
        },
        None => {
            tracing::info!("REPAIRDESK_CACHE_URL not set, remote shop cache disabled");
            None
        },
    };
    Ok(ShopCache::new(local, remote).with_ttl(ttl))
}

pub(crate) async fn run(config: AppConfig, host: &str, port: u16) -> Result<()> {
    std::fs::create_dir_all(&config.data_dir)?;
    tracing::info!(data_dir = %config.data_dir.display(), "opening stores");

    let client = ExternalTaskClient::from_config(&config)?;
    tracing::info!(
        research_simulated = client.is_simulated(TaskKind::Research),
        voice_simulated = client.is_simulated(TaskKind::QuoteCall),
        "task client ready"
    );
    let client: Arc<dyn TaskClient> = Arc::new(client);
    let policy = PollPolicy::from_timings(&config.timings);

    let cache = Arc::new(open_shop_cache(&config)?);
    let sessions: Arc<JsonSnapshotStore<CallSession>> =
        Arc::new(JsonSnapshotStore::open(config.call_sessions_path())?);
    let bookings: Arc<JsonSnapshotStore<BookingSession>> =
        Arc::new(JsonSnapshotStore::open(config.booking_sessions_path())?);

    let shop_search = ShopSearchService::new(Arc::clone(&client), cache, policy)
        .with_search_timeout(config.timings.search_timeout);
    let quote_calls = QuoteCallService::new(Arc::clone(&client), sessions, policy);
    let booking_service = BookingService::new(client, bookings, policy);

    run_startup_reconciliation(&quote_calls, &booking_service, config.timings.stale_session_after)
        .await;

    let state = Arc::new(AppState {
        shop_search: Arc::new(shop_search),
        quote_calls: Arc::new(quote_calls),
        bookings: Arc::new(booking_service),
    });

    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
