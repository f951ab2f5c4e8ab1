use chrono::Utc;
use escale::config::env_loader::load_config;
use escale::events::api::EventQueryService;
use escale::events::browser::EventBrowser;
use escale::favorites::FavoritesStore;
use escale::gemini::api::GeminiAPI;
use escale::gemini::model::InferenceClient;
use escale::geolocation::{locate, FixedLocation};
use escale::places::api::PlaceQueryService;
use escale::places::explorer::Explorer;
use escale::storage::FileStore;
use escale::tracing::setup_tracing;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let loki = setup_tracing().await;

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let client: Arc<dyn InferenceClient> = Arc::new(GeminiAPI::new(&config.gemini));
    let events_service = EventQueryService::new(client.clone(), &config.models.events);
    let places_service = PlaceQueryService::new(client, &config.models.places);

    let mut browser = EventBrowser::new(FavoritesStore::load(FileStore::new(&config.favorites_path)));
    let mut explorer = Explorer::new(locate(&FixedLocation(config.location)).await);

    futures::join!(
        browser.load_initial(&events_service),
        explorer.explore(&places_service, None)
    );

    if let Some(query) = env::args().nth(1) {
        browser.set_query(query);
        browser.search(&events_service).await;
    }

    let view = browser.view(Utc::now());
    info!(
        "{} events found, page {} of {}",
        view.total, view.page, view.total_pages
    );
    view.events.iter().for_each(|event| {
        info!(
            "{} | {} | {} | {}",
            event.date,
            event.title,
            event.location,
            if event.is_accessible { "Safe Bet" } else { "Deep Local" }
        )
    });

    if let Some(results) = explorer.results() {
        info!("City guide ({} sources):\n{}", results.sources.len(), results.text);
    }

    if let Some((controller, handle)) = loki {
        controller.shutdown().await;
        let _ = handle.await;
    }

    ExitCode::SUCCESS
}
