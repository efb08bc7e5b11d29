use shelter_match::config::Settings;
use shelter_match::{
    ApiClient, AppContext, DogStream, FetchOutcome, Identity, JsonFileStore, MatchResolver,
    SelectionSet, SessionState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How many pages the scripted browse fetches before selecting
const DEMO_PAGE_LIMIT: usize = 3;

/// How many dogs the scripted browse favorites
const DEMO_SELECTION_SIZE: usize = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(filter);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Shelter Match client...");

    // Wire up the context: gateway, persisted session, and the components
    // that consume them
    let timeout = Duration::from_secs(settings.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
    let gateway = ApiClient::new(settings.api.base_url.clone(), timeout);

    let store = Arc::new(JsonFileStore::new(&settings.storage.state_dir));
    let session = SessionState::restore(store);

    let ctx = Arc::new(AppContext::new(gateway, session));

    if ctx.session.is_authenticated() {
        info!("Using restored session");
    } else {
        let identity: Identity = settings
            .identity
            .clone()
            .ok_or("no persisted session and no [identity] configured")?
            .into();
        ctx.session.login(&ctx.gateway, identity).await?;
    }

    let breeds = ctx.authorized(ctx.gateway.list_breeds().await)?;
    info!("Backend knows {} breeds", breeds.len());

    // Browse: submit the configured criteria and pull a few pages
    let criteria = settings.search.criteria()?;
    let stream = DogStream::new(ctx.clone());
    stream.submit(criteria).await?;

    while stream.page_count().await < DEMO_PAGE_LIMIT {
        match stream.fetch_next().await? {
            FetchOutcome::Appended(count) => {
                info!(
                    "Fetched {} dogs ({} of {} total so far)",
                    count,
                    stream.dogs().await.len(),
                    stream.total().await
                );
            }
            FetchOutcome::Skipped => break,
            FetchOutcome::Stale => continue,
        }
    }

    let dogs = stream.dogs().await;
    if dogs.is_empty() {
        warn!("No dogs found... try broadening the search");
        ctx.session.logout(&ctx.gateway).await?;
        return Ok(());
    }

    // Favorite the first few and ask the backend for a match
    let mut selection = SelectionSet::new();
    for dog in dogs.into_iter().take(DEMO_SELECTION_SIZE) {
        selection.toggle(dog);
    }
    info!("Selected {} dogs", selection.len());

    let mut resolver = MatchResolver::new(ctx.clone());
    let matched = resolver.request_match(&mut selection).await?;
    info!(
        "Matched with {} ({}, age {}, ZIP {})",
        matched.name, matched.breed, matched.age, matched.zip_code
    );

    ctx.session.logout(&ctx.gateway).await?;
    Ok(())
}
