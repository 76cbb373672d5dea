use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use catalog_core::config::Settings;
use catalog_core::db;
use catalog_core::domain::cast_member::{
    CastMemberCommandHandler, CastMemberCreateCommand, CastMemberInMemoryRepository, CastMemberSearch,
};
use catalog_core::domain::category::{
    CategoryCommandHandler, CategoryCreateCommand, CategoryFilter, CategoryInMemoryRepository,
    CategoryPostgresRepository, CategorySearch,
};
use catalog_core::domain::genre::{
    GenreCommandHandler, GenreCreateCommand, GenreFilter, GenreInMemoryRepository, GenrePostgresRepository,
    GenreSearch,
};
use catalog_core::domain::video::{
    AudioVideoMediaStatus, MediaKind, Rating, VideoCommandHandler, VideoCreateCommand, VideoInMemoryRepository,
    VideoProcessMediaCommand, VideoReplaceMediaCommand, VideoSearch, VIDEO_MEDIA_UPLOADED_EVENT,
};
use catalog_core::messaging::{
    InMemoryMessageBroker, MessageBroker, PublishVideoMediaReplacedInQueueHandler, RedpandaBroker,
};
use catalog_core::metrics::Metrics;
use catalog_core::seedwork::application::ApplicationService;
use catalog_core::seedwork::eventing::DomainEventMediator;
use catalog_core::seedwork::persistence::{InMemoryUnitOfWork, SqlxUnitOfWork};
use catalog_core::seedwork::search::RawSearchParams;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG overrides the default filter, e.g. RUST_LOG=catalog_core=trace
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,catalog_core=debug")))
        .init();

    tracing::info!("Starting catalog core demo");

    let settings = Settings::from_env()?;
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!(metrics = metrics.registry().gather().len(), "Metrics registry created");

    // === 1. Broker + mediator ===
    let broker: Arc<dyn MessageBroker> = if settings.broker_enabled() {
        Arc::new(RedpandaBroker::from_settings(&settings, Some(metrics.clone()))?)
    } else {
        tracing::info!("KAFKA_BROKERS empty, integration events stay in memory");
        Arc::new(InMemoryMessageBroker::new())
    };

    let mediator = Arc::new(DomainEventMediator::new().with_metrics(metrics.clone()));
    mediator
        .register_integration(
            VIDEO_MEDIA_UPLOADED_EVENT,
            Arc::new(PublishVideoMediaReplacedInQueueHandler::new(broker)),
        )
        .await;

    // === 2. Catalog flow on the in-memory backend ===
    in_memory_flow(mediator.clone(), metrics.clone()).await?;

    // === 3. Same use cases on PostgreSQL, when reachable ===
    match db::connect(&settings.database_url, settings.database_max_connections).await {
        Ok(pool) => {
            db::ensure_schema(&pool).await?;
            postgres_flow(SqlxUnitOfWork::new(pool), mediator, metrics.clone()).await?;
        }
        Err(e) => tracing::warn!(error = %e, "PostgreSQL unavailable, skipping relational flow"),
    }

    println!("{}", metrics.render()?);
    tracing::info!("Demo complete");
    Ok(())
}

async fn in_memory_flow(mediator: Arc<DomainEventMediator>, metrics: Arc<Metrics>) -> Result<()> {
    let uow = Arc::new(InMemoryUnitOfWork::new());
    let categories = Arc::new(CategoryInMemoryRepository::with_unit_of_work(CategorySearch, uow.clone()).await);
    let genres = Arc::new(GenreInMemoryRepository::with_unit_of_work(GenreSearch, uow.clone()).await);
    let videos = Arc::new(VideoInMemoryRepository::with_unit_of_work(VideoSearch, uow.clone()).await);
    let cast_members = Arc::new(CastMemberInMemoryRepository::with_unit_of_work(CastMemberSearch, uow.clone()).await);
    let app_service = Arc::new(ApplicationService::new(uow, mediator).with_metrics(metrics));

    let category_handler = CategoryCommandHandler::new(app_service.clone(), categories.clone());
    let genre_handler = GenreCommandHandler::new(app_service.clone(), genres.clone(), categories.clone());
    let cast_member_handler = CastMemberCommandHandler::new(app_service.clone(), cast_members);
    let video_handler = VideoCommandHandler::new(app_service, videos, categories, genres);

    let mut category_ids = Vec::new();
    for name in ["ba", "AC", "bc", "A"] {
        let category = category_handler.create(CategoryCreateCommand::new(name)).await?;
        category_ids.push(category.category_id.to_string());
    }

    let raw: RawSearchParams<CategoryFilter> =
        serde_json::from_value(json!({"per_page": 2, "sort": "name", "sort_dir": "asc", "filter": {"name": "a"}}))?;
    let page = category_handler.list(raw).await?;
    tracing::info!(
        names = ?page.items.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        total = page.total,
        last_page = page.last_page,
        "Category search"
    );

    for (name, code) in [("Ana Director", 1), ("Bruno Actor", 2)] {
        let member = cast_member_handler.create(CastMemberCreateCommand::new(name, code)).await?;
        tracing::info!(cast_member_id = %member.cast_member_id, cast_member_type = %member.cast_member_type, "Cast member ready");
    }

    let genre = genre_handler
        .create(GenreCreateCommand {
            name: "Action".into(),
            categories_id: category_ids[..2].to_vec(),
            is_active: None,
        })
        .await?;

    let video = video_handler
        .create(VideoCreateCommand {
            title: "The Movie".into(),
            description: "Demo video".into(),
            year_launched: 2024,
            duration: 95,
            rating: Rating::Age12,
            is_opened: false,
            categories_id: category_ids[..1].to_vec(),
            genres_id: vec![genre.genre_id.to_string()],
        })
        .await?;

    for (kind, name) in [(MediaKind::Trailer, "trailer.mp4"), (MediaKind::Video, "movie.mp4")] {
        let command = VideoReplaceMediaCommand {
            video_id: video.video_id.to_string(),
            kind,
            name: name.into(),
            raw_location: "videos/raw".into(),
        };
        // Committed even when the broker is down; only forwarding fails
        if let Err(e) = video_handler.replace_media(command).await {
            tracing::warn!(error = %e, kind = %kind, "Media stored but not forwarded to the broker");
        }

        let processed = video_handler
            .process_media(VideoProcessMediaCommand {
                video_id: video.video_id.to_string(),
                kind,
                status: AudioVideoMediaStatus::Completed,
                encoded_location: Some(format!("videos/encoded/{kind}")),
            })
            .await?;
        tracing::info!(kind = %kind, is_published = processed.is_published, "Media processed");
    }

    Ok(())
}

async fn postgres_flow(uow: SqlxUnitOfWork, mediator: Arc<DomainEventMediator>, metrics: Arc<Metrics>) -> Result<()> {
    let uow = Arc::new(uow);
    let categories = Arc::new(CategoryPostgresRepository::new(uow.clone()).with_metrics(metrics.clone()));
    let genres = Arc::new(GenrePostgresRepository::new(uow.clone()).with_metrics(metrics.clone()));
    let app_service = Arc::new(ApplicationService::new(uow, mediator).with_metrics(metrics));

    let category_handler = CategoryCommandHandler::new(app_service.clone(), categories.clone());
    let genre_handler = GenreCommandHandler::new(app_service, genres, categories);

    let movie = category_handler.create(CategoryCreateCommand::new("Movie")).await?;
    let series = category_handler.create(CategoryCreateCommand::new("Series")).await?;

    for name in ["Drama", "Action", "Comedy"] {
        genre_handler
            .create(GenreCreateCommand {
                name: name.into(),
                categories_id: vec![movie.category_id.to_string(), series.category_id.to_string()],
                is_active: None,
            })
            .await?;
    }

    let raw: RawSearchParams<GenreFilter> = serde_json::from_value(json!({
        "per_page": 2,
        "sort": "name",
        "sort_dir": "asc",
        "filter": {"categories_id": [movie.category_id.to_string()]}
    }))?;
    let page = genre_handler.list(raw).await?;
    tracing::info!(
        names = ?page.items.iter().map(|g| g.name.as_str()).collect::<Vec<_>>(),
        total = page.total,
        "Genre search on PostgreSQL"
    );

    Ok(())
}
