mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{Config, VisionConfig};
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::criticality::routes as criticality_routes;
use crate::features::heatmap::{routes as heatmap_routes, HeatmapRefresher, HeatmapService};
use crate::features::reports::stores::{InMemoryReportStore, PgReportStore, ReportStore};
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::modules::storage::{BlobStore, MinIOBlobStore};
use crate::modules::vision::{GeminiVisionClient, VisionAssistant};
use axum::extract::DefaultBodyLimit;
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1),
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    // Report store: Postgres when configured, in-memory demo mode otherwise
    let report_store: Arc<dyn ReportStore> = match &config.database {
        Some(database_config) => {
            let pool = database::create_pool(database_config).await?;
            tracing::info!("Database connection pool created");

            tracing::info!("Running database migrations...");
            database::run_migrations(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
            tracing::info!("Database migrations completed successfully");

            let store = Arc::new(PgReportStore::new(pool));
            let listener_store = Arc::clone(&store);
            tokio::spawn(async move {
                listener_store.run_insert_listener().await;
            });
            tracing::info!("Report insert listener spawned");

            store as Arc<dyn ReportStore>
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set, running in demo mode with an in-memory report store"
            );
            Arc::new(InMemoryReportStore::new())
        }
    };

    // Photo storage
    let blob_store: Arc<dyn BlobStore> = Arc::new(
        MinIOBlobStore::new(config.minio.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?,
    );

    // Vision assistant is optional
    let (vision, max_refinement_meters): (Option<Arc<dyn VisionAssistant>>, f64) =
        match &config.vision {
            Some(vision_config) => {
                let client = GeminiVisionClient::new(vision_config)
                    .map_err(|e| anyhow::anyhow!("Failed to create vision client: {}", e))?;
                tracing::info!("Vision assistant initialized (model: {})", vision_config.model);
                let client: Arc<dyn VisionAssistant> = Arc::new(client);
                (Some(client), vision_config.max_refinement_meters)
            }
            None => {
                tracing::info!("GEMINI_API_KEY not set, vision assistant disabled");
                (None, VisionConfig::DEFAULT_MAX_REFINEMENT_METERS)
            }
        };

    let report_service = Arc::new(ReportService::new(
        Arc::clone(&report_store),
        blob_store,
        vision,
        max_refinement_meters,
    ));
    tracing::info!(
        "Report service initialized (vision_enabled={})",
        report_service.vision_enabled()
    );

    let heatmap_service = Arc::new(HeatmapService::new(
        report_store,
        config.heatmap.decay,
        config.heatmap.layer.clone(),
    ));
    tracing::info!(
        "Heatmap service initialized (daily_increment={}, max_weight={})",
        config.heatmap.decay.daily_increment,
        config.heatmap.decay.max_weight
    );

    let heatmap_refresher =
        HeatmapRefresher::new(Arc::clone(&heatmap_service), config.heatmap.refresh_interval);
    tokio::spawn(async move {
        heatmap_refresher.run().await;
    });
    tracing::info!("Heatmap refresher worker spawned");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let api_routes = Router::new()
        .merge(criticality_routes::routes())
        .merge(reports_routes::routes(report_service))
        .merge(heatmap_routes::routes(heatmap_service))
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size));

    let app = Router::new()
        .merge(swagger)
        .merge(api_routes)
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
