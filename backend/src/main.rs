use clap::Parser;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

const MIGRATIONS: diesel_async_migrations::EmbeddedMigrations =
    diesel_async_migrations::embed_migrations!("../migrations/");

async fn run_migrations(connection: &mut diesel_async::AsyncPgConnection) {
    MIGRATIONS.run_pending_migrations(connection).await.unwrap();
}

#[derive(Debug, Parser)]
struct Args {
    /// Address the http server binds to
    #[arg(long, default_value = "0.0.0.0:3000")]
    bind: String,
    /// Store uploaded screenshots in s3 instead of the local filesystem
    #[arg(long)]
    s3: bool,
    /// Folder screenshots are written to when not using s3
    #[arg(long, default_value = "uploads/")]
    upload_folder: String,
    /// Base url uploaded screenshots are reachable under
    #[arg(long, default_value = "http://localhost:3000/uploads")]
    public_base: String,
    /// Seconds between scoreboard refreshes
    #[arg(long, default_value_t = 5)]
    refresh_interval: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target().contains("backend")
        }));
    tracing::subscriber::set_global_default(registry).unwrap();

    tracing::info!("Starting...");

    tracing::info!("Applying Migrations");
    run_migrations(&mut backend::db_connection().await).await;
    tracing::info!("Completed Migrations");

    let storage: Box<dyn backend::storage::ScreenshotStorage> = if args.s3 {
        Box::new(backend::storage::S3Storage::new(
            &std::env::var("S3_BUCKET").expect("'S3_BUCKET' must be set"),
            std::env::var("S3_REGION")
                .expect("'S3_REGION' must be set")
                .parse()
                .unwrap(),
            s3::creds::Credentials::default().unwrap(),
            args.public_base.clone(),
        ))
    } else {
        if !tokio::fs::try_exists(&args.upload_folder).await.unwrap_or(false) {
            tokio::fs::create_dir_all(&args.upload_folder).await.unwrap();
        }

        Box::new(backend::storage::FileStorage::new(
            args.upload_folder.clone(),
            args.public_base.clone(),
        ))
    };

    let analyzer = Box::new(backend::analyzer::HttpAnalyzer::new(
        std::env::var("ANALYZER_URL").expect("'ANALYZER_URL' must be set"),
        std::env::var("ANALYZER_API_KEY").expect("'ANALYZER_API_KEY' must be set"),
    ));

    let (standings_tx, standings_rx) = tokio::sync::watch::channel(Vec::new());
    backend::scheduler::spawn_standings_refresh(
        std::time::Duration::from_secs(args.refresh_interval),
        standings_tx,
    );

    let session_store = backend::diesel_sessionstore::DieselStore::new();
    let session_layer = tower_sessions::SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(tower_sessions::Expiry::OnInactivity(
            time::Duration::hours(48),
        ));

    let router = axum::Router::new()
        .nest("/api/", backend::api::router(storage, analyzer, standings_rx))
        .layer(session_layer)
        .nest_service(
            "/uploads/",
            tower_http::services::ServeDir::new(&args.upload_folder),
        );

    let listener = tokio::net::TcpListener::bind(&args.bind).await.unwrap();
    axum::serve(listener, router).await.unwrap();
}
