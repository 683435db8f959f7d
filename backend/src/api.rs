pub mod auth;
pub mod players;
pub mod records;
pub mod standings;
pub mod teams;
pub mod tournaments;

pub fn router(
    storage: Box<dyn crate::storage::ScreenshotStorage>,
    analyzer: Box<dyn crate::analyzer::ScreenshotAnalyzer>,
    live: tokio::sync::watch::Receiver<Vec<common::standings::StandingRow>>,
) -> axum::Router {
    axum::Router::new()
        .nest("/auth/", auth::router())
        .nest("/tournaments/", tournaments::router(storage.duplicate()))
        .nest("/teams/", teams::router())
        .nest("/records/", records::router(storage, analyzer))
        .nest("/standings/", standings::router(live))
        .nest("/players/", players::router())
}
