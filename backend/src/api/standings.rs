use crate::UserSession;
use axum::extract::{Query, State};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::sync::Arc;

struct StandingsState {
    live: tokio::sync::watch::Receiver<Vec<common::standings::StandingRow>>,
}

pub fn router(
    live: tokio::sync::watch::Receiver<Vec<common::standings::StandingRow>>,
) -> axum::Router {
    axum::Router::new()
        .route("/current", axum::routing::get(current))
        .route("/live", axum::routing::get(live_rows))
        .route("/csv", axum::routing::get(csv_export))
        .with_state(Arc::new(StandingsState { live }))
}

#[derive(Debug, serde::Deserialize)]
struct StandingsQuery {
    tournament: uuid::Uuid,
}

/// Recomputed from the record store on every call, there is no cached
/// standing between reads.
#[tracing::instrument]
async fn current(
    Query(query_params): Query<StandingsQuery>,
) -> Result<axum::response::Json<Vec<common::standings::StandingRow>>, axum::http::StatusCode> {
    let mut db_con = crate::db_connection().await;

    let ranked =
        match crate::standings::load_ranked_standings(&mut db_con, query_params.tournament).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Computing standings: {:?}", e);
                return Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

    Ok(axum::response::Json(crate::standings::to_rows(&ranked)))
}

/// Last scoreboard published by the refresh task.
#[tracing::instrument(skip(state))]
async fn live_rows(
    State(state): State<Arc<StandingsState>>,
) -> axum::response::Json<Vec<common::standings::StandingRow>> {
    let rows = state.live.borrow().clone();

    axum::response::Json(rows)
}

#[tracing::instrument(skip(session))]
async fn csv_export(
    session: UserSession,
    Query(query_params): Query<StandingsQuery>,
) -> Result<
    ([(axum::http::HeaderName, String); 2], String),
    (axum::http::StatusCode, &'static str),
> {
    session.require_admin()?;

    let mut db_con = crate::db_connection().await;

    let tournament_query = crate::schema::tournaments::dsl::tournaments
        .filter(crate::schema::tournaments::dsl::id.eq(query_params.tournament))
        .select(crate::models::Tournament::as_select());
    let mut tournament_rows: Vec<crate::models::Tournament> =
        match tournament_query.load(&mut db_con).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Querying tournament: {:?}", e);
                return Err((
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to load tournament",
                ));
            }
        };
    let tournament = match tournament_rows.pop() {
        Some(t) => t,
        None => {
            return Err((axum::http::StatusCode::NOT_FOUND, "Unknown tournament"));
        }
    };

    let ranked =
        match crate::standings::load_ranked_standings(&mut db_con, query_params.tournament).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Computing standings: {:?}", e);
                return Err((
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to compute standings",
                ));
            }
        };

    let csv_text = match scoring::rank::standings_csv(&ranked) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Serializing standings csv: {}", e);
            return Err((
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to export standings",
            ));
        }
    };

    let filename =
        scoring::rank::csv_filename(&tournament.name, chrono::Utc::now().date_naive());

    Ok((
        [
            (
                axum::http::header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                axum::http::header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv_text,
    ))
}
