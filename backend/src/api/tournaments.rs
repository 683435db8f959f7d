use crate::UserSession;
use axum::extract::{Path, State};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::sync::Arc;

struct TournamentState {
    storage: Box<dyn crate::storage::ScreenshotStorage>,
}

pub fn router(storage: Box<dyn crate::storage::ScreenshotStorage>) -> axum::Router {
    axum::Router::new()
        .route("/list", axum::routing::get(list))
        .route("/create", axum::routing::post(create))
        .route("/:id/archive", axum::routing::post(archive))
        .route("/history", axum::routing::get(history))
        .route("/history/:id", axum::routing::get(history_entry))
        .with_state(Arc::new(TournamentState { storage }))
}

#[tracing::instrument(skip(_session))]
async fn list(
    _session: UserSession,
) -> Result<axum::response::Json<Vec<common::TournamentInfo>>, axum::http::StatusCode> {
    let query = crate::schema::tournaments::dsl::tournaments
        .order(crate::schema::tournaments::dsl::created_at.desc())
        .select(crate::models::Tournament::as_select());

    let results: Vec<crate::models::Tournament> =
        match query.load(&mut crate::db_connection().await).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Querying tournaments: {:?}", e);
                return Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

    Ok(axum::response::Json(
        results
            .into_iter()
            .map(|tournament| common::TournamentInfo {
                id: tournament.id.to_string(),
                name: tournament.name,
                description: tournament.description,
                total_matches: tournament.total_matches,
            })
            .collect::<Vec<_>>(),
    ))
}

#[derive(Debug, serde::Deserialize)]
struct CreateTournament {
    name: String,
    #[serde(default)]
    description: Option<String>,
    total_matches: i32,
}

#[tracing::instrument(skip(session))]
async fn create(
    session: UserSession,
    axum::Json(payload): axum::Json<CreateTournament>,
) -> Result<axum::response::Json<common::TournamentInfo>, (axum::http::StatusCode, &'static str)> {
    session.require_admin()?;

    if payload.name.trim().is_empty() {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            "Tournament name required",
        ));
    }
    if payload.total_matches < 1 {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            "Total matches must be at least 1",
        ));
    }

    let tournament = crate::models::Tournament {
        id: uuid::Uuid::now_v7(),
        name: payload.name.trim().to_string(),
        description: payload.description,
        total_matches: payload.total_matches,
        created_at: chrono::Utc::now().naive_utc(),
    };

    let query = diesel::dsl::insert_into(crate::schema::tournaments::dsl::tournaments)
        .values(tournament.clone());

    if let Err(e) = query.execute(&mut crate::db_connection().await).await {
        tracing::error!("Inserting tournament: {:?}", e);
        return Err((
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create tournament",
        ));
    }

    Ok(axum::response::Json(common::TournamentInfo {
        id: tournament.id.to_string(),
        name: tournament.name,
        description: tournament.description,
        total_matches: tournament.total_matches,
    }))
}

/// Closes a tournament for good: freeze the final standings into history,
/// purge all live rows and stored screenshots.
#[tracing::instrument(skip(state, session))]
async fn archive(
    State(state): State<Arc<TournamentState>>,
    session: UserSession,
    Path(tournament_id): Path<uuid::Uuid>,
) -> Result<axum::response::Json<common::ArchiveOutcome>, (axum::http::StatusCode, &'static str)> {
    session.require_admin()?;

    let mut db_con = crate::db_connection().await;

    match crate::archive::archive_tournament(&mut db_con, state.storage.as_ref(), tournament_id)
        .await
    {
        Ok(report) => {
            for warning in &report.warnings {
                tracing::warn!("Archival warning: {}", warning);
            }

            Ok(axum::response::Json(common::ArchiveOutcome {
                history_id: report.history_id.map(|id| id.to_string()),
                warnings: report.warnings,
            }))
        }
        Err(crate::archive::ArchiveError::UnknownTournament) => {
            Err((axum::http::StatusCode::NOT_FOUND, "Unknown tournament"))
        }
        Err(e) => {
            tracing::error!("Archiving tournament: {:?}", e);
            Err((
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Archival failed, manual cleanup may be required",
            ))
        }
    }
}

fn history_to_common(entry: crate::models::TournamentHistory) -> Result<common::HistoryEntry, String> {
    let standings: Vec<common::standings::StandingRow> =
        serde_json::from_value(entry.standings)
            .map_err(|e| format!("Decoding archived standings: {:?}", e))?;

    Ok(common::HistoryEntry {
        id: entry.id.to_string(),
        tournament_name: entry.tournament_name,
        tournament_description: entry.tournament_description,
        total_matches: entry.total_matches,
        standings,
        mvp: entry.mvp_player_name.map(|player_name| common::HistoryMvp {
            player_name,
            total_kills: entry.mvp_total_kills,
            matches_count: entry.mvp_matches_count,
        }),
        original_tournament_id: entry.original_tournament_id.to_string(),
        archived_at: entry.archived_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    })
}

#[tracing::instrument(skip(_session))]
async fn history(
    _session: UserSession,
) -> Result<axum::response::Json<Vec<common::HistoryEntry>>, axum::http::StatusCode> {
    let query = crate::schema::tournament_history::dsl::tournament_history
        .order(crate::schema::tournament_history::dsl::archived_at.desc())
        .select(crate::models::TournamentHistory::as_select());

    let results: Vec<crate::models::TournamentHistory> =
        match query.load(&mut crate::db_connection().await).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Querying history: {:?}", e);
                return Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

    let mut entries = Vec::with_capacity(results.len());
    for entry in results {
        match history_to_common(entry) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::error!("{}", e);
                return Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }

    Ok(axum::response::Json(entries))
}

#[tracing::instrument(skip(_session))]
async fn history_entry(
    _session: UserSession,
    Path(history_id): Path<uuid::Uuid>,
) -> Result<axum::response::Json<common::HistoryEntry>, axum::http::StatusCode> {
    let query = crate::schema::tournament_history::dsl::tournament_history
        .filter(crate::schema::tournament_history::dsl::id.eq(history_id))
        .select(crate::models::TournamentHistory::as_select());

    let mut results: Vec<crate::models::TournamentHistory> =
        match query.load(&mut crate::db_connection().await).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Querying history entry: {:?}", e);
                return Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

    let entry = match results.pop() {
        Some(entry) => entry,
        None => return Err(axum::http::StatusCode::NOT_FOUND),
    };

    match history_to_common(entry) {
        Ok(entry) => Ok(axum::response::Json(entry)),
        Err(e) => {
            tracing::error!("{}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
