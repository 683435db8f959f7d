use crate::UserSession;
use axum::extract::{Path, Query};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

pub fn router() -> axum::Router {
    axum::Router::new()
        .route("/list", axum::routing::get(list))
        .route("/create", axum::routing::post(create))
        .route("/:id/delete", axum::routing::post(delete))
}

#[derive(Debug, serde::Deserialize)]
struct TeamQuery {
    tournament: uuid::Uuid,
}

#[tracing::instrument(skip(_session))]
async fn list(
    _session: UserSession,
    Query(query_params): Query<TeamQuery>,
) -> Result<axum::response::Json<Vec<common::TeamInfo>>, axum::http::StatusCode> {
    let query = crate::schema::teams::dsl::teams
        .filter(crate::schema::teams::dsl::tournament_id.eq(query_params.tournament))
        .order(crate::schema::teams::dsl::name.asc())
        .select(crate::models::Team::as_select());

    let results: Vec<crate::models::Team> =
        match query.load(&mut crate::db_connection().await).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Querying teams: {:?}", e);
                return Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

    Ok(axum::response::Json(
        results
            .into_iter()
            .map(|team| common::TeamInfo {
                id: team.id.to_string(),
                name: team.name,
                logo_url: team.logo_url,
            })
            .collect::<Vec<_>>(),
    ))
}

#[derive(Debug, serde::Deserialize)]
struct CreateTeam {
    tournament: uuid::Uuid,
    name: String,
    #[serde(default)]
    logo_url: Option<String>,
}

#[tracing::instrument(skip(session))]
async fn create(
    session: UserSession,
    axum::Json(payload): axum::Json<CreateTeam>,
) -> Result<axum::response::Json<common::TeamInfo>, (axum::http::StatusCode, &'static str)> {
    session.require_admin()?;

    if payload.name.trim().is_empty() {
        return Err((axum::http::StatusCode::BAD_REQUEST, "Team name required"));
    }

    let team = crate::models::Team {
        id: uuid::Uuid::now_v7(),
        tournament_id: payload.tournament,
        name: payload.name.trim().to_string(),
        logo_url: payload.logo_url,
        created_at: chrono::Utc::now().naive_utc(),
    };

    let query = diesel::dsl::insert_into(crate::schema::teams::dsl::teams).values(team.clone());

    if let Err(e) = query.execute(&mut crate::db_connection().await).await {
        tracing::error!("Inserting team: {:?}", e);
        return Err((
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create team",
        ));
    }

    Ok(axum::response::Json(common::TeamInfo {
        id: team.id.to_string(),
        name: team.name,
        logo_url: team.logo_url,
    }))
}

/// Removes a single team and everything hanging off it. Unlike tournament
/// closure this does not archive anything.
#[tracing::instrument(skip(session))]
async fn delete(
    session: UserSession,
    Path(team_id): Path<uuid::Uuid>,
) -> Result<(), (axum::http::StatusCode, &'static str)> {
    session.require_admin()?;

    let mut db_con = crate::db_connection().await;

    let result = db_con
        .build_transaction()
        .run::<_, diesel::result::Error, _>(|conn| {
            Box::pin(async move {
                diesel::dsl::delete(
                    crate::schema::player_stats::dsl::player_stats
                        .filter(crate::schema::player_stats::dsl::team_id.eq(team_id)),
                )
                .execute(conn)
                .await?;

                diesel::dsl::delete(
                    crate::schema::match_records::dsl::match_records
                        .filter(crate::schema::match_records::dsl::team_id.eq(team_id)),
                )
                .execute(conn)
                .await?;

                diesel::dsl::delete(
                    crate::schema::access_codes::dsl::access_codes
                        .filter(crate::schema::access_codes::dsl::team_id.eq(Some(team_id))),
                )
                .execute(conn)
                .await?;

                diesel::dsl::delete(
                    crate::schema::teams::dsl::teams
                        .filter(crate::schema::teams::dsl::id.eq(team_id)),
                )
                .execute(conn)
                .await?;

                Ok(())
            })
        })
        .await;

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("Deleting team: {:?}", e);
            Err((
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to delete team",
            ))
        }
    }
}
