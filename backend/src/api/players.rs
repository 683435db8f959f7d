use axum::extract::Query;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

pub fn router() -> axum::Router {
    axum::Router::new().route("/spotlight", axum::routing::get(spotlight))
}

#[derive(Debug, serde::Deserialize)]
struct SpotlightQuery {
    tournament: uuid::Uuid,
}

/// Tournament wide mvp and top damage player. The titles are independent,
/// the same player may hold both.
#[tracing::instrument]
async fn spotlight(
    Query(query_params): Query<SpotlightQuery>,
) -> Result<axum::response::Json<common::standings::PlayerSpotlight>, axum::http::StatusCode> {
    let mut db_con = crate::db_connection().await;

    let query = crate::schema::player_stats::dsl::player_stats
        .inner_join(crate::schema::teams::dsl::teams)
        .filter(crate::schema::teams::dsl::tournament_id.eq(query_params.tournament))
        .select(crate::models::PlayerStat::as_select());

    let stats: Vec<crate::models::PlayerStat> = match query.load(&mut db_con).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Querying player stats: {:?}", e);
            return Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let lines = crate::standings::player_lines(&stats);

    Ok(axum::response::Json(common::standings::PlayerSpotlight {
        mvp: scoring::mvp::compute_mvp(&lines)
            .as_ref()
            .map(crate::standings::to_mvp_stats),
        top_damage: scoring::mvp::compute_top_damage(&lines)
            .as_ref()
            .map(crate::standings::to_mvp_stats),
    }))
}
