use crate::UserSession;
use axum::extract::{Query, State};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::sync::Arc;

struct RecordState {
    storage: Box<dyn crate::storage::ScreenshotStorage>,
    analyzer: Box<dyn crate::analyzer::ScreenshotAnalyzer>,
}

pub fn router(
    storage: Box<dyn crate::storage::ScreenshotStorage>,
    analyzer: Box<dyn crate::analyzer::ScreenshotAnalyzer>,
) -> axum::Router {
    axum::Router::new()
        .route("/list", axum::routing::get(list))
        .route(
            "/upload",
            axum::routing::post(upload)
                .layer(axum::extract::DefaultBodyLimit::max(50 * 1024 * 1024)),
        )
        .route("/manual", axum::routing::post(manual))
        .route("/daily", axum::routing::post(daily))
        .with_state(Arc::new(RecordState { storage, analyzer }))
}

#[derive(Debug, serde::Deserialize)]
struct RecordQuery {
    tournament: uuid::Uuid,
}

#[tracing::instrument(skip(_session))]
async fn list(
    _session: UserSession,
    Query(query_params): Query<RecordQuery>,
) -> Result<axum::response::Json<Vec<common::RecordInfo>>, axum::http::StatusCode> {
    let query = crate::schema::match_records::dsl::match_records
        .inner_join(crate::schema::teams::dsl::teams)
        .filter(crate::schema::teams::dsl::tournament_id.eq(query_params.tournament))
        .order(crate::schema::match_records::dsl::analyzed_at.desc())
        .select((
            crate::models::MatchRecord::as_select(),
            crate::models::Team::as_select(),
        ));

    let results: Vec<(crate::models::MatchRecord, crate::models::Team)> =
        match query.load(&mut crate::db_connection().await).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Querying match records: {:?}", e);
                return Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

    Ok(axum::response::Json(
        results
            .into_iter()
            .map(|(record, team)| common::RecordInfo {
                id: record.id.to_string(),
                team_id: record.team_id.to_string(),
                team_name: team.name,
                match_number: record.match_number,
                day: record.day,
                placement: record.placement,
                kills: record.kills,
                points: record.points,
                screenshot_url: record.screenshot_url,
            })
            .collect::<Vec<_>>(),
    ))
}

/// Batch screenshot submission. Admission control runs before anything is
/// written, afterwards every screenshot is processed on its own: storage or
/// analysis failures of one item never roll back its siblings.
#[tracing::instrument(skip(state, session, form))]
async fn upload(
    State(state): State<Arc<RecordState>>,
    session: UserSession,
    form: axum::extract::Multipart,
) -> Result<axum::response::Json<common::UploadReport>, (axum::http::StatusCode, String)> {
    session
        .require_participant()
        .map_err(|(code, msg)| (code, msg.to_string()))?;

    let request = match crate::collect_upload_form(form).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Reading upload form: {}", e);
            return Err((axum::http::StatusCode::BAD_REQUEST, e));
        }
    };

    if request.day < 1 {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            "Day must be at least 1".to_string(),
        ));
    }
    if request.match_number < 1 {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            "Match number must be at least 1".to_string(),
        ));
    }

    let mut db_con = crate::db_connection().await;

    let team_query = crate::schema::teams::dsl::teams
        .filter(crate::schema::teams::dsl::id.eq(request.team))
        .inner_join(crate::schema::tournaments::dsl::tournaments)
        .select((
            crate::models::Team::as_select(),
            crate::models::Tournament::as_select(),
        ));
    let mut team_rows: Vec<(crate::models::Team, crate::models::Tournament)> =
        match team_query.load(&mut db_con).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Querying team: {:?}", e);
                return Err((
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to load team".to_string(),
                ));
            }
        };
    let (team, tournament) = match team_rows.pop() {
        Some(r) => r,
        None => {
            return Err((
                axum::http::StatusCode::BAD_REQUEST,
                "Unknown team".to_string(),
            ));
        }
    };

    // cap across the whole tournament, not per day
    let existing: i64 = match crate::schema::match_records::dsl::match_records
        .filter(crate::schema::match_records::dsl::team_id.eq(team.id))
        .count()
        .get_result(&mut db_con)
        .await
    {
        Ok(count) => count,
        Err(e) => {
            tracing::error!("Counting existing records: {:?}", e);
            return Err((
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to check upload quota".to_string(),
            ));
        }
    };

    if let Err(e) = crate::admission::admit_batch(
        existing,
        tournament.total_matches as i64,
        &request.screenshots,
    ) {
        return Err((axum::http::StatusCode::BAD_REQUEST, e.message()));
    }

    let mut uploaded = 0;
    let mut failed = 0;
    let mut errors = Vec::new();

    // strictly sequential, this bounds concurrent analyzer calls to one per
    // submission and keeps the per-item accounting simple
    for (index, screenshot) in request.screenshots.into_iter().enumerate() {
        match process_screenshot(
            state.as_ref(),
            &mut db_con,
            request.team,
            request.day,
            request.match_number,
            index,
            screenshot,
        )
        .await
        {
            Ok(()) => {
                uploaded += 1;
            }
            Err(e) => {
                tracing::error!("Processing screenshot {}: {}", index + 1, e);
                failed += 1;
                errors.push(format!("Screenshot {}: {}", index + 1, e));
            }
        }
    }

    Ok(axum::response::Json(common::UploadReport {
        uploaded,
        failed,
        errors,
    }))
}

async fn process_screenshot(
    state: &RecordState,
    db_con: &mut diesel_async::AsyncPgConnection,
    team_id: uuid::Uuid,
    day: i32,
    match_number: i32,
    index: usize,
    screenshot: crate::UploadedScreenshot,
) -> Result<(), String> {
    let extension = std::path::Path::new(&screenshot.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");
    let path = format!(
        "{}/{}_{}.{}",
        team_id,
        chrono::Utc::now().timestamp_millis(),
        index,
        extension
    );

    let public_url = state
        .storage
        .store(path, screenshot.bytes.to_vec())
        .await?;

    let analysis = state.analyzer.analyze(public_url.clone()).await?;

    let (placement, kills) = match (analysis.placement, analysis.kills) {
        (Some(placement), Some(kills)) => (placement, kills),
        _ => {
            return Err(
                "Could not detect placement or kills. Please ensure the screenshot clearly shows the match results."
                    .to_string(),
            );
        }
    };
    if placement < 0 || kills < 0 {
        return Err("Analysis returned out of range values".to_string());
    }

    let points = scoring::standing::compute_points(placement as u32, kills as u32);

    let record = crate::models::MatchRecord {
        id: uuid::Uuid::now_v7(),
        team_id,
        match_number: match_number + index as i32,
        day,
        placement,
        kills,
        points: points as i32,
        kind: crate::models::RecordKind::Automatic.as_i16(),
        screenshot_url: public_url,
        analyzed_at: chrono::Utc::now().naive_utc(),
    };
    let record_id = record.id;

    let record_query =
        diesel::dsl::insert_into(crate::schema::match_records::dsl::match_records).values(record);
    record_query
        .execute(db_con)
        .await
        .map_err(|e| format!("Saving match record: {:?}", e))?;

    if let Some(players) = analysis.players {
        if !players.is_empty() {
            let stats: Vec<crate::models::PlayerStat> = players
                .into_iter()
                .map(|player| crate::models::PlayerStat {
                    id: uuid::Uuid::now_v7(),
                    record_id: Some(record_id),
                    team_id,
                    player_name: player.name,
                    kills: player.kills.max(0),
                    damage: player.damage.max(0),
                })
                .collect();

            let stats_query =
                diesel::dsl::insert_into(crate::schema::player_stats::dsl::player_stats)
                    .values(stats);

            // the match record already stands, losing the per-player lines
            // does not fail the item
            if let Err(e) = stats_query.execute(db_con).await {
                tracing::error!("Saving player stats: {:?}", e);
            }
        }
    }

    Ok(())
}

#[derive(Debug, serde::Deserialize)]
struct ManualResult {
    team: uuid::Uuid,
    placement: i32,
    kills: i32,
}

#[derive(Debug, serde::Deserialize)]
struct ManualMatch {
    match_number: i32,
    day: i32,
    results: Vec<ManualResult>,
}

/// Manually keyed per-match results, one batch per match. Points are
/// precomputed at write time so later edits can recompute them the same
/// way.
#[tracing::instrument(skip(session, payload))]
async fn manual(
    session: UserSession,
    axum::Json(payload): axum::Json<ManualMatch>,
) -> Result<axum::http::StatusCode, (axum::http::StatusCode, &'static str)> {
    session.require_admin()?;

    if payload.match_number < 1 {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            "Match number must be at least 1",
        ));
    }
    if payload.day < 1 {
        return Err((axum::http::StatusCode::BAD_REQUEST, "Day must be at least 1"));
    }
    if payload.results.is_empty() {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            "Please add at least one team result",
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for result in &payload.results {
        if result.placement < 1 || result.placement > 32 {
            return Err((
                axum::http::StatusCode::BAD_REQUEST,
                "Placement must be between 1 and 32",
            ));
        }
        if result.kills < 0 {
            return Err((
                axum::http::StatusCode::BAD_REQUEST,
                "Kills must be a positive number",
            ));
        }
        if !seen.insert(result.team) {
            return Err((axum::http::StatusCode::BAD_REQUEST, "Team already added"));
        }
    }

    let now = chrono::Utc::now().naive_utc();
    let records: Vec<crate::models::MatchRecord> = payload
        .results
        .iter()
        .map(|result| crate::models::MatchRecord {
            id: uuid::Uuid::now_v7(),
            team_id: result.team,
            match_number: payload.match_number,
            day: payload.day,
            placement: result.placement,
            kills: result.kills,
            points: scoring::standing::compute_points(
                result.placement as u32,
                result.kills as u32,
            ) as i32,
            kind: crate::models::RecordKind::Manual.as_i16(),
            screenshot_url: crate::models::RecordKind::MANUAL_URL.to_string(),
            analyzed_at: now,
        })
        .collect();

    let query =
        diesel::dsl::insert_into(crate::schema::match_records::dsl::match_records).values(records);

    if let Err(e) = query.execute(&mut crate::db_connection().await).await {
        tracing::error!("Inserting manual results: {:?}", e);
        return Err((
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save",
        ));
    }

    Ok(axum::http::StatusCode::CREATED)
}

#[derive(Debug, serde::Deserialize)]
struct DailyTotal {
    team: uuid::Uuid,
    day: i32,
    kills: i32,
    placement_points: i32,
}

/// A single aggregate row standing in for a whole day of matches. The
/// manually entered placement points are flattened into `points`, the row
/// keeps `match_number = 0` and `placement = 0`.
#[tracing::instrument(skip(session, payload))]
async fn daily(
    session: UserSession,
    axum::Json(payload): axum::Json<DailyTotal>,
) -> Result<axum::http::StatusCode, (axum::http::StatusCode, &'static str)> {
    session.require_admin()?;

    if payload.day < 1 {
        return Err((axum::http::StatusCode::BAD_REQUEST, "Day must be at least 1"));
    }
    if payload.kills < 0 {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            "Kills must be a positive number",
        ));
    }
    if payload.placement_points < 0 {
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            "Placement points must be a positive number",
        ));
    }

    let record = crate::models::MatchRecord {
        id: uuid::Uuid::now_v7(),
        team_id: payload.team,
        match_number: 0,
        day: payload.day,
        placement: 0,
        kills: payload.kills,
        points: payload.kills + payload.placement_points,
        kind: crate::models::RecordKind::DailyTotal.as_i16(),
        screenshot_url: crate::models::RecordKind::DAILY_TOTAL_URL.to_string(),
        analyzed_at: chrono::Utc::now().naive_utc(),
    };

    let query =
        diesel::dsl::insert_into(crate::schema::match_records::dsl::match_records).values(record);

    if let Err(e) = query.execute(&mut crate::db_connection().await).await {
        tracing::error!("Inserting daily total: {:?}", e);
        return Err((
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save daily total",
        ));
    }

    Ok(axum::http::StatusCode::CREATED)
}
