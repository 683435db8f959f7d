use diesel::prelude::*;
use diesel_async::RunQueryDsl;

/// Failures that end the workflow. Everything before the team purge is
/// advisory and only produces warnings on the report.
#[derive(Debug)]
pub enum ArchiveError {
    UnknownTournament,
    Load(diesel::result::Error),
    PurgeTeams(diesel::result::Error),
    PurgeTournament(diesel::result::Error),
}

#[derive(Debug)]
pub struct ArchiveReport {
    pub history_id: Option<uuid::Uuid>,
    pub warnings: Vec<String>,
}

/// One entry of the frozen standings array stored on a history row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArchivedStanding {
    pub rank: u32,
    #[serde(flatten)]
    pub standing: scoring::rank::TeamStanding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub standings: Vec<ArchivedStanding>,
    pub mvp: Option<scoring::mvp::PlayerAggregate>,
}

/// Runs the same engine the live standings use over the loaded rows. The
/// history entry must survive deletion of everything it was derived from,
/// so team names and logos are copied in.
pub fn build_snapshot(
    teams: &[crate::models::Team],
    records: &[crate::models::MatchRecord],
    stats: &[crate::models::PlayerStat],
) -> Snapshot {
    let ranked = scoring::rank::rank(crate::standings::standings_from_rows(teams, records));

    let standings = ranked
        .into_iter()
        .enumerate()
        .map(|(idx, standing)| ArchivedStanding {
            rank: idx as u32 + 1,
            standing,
        })
        .collect();

    let mvp = scoring::mvp::compute_mvp(&crate::standings::player_lines(stats));

    Snapshot { standings, mvp }
}

enum FinalPurgeError {
    Teams(diesel::result::Error),
    Tournament(diesel::result::Error),
    Transaction(diesel::result::Error),
}

impl From<diesel::result::Error> for FinalPurgeError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Transaction(value)
    }
}

/// The one-way closure workflow: snapshot into history, then purge all live
/// data bottom up. Only the team and tournament deletes are fatal, they run
/// in one transaction as the last step. Not re-entrant, callers serialize
/// per tournament.
#[tracing::instrument(skip(db_con, storage))]
pub async fn archive_tournament(
    db_con: &mut diesel_async::AsyncPgConnection,
    storage: &dyn crate::storage::ScreenshotStorage,
    tournament_id: uuid::Uuid,
) -> Result<ArchiveReport, ArchiveError> {
    // LOAD
    let mut tournament_rows: Vec<crate::models::Tournament> =
        crate::schema::tournaments::dsl::tournaments
            .filter(crate::schema::tournaments::dsl::id.eq(tournament_id))
            .select(crate::models::Tournament::as_select())
            .load(db_con)
            .await
            .map_err(ArchiveError::Load)?;
    let tournament = tournament_rows.pop().ok_or(ArchiveError::UnknownTournament)?;

    let teams: Vec<crate::models::Team> = crate::schema::teams::dsl::teams
        .filter(crate::schema::teams::dsl::tournament_id.eq(tournament_id))
        .select(crate::models::Team::as_select())
        .load(db_con)
        .await
        .map_err(ArchiveError::Load)?;

    let team_ids: Vec<uuid::Uuid> = teams.iter().map(|team| team.id).collect();

    let records: Vec<crate::models::MatchRecord> =
        crate::schema::match_records::dsl::match_records
            .filter(crate::schema::match_records::dsl::team_id.eq_any(&team_ids))
            .select(crate::models::MatchRecord::as_select())
            .load(db_con)
            .await
            .map_err(ArchiveError::Load)?;

    let stats: Vec<crate::models::PlayerStat> = crate::schema::player_stats::dsl::player_stats
        .filter(crate::schema::player_stats::dsl::team_id.eq_any(&team_ids))
        .select(crate::models::PlayerStat::as_select())
        .load(db_con)
        .await
        .map_err(ArchiveError::Load)?;

    tracing::info!(
        "Archiving {} teams, {} records, {} stat rows",
        teams.len(),
        records.len(),
        stats.len()
    );

    let mut warnings = Vec::new();

    // SNAPSHOT
    let snapshot = build_snapshot(&teams, &records, &stats);

    // PERSIST_HISTORY, advisory: an unarchivable tournament must still be
    // removable, orphaned live data would be worse than a missing entry
    let mut history_id = None;
    match serde_json::to_value(&snapshot.standings) {
        Ok(standings_json) => {
            let entry = crate::models::TournamentHistory {
                id: uuid::Uuid::now_v7(),
                tournament_name: tournament.name.clone(),
                tournament_description: tournament.description.clone(),
                total_matches: tournament.total_matches,
                standings: standings_json,
                mvp_player_name: snapshot.mvp.as_ref().map(|mvp| mvp.name.clone()),
                mvp_total_kills: snapshot.mvp.as_ref().map(|mvp| mvp.kills as i32).unwrap_or(0),
                mvp_matches_count: snapshot
                    .mvp
                    .as_ref()
                    .map(|mvp| mvp.matches as i32)
                    .unwrap_or(0),
                original_tournament_id: tournament.id,
                archived_at: chrono::Utc::now().naive_utc(),
            };
            let entry_id = entry.id;

            let query =
                diesel::dsl::insert_into(crate::schema::tournament_history::dsl::tournament_history)
                    .values(entry);

            match query.execute(db_con).await {
                Ok(_) => {
                    history_id = Some(entry_id);
                }
                Err(e) => {
                    tracing::error!("Inserting history entry: {:?}", e);
                    warnings.push(format!("Saving history entry failed: {:?}", e));
                }
            }
        }
        Err(e) => {
            tracing::error!("Serializing standings snapshot: {:?}", e);
            warnings.push(format!("Serializing standings snapshot failed: {:?}", e));
        }
    };

    // PURGE_STORAGE, best effort. Sentinel urls and foreign urls map to no
    // object and are skipped.
    let object_paths: Vec<String> = records
        .iter()
        .filter_map(|record| storage.object_path(&record.screenshot_url))
        .collect();
    for (path, error) in storage.delete(object_paths).await {
        tracing::warn!("Deleting screenshot object {}: {}", path, error);
        warnings.push(format!("Deleting screenshot {}: {}", path, error));
    }

    // PURGE_PLAYER_STATS
    let stats_query = diesel::dsl::delete(
        crate::schema::player_stats::dsl::player_stats
            .filter(crate::schema::player_stats::dsl::team_id.eq_any(&team_ids)),
    );
    if let Err(e) = stats_query.execute(db_con).await {
        tracing::error!("Deleting player stats: {:?}", e);
        warnings.push(format!("Deleting player stats failed: {:?}", e));
    }

    // PURGE_MATCH_RECORDS
    let records_query = diesel::dsl::delete(
        crate::schema::match_records::dsl::match_records
            .filter(crate::schema::match_records::dsl::team_id.eq_any(&team_ids)),
    );
    if let Err(e) = records_query.execute(db_con).await {
        tracing::error!("Deleting match records: {:?}", e);
        warnings.push(format!("Deleting match records failed: {:?}", e));
    }

    // PURGE_AUX: access codes bound to the purged teams, their sessions die
    // on next load
    let code_team_ids: Vec<Option<uuid::Uuid>> = team_ids.iter().copied().map(Some).collect();
    let codes_query = diesel::dsl::delete(
        crate::schema::access_codes::dsl::access_codes
            .filter(crate::schema::access_codes::dsl::team_id.eq_any(code_team_ids)),
    );
    if let Err(e) = codes_query.execute(db_con).await {
        tracing::error!("Deleting access codes: {:?}", e);
        warnings.push(format!("Deleting access codes failed: {:?}", e));
    }

    // PURGE_TEAMS + PURGE_TOURNAMENT, atomic. Failing here leaves the
    // partially purged state to the operator, there is no rollback of the
    // earlier steps.
    let result = db_con
        .build_transaction()
        .run::<_, FinalPurgeError, _>(|conn| {
            Box::pin(async move {
                diesel::dsl::delete(
                    crate::schema::teams::dsl::teams
                        .filter(crate::schema::teams::dsl::tournament_id.eq(tournament_id)),
                )
                .execute(conn)
                .await
                .map_err(FinalPurgeError::Teams)?;

                diesel::dsl::delete(
                    crate::schema::tournaments::dsl::tournaments
                        .filter(crate::schema::tournaments::dsl::id.eq(tournament_id)),
                )
                .execute(conn)
                .await
                .map_err(FinalPurgeError::Tournament)?;

                Ok(())
            })
        })
        .await;

    match result {
        Ok(()) => Ok(ArchiveReport {
            history_id,
            warnings,
        }),
        Err(FinalPurgeError::Teams(e)) => Err(ArchiveError::PurgeTeams(e)),
        Err(FinalPurgeError::Tournament(e)) | Err(FinalPurgeError::Transaction(e)) => {
            Err(ArchiveError::PurgeTournament(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::build_snapshot;
    use crate::models::{MatchRecord, PlayerStat, RecordKind, Team};

    fn team(name: &str) -> Team {
        Team {
            id: uuid::Uuid::now_v7(),
            tournament_id: uuid::Uuid::now_v7(),
            name: name.to_string(),
            logo_url: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    fn record(team: &Team, placement: i32, kills: i32) -> MatchRecord {
        MatchRecord {
            id: uuid::Uuid::now_v7(),
            team_id: team.id,
            match_number: 1,
            day: 1,
            placement,
            kills,
            points: scoring::standing::compute_points(placement.max(0) as u32, kills as u32)
                as i32,
            kind: RecordKind::Automatic.as_i16(),
            screenshot_url: "https://storage.example/x.png".to_string(),
            analyzed_at: chrono::Utc::now().naive_utc(),
        }
    }

    fn stat(team: &Team, player: &str, kills: i32) -> PlayerStat {
        PlayerStat {
            id: uuid::Uuid::now_v7(),
            record_id: None,
            team_id: team.id,
            player_name: player.to_string(),
            kills,
            damage: kills * 100,
        }
    }

    #[test]
    fn snapshot_matches_live_ranking() {
        let first = team("Raging Raptors");
        let second = team("Night Owls");
        let teams = vec![second.clone(), first.clone()];

        let records = vec![
            record(&first, 1, 7),
            record(&first, 2, 3),
            record(&second, 4, 2),
        ];
        let stats = vec![
            stat(&first, "Excel", 7),
            stat(&second, "cute", 2),
            stat(&first, "Excel", 3),
        ];

        let snapshot = build_snapshot(&teams, &records, &stats);

        // re-ranking the frozen standings reproduces the pre-archival order
        let reranked = scoring::rank::rank(
            snapshot
                .standings
                .iter()
                .map(|entry| entry.standing.clone())
                .collect(),
        );
        let frozen: Vec<_> = snapshot
            .standings
            .iter()
            .map(|entry| entry.standing.clone())
            .collect();
        assert_eq!(frozen, reranked);

        assert_eq!(snapshot.standings[0].rank, 1);
        assert_eq!(snapshot.standings[0].standing.team, "Raging Raptors");
        assert_eq!(snapshot.standings[0].standing.figure.total_points, 26);
        assert_eq!(snapshot.standings[1].rank, 2);
        assert_eq!(snapshot.standings[1].standing.team, "Night Owls");

        let mvp = snapshot.mvp.unwrap();
        assert_eq!(mvp.name, "Excel");
        assert_eq!(mvp.kills, 10);
        assert_eq!(mvp.matches, 2);
    }

    #[test]
    fn snapshot_of_empty_tournament() {
        let lonely = team("No Shows");

        let snapshot = build_snapshot(&[lonely], &[], &[]);

        assert_eq!(snapshot.standings.len(), 1);
        assert_eq!(snapshot.standings[0].standing.figure.total_points, 0);
        assert_eq!(snapshot.mvp, None);
    }
}
