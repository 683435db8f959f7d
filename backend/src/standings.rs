use diesel::prelude::*;
use diesel_async::RunQueryDsl;

pub fn record_score(record: &crate::models::MatchRecord) -> scoring::standing::MatchResult {
    scoring::standing::MatchResult {
        placement: record.placement.max(0) as u32,
        kills: record.kills.max(0) as u32,
        points: record.points.max(0) as u32,
    }
}

/// Pure assembly shared by the live standings path, the scheduler and the
/// archival snapshot.
pub fn standings_from_rows(
    teams: &[crate::models::Team],
    records: &[crate::models::MatchRecord],
) -> Vec<scoring::rank::TeamStanding> {
    teams
        .iter()
        .map(|team| {
            let team_records: Vec<_> = records
                .iter()
                .filter(|record| record.team_id == team.id)
                .map(record_score)
                .collect();

            scoring::rank::TeamStanding {
                team: team.name.clone(),
                logo_url: team.logo_url.clone(),
                figure: scoring::standing::compute_standing(&team_records),
            }
        })
        .collect()
}

pub fn player_lines(stats: &[crate::models::PlayerStat]) -> Vec<scoring::mvp::PlayerLine> {
    stats
        .iter()
        .map(|stat| scoring::mvp::PlayerLine {
            name: stat.player_name.clone(),
            kills: stat.kills.max(0) as u32,
            damage: stat.damage.max(0) as u32,
        })
        .collect()
}

pub async fn load_ranked_standings(
    db_con: &mut diesel_async::AsyncPgConnection,
    tournament_id: uuid::Uuid,
) -> Result<Vec<scoring::rank::TeamStanding>, diesel::result::Error> {
    let teams: Vec<crate::models::Team> = crate::schema::teams::dsl::teams
        .filter(crate::schema::teams::dsl::tournament_id.eq(tournament_id))
        .select(crate::models::Team::as_select())
        .load(db_con)
        .await?;

    let team_ids: Vec<uuid::Uuid> = teams.iter().map(|team| team.id).collect();

    let records: Vec<crate::models::MatchRecord> =
        crate::schema::match_records::dsl::match_records
            .filter(crate::schema::match_records::dsl::team_id.eq_any(&team_ids))
            .select(crate::models::MatchRecord::as_select())
            .load(db_con)
            .await?;

    Ok(scoring::rank::rank(standings_from_rows(&teams, &records)))
}

pub fn to_rows(ranked: &[scoring::rank::TeamStanding]) -> Vec<common::standings::StandingRow> {
    ranked
        .iter()
        .enumerate()
        .map(|(idx, standing)| common::standings::StandingRow {
            rank: idx as u32 + 1,
            team: standing.team.clone(),
            logo_url: standing.logo_url.clone(),
            total_points: standing.figure.total_points,
            placement_points: standing.figure.placement_points,
            kill_points: standing.figure.kill_points,
            total_kills: standing.figure.total_kills,
            matches_played: standing.figure.matches_played,
            first_place_wins: standing.figure.first_place_wins,
        })
        .collect()
}

pub fn to_mvp_stats(aggregate: &scoring::mvp::PlayerAggregate) -> common::standings::MvpStats {
    common::standings::MvpStats {
        player_name: aggregate.name.clone(),
        total_kills: aggregate.kills,
        total_damage: aggregate.damage,
        matches_count: aggregate.matches,
    }
}
