use crate::placement::placement_points;

/// The scoring-relevant slice of one stored match record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub placement: u32,
    pub kills: u32,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StandingFigure {
    pub total_points: u32,
    pub placement_points: u32,
    pub kill_points: u32,
    pub total_kills: u32,
    pub matches_played: u32,
    pub first_place_wins: u32,
}

pub fn compute_points(placement: u32, kills: u32) -> u32 {
    placement_points(placement) + kills
}

/// Folds a team's records into its standing figure.
///
/// The persisted `points` value is authoritative for `total_points` and is
/// never re-derived from placement and kills here: daily-total rows and
/// manually corrected rows do not satisfy the `compute_points` formula.
/// `placement_points` on the other hand is always re-derived from the rank
/// table, so a daily-total row (placement 0) contributes nothing to it even
/// though its manually entered placement share is folded into `points`.
pub fn compute_standing(records: &[MatchResult]) -> StandingFigure {
    let mut figure = StandingFigure::default();

    for record in records {
        figure.total_points += record.points;
        figure.placement_points += placement_points(record.placement);
        figure.total_kills += record.kills;
        if record.placement == 1 {
            figure.first_place_wins += 1;
        }
    }

    figure.kill_points = figure.total_kills;
    figure.matches_played = records.len() as u32;

    figure
}
