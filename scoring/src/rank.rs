use crate::standing::StandingFigure;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TeamStanding {
    pub team: String,
    pub logo_url: Option<String>,
    #[serde(flatten)]
    pub figure: StandingFigure,
}

pub static CSV_HEADER: [&str; 8] = [
    "Rank",
    "Team Name",
    "Total Points",
    "Placement Points",
    "Kill Points",
    "Total Kills",
    "Matches Played",
    "First Place Wins",
];

/// Total points first, placement points as the tie break. Teams equal on
/// both keep their input order, the sort is stable.
pub fn rank(mut standings: Vec<TeamStanding>) -> Vec<TeamStanding> {
    standings.sort_by(|a, b| {
        b.figure
            .total_points
            .cmp(&a.figure.total_points)
            .then(b.figure.placement_points.cmp(&a.figure.placement_points))
    });

    tracing::debug!("Ranked {} teams", standings.len());

    standings
}

/// Serializes an already ranked list, rank numbers are the 1-based position.
/// Team names containing commas or quotes come out quoted.
pub fn standings_csv(ranked: &[TeamStanding]) -> Result<String, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| format!("Writing csv header: {:?}", e))?;

    for (idx, standing) in ranked.iter().enumerate() {
        writer
            .write_record([
                (idx + 1).to_string(),
                standing.team.clone(),
                standing.figure.total_points.to_string(),
                standing.figure.placement_points.to_string(),
                standing.figure.kill_points.to_string(),
                standing.figure.total_kills.to_string(),
                standing.figure.matches_played.to_string(),
                standing.figure.first_place_wins.to_string(),
            ])
            .map_err(|e| format!("Writing csv row: {:?}", e))?;
    }

    let buf = writer
        .into_inner()
        .map_err(|e| format!("Flushing csv writer: {:?}", e))?;

    String::from_utf8(buf).map_err(|e| format!("Csv output was not utf8: {:?}", e))
}

/// `<name lower-cased, whitespace runs to hyphens>-standings-YYYY-MM-DD.csv`
pub fn csv_filename(tournament_name: &str, date: chrono::NaiveDate) -> String {
    let slug = tournament_name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    format!("{}-standings-{}.csv", slug, date.format("%Y-%m-%d"))
}
