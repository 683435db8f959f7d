pub mod standings;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TournamentInfo {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub total_matches: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TeamInfo {
    pub id: String,
    pub name: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordInfo {
    pub id: String,
    pub team_id: String,
    pub team_name: String,
    pub match_number: i32,
    pub day: i32,
    pub placement: i32,
    pub kills: i32,
    pub points: i32,
    pub screenshot_url: String,
}

/// Per-item outcome of a screenshot batch upload. A failed item never aborts
/// the rest of the batch, its error ends up in `errors` instead.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UploadReport {
    pub uploaded: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArchiveOutcome {
    pub history_id: Option<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HistoryMvp {
    pub player_name: String,
    pub total_kills: i32,
    pub matches_count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub tournament_name: String,
    pub tournament_description: Option<String>,
    pub total_matches: i32,
    pub standings: Vec<standings::StandingRow>,
    pub mvp: Option<HistoryMvp>,
    pub original_tournament_id: String,
    pub archived_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionStatus {
    pub role: String,
    pub team_id: Option<String>,
}
