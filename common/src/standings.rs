#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StandingRow {
    pub rank: u32,
    pub team: String,
    pub logo_url: Option<String>,
    pub total_points: u32,
    pub placement_points: u32,
    pub kill_points: u32,
    pub total_kills: u32,
    pub matches_played: u32,
    pub first_place_wins: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MvpStats {
    pub player_name: String,
    pub total_kills: u32,
    pub total_damage: u32,
    pub matches_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlayerSpotlight {
    pub mvp: Option<MvpStats>,
    pub top_damage: Option<MvpStats>,
}
