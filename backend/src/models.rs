use diesel::prelude::*;

/// How a match record came into the system. Persisted as its own column,
/// the `screenshot_url` sentinels only remain as a compatibility shim for
/// rows written before the column existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Automatic,
    Manual,
    DailyTotal,
}

impl RecordKind {
    /// Sentinel stored in `screenshot_url` for manually keyed per-match rows.
    pub const MANUAL_URL: &'static str = "manual-entry";
    /// Sentinel stored in `screenshot_url` for daily aggregate rows.
    pub const DAILY_TOTAL_URL: &'static str = "daily-total-entry";

    pub fn as_i16(self) -> i16 {
        match self {
            Self::Automatic => 0,
            Self::Manual => 1,
            Self::DailyTotal => 2,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Automatic),
            1 => Some(Self::Manual),
            2 => Some(Self::DailyTotal),
            _ => None,
        }
    }

    /// Legacy rows encode their kind through the url sentinel instead of the
    /// kind column.
    pub fn from_screenshot_url(url: &str) -> Self {
        match url {
            Self::MANUAL_URL => Self::Manual,
            Self::DAILY_TOTAL_URL => Self::DailyTotal,
            _ => Self::Automatic,
        }
    }
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::tournaments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Tournament {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub total_matches: i32,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Team {
    pub id: uuid::Uuid,
    pub tournament_id: uuid::Uuid,
    pub name: String,
    pub logo_url: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::match_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MatchRecord {
    pub id: uuid::Uuid,
    pub team_id: uuid::Uuid,
    pub match_number: i32,
    pub day: i32,
    pub placement: i32,
    pub kills: i32,
    pub points: i32,
    pub kind: i16,
    pub screenshot_url: String,
    pub analyzed_at: chrono::NaiveDateTime,
}

impl MatchRecord {
    pub fn kind(&self) -> RecordKind {
        RecordKind::from_i16(self.kind)
            .unwrap_or_else(|| RecordKind::from_screenshot_url(&self.screenshot_url))
    }
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::player_stats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PlayerStat {
    pub id: uuid::Uuid,
    pub record_id: Option<uuid::Uuid>,
    pub team_id: uuid::Uuid,
    pub player_name: String,
    pub kills: i32,
    pub damage: i32,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::tournament_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TournamentHistory {
    pub id: uuid::Uuid,
    pub tournament_name: String,
    pub tournament_description: Option<String>,
    pub total_matches: i32,
    pub standings: serde_json::Value,
    pub mvp_player_name: Option<String>,
    pub mvp_total_kills: i32,
    pub mvp_matches_count: i32,
    pub original_tournament_id: uuid::Uuid,
    pub archived_at: chrono::NaiveDateTime,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::access_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AccessCode {
    pub code: String,
    pub team_id: Option<uuid::Uuid>,
    pub role: String,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Session {
    pub id: String,
    pub access_code: Option<String>,
    pub expiry_date: String,
}

#[cfg(test)]
mod tests {
    use super::RecordKind;

    #[test]
    fn kind_column_round_trip() {
        for kind in [RecordKind::Automatic, RecordKind::Manual, RecordKind::DailyTotal] {
            assert_eq!(RecordKind::from_i16(kind.as_i16()), Some(kind));
        }

        assert_eq!(RecordKind::from_i16(7), None);
    }

    #[test]
    fn sentinel_shim_matches_legacy_rows() {
        assert_eq!(
            RecordKind::from_screenshot_url("manual-entry"),
            RecordKind::Manual
        );
        assert_eq!(
            RecordKind::from_screenshot_url("daily-total-entry"),
            RecordKind::DailyTotal
        );
        assert_eq!(
            RecordKind::from_screenshot_url("https://storage.example/team/1.png"),
            RecordKind::Automatic
        );
    }
}
