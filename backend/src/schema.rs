diesel::table! {
    access_codes (code) {
        code -> Text,
        team_id -> Nullable<Uuid>,
        role -> Text,
    }
}

diesel::table! {
    match_records (id) {
        id -> Uuid,
        team_id -> Uuid,
        match_number -> Int4,
        day -> Int4,
        placement -> Int4,
        kills -> Int4,
        points -> Int4,
        kind -> Int2,
        screenshot_url -> Text,
        analyzed_at -> Timestamp,
    }
}

diesel::table! {
    player_stats (id) {
        id -> Uuid,
        record_id -> Nullable<Uuid>,
        team_id -> Uuid,
        player_name -> Text,
        kills -> Int4,
        damage -> Int4,
    }
}

diesel::table! {
    sessions (id) {
        id -> Text,
        access_code -> Nullable<Text>,
        expiry_date -> Text,
    }
}

diesel::table! {
    teams (id) {
        id -> Uuid,
        tournament_id -> Uuid,
        name -> Text,
        logo_url -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    tournament_history (id) {
        id -> Uuid,
        tournament_name -> Text,
        tournament_description -> Nullable<Text>,
        total_matches -> Int4,
        standings -> Json,
        mvp_player_name -> Nullable<Text>,
        mvp_total_kills -> Int4,
        mvp_matches_count -> Int4,
        original_tournament_id -> Uuid,
        archived_at -> Timestamp,
    }
}

diesel::table! {
    tournaments (id) {
        id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        total_matches -> Int4,
        created_at -> Timestamp,
    }
}

diesel::joinable!(teams -> tournaments (tournament_id));
diesel::joinable!(match_records -> teams (team_id));
diesel::joinable!(player_stats -> teams (team_id));
diesel::joinable!(player_stats -> match_records (record_id));

diesel::allow_tables_to_appear_in_same_query!(
    access_codes,
    match_records,
    player_stats,
    sessions,
    teams,
    tournament_history,
    tournaments,
);
