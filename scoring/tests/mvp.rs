use pretty_assertions::assert_eq;
use scoring::mvp::{aggregate_players, compute_mvp, compute_top_damage, PlayerAggregate, PlayerLine};

fn line(name: &str, kills: u32, damage: u32) -> PlayerLine {
    PlayerLine {
        name: name.to_owned(),
        kills,
        damage,
    }
}

#[test]
fn aggregates_by_exact_name() {
    let lines = [
        line("Haze", 4, 320),
        line("zodiac", 2, 150),
        line("Haze", 3, 410),
        // different string, different player
        line("haze", 9, 10),
    ];

    let expected = vec![
        PlayerAggregate {
            name: "Haze".to_owned(),
            kills: 7,
            damage: 730,
            matches: 2,
        },
        PlayerAggregate {
            name: "zodiac".to_owned(),
            kills: 2,
            damage: 150,
            matches: 1,
        },
        PlayerAggregate {
            name: "haze".to_owned(),
            kills: 9,
            damage: 10,
            matches: 1,
        },
    ];

    assert_eq!(aggregate_players(&lines), expected);
}

#[test]
fn no_lines_no_mvp() {
    assert_eq!(compute_mvp(&[]), None);
    assert_eq!(compute_top_damage(&[]), None);
}

#[test]
fn mvp_tie_keeps_first_seen() {
    // both end up at 10 kills, across different teams' stat rows
    let forward = [
        line("Excel", 6, 500),
        line("cute", 10, 420),
        line("Excel", 4, 300),
    ];
    let reversed = [
        line("cute", 10, 420),
        line("Excel", 6, 500),
        line("Excel", 4, 300),
    ];

    // deterministic for a fixed input order: whoever was aggregated first
    // holds the title
    assert_eq!(compute_mvp(&forward).map(|m| m.name), Some("Excel".to_owned()));
    assert_eq!(compute_mvp(&reversed).map(|m| m.name), Some("cute".to_owned()));
}

#[test]
fn damage_title_is_independent() {
    let lines = [
        line("Excel", 10, 200),
        line("cute", 3, 900),
    ];

    let mvp = compute_mvp(&lines).unwrap();
    let top_damage = compute_top_damage(&lines).unwrap();

    assert_eq!(mvp.name, "Excel");
    assert_eq!(mvp.kills, 10);
    assert_eq!(top_damage.name, "cute");
    assert_eq!(top_damage.damage, 900);
}

#[test]
fn mvp_carries_matches_count() {
    let lines = [
        line("Excel", 6, 500),
        line("Excel", 4, 300),
        line("cute", 3, 900),
    ];

    let mvp = compute_mvp(&lines).unwrap();

    assert_eq!(mvp.matches, 2);
}
