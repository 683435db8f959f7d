use pretty_assertions::assert_eq;
use scoring::rank::{csv_filename, rank, standings_csv, TeamStanding, CSV_HEADER};
use scoring::standing::StandingFigure;

fn standing(team: &str, total_points: u32, placement_points: u32) -> TeamStanding {
    TeamStanding {
        team: team.to_owned(),
        logo_url: None,
        figure: StandingFigure {
            total_points,
            placement_points,
            kill_points: total_points - placement_points,
            total_kills: total_points - placement_points,
            matches_played: 2,
            first_place_wins: 0,
        },
    }
}

#[test]
fn orders_by_total_then_placement() {
    let ranked = rank(vec![
        standing("Third", 18, 9),
        standing("First", 30, 12),
        standing("Second", 18, 11),
    ]);

    let names: Vec<_> = ranked.iter().map(|s| s.team.as_str()).collect();

    assert_eq!(names, vec!["First", "Second", "Third"]);
}

#[test]
fn full_ties_are_positional() {
    let a = standing("Alpha", 20, 10);
    let b = standing("Bravo", 20, 10);

    let forward = rank(vec![a.clone(), b.clone()]);
    let backward = rank(vec![b.clone(), a.clone()]);

    assert_eq!(forward[0].team, "Alpha");
    assert_eq!(backward[0].team, "Bravo");
}

#[test]
fn csv_round_trips() {
    let ranked = rank(vec![
        standing("Raging Raptors", 30, 12),
        standing("Last, but not least", 18, 9),
    ]);

    let csv_text = standings_csv(&ranked).unwrap();

    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    assert_eq!(
        reader.headers().unwrap(),
        &csv::StringRecord::from(CSV_HEADER.to_vec())
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);

    for (idx, (row, standing)) in rows.iter().zip(&ranked).enumerate() {
        assert_eq!(&row[0], (idx + 1).to_string().as_str());
        assert_eq!(&row[1], standing.team.as_str());
        assert_eq!(&row[2], standing.figure.total_points.to_string().as_str());
        assert_eq!(&row[3], standing.figure.placement_points.to_string().as_str());
        assert_eq!(&row[4], standing.figure.kill_points.to_string().as_str());
        assert_eq!(&row[5], standing.figure.total_kills.to_string().as_str());
        assert_eq!(&row[6], standing.figure.matches_played.to_string().as_str());
        assert_eq!(&row[7], standing.figure.first_place_wins.to_string().as_str());
    }

    // the embedded comma must survive as part of the team name
    assert_eq!(&rows[1][1], "Last, but not least");
}

#[test]
fn filename_slugs_name_and_date() {
    let date = chrono::NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();

    assert_eq!(
        csv_filename("Summer Showdown", date),
        "summer-showdown-standings-2026-08-07.csv"
    );
    assert_eq!(
        csv_filename("PUBG  Invitational ", date),
        "pubg-invitational-standings-2026-08-07.csv"
    );
}
