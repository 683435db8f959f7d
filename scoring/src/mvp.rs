use std::collections::HashMap;

/// One per-player stat line as produced by screenshot analysis. Player
/// identity is the exact name string, there is no player entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerLine {
    pub name: String,
    pub kills: u32,
    pub damage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlayerAggregate {
    pub name: String,
    pub kills: u32,
    pub damage: u32,
    pub matches: u32,
}

/// Sums stat lines per player name. The result keeps the order in which
/// names were first encountered, which is what the mvp tie-break relies on.
pub fn aggregate_players(lines: &[PlayerLine]) -> Vec<PlayerAggregate> {
    let mut aggregates: Vec<PlayerAggregate> = Vec::new();
    let mut index = HashMap::new();

    for line in lines {
        let idx = match index.get(line.name.as_str()) {
            Some(idx) => *idx,
            None => {
                index.insert(line.name.clone(), aggregates.len());
                aggregates.push(PlayerAggregate {
                    name: line.name.clone(),
                    kills: 0,
                    damage: 0,
                    matches: 0,
                });
                aggregates.len() - 1
            }
        };

        let entry = &mut aggregates[idx];
        entry.kills += line.kills;
        entry.damage += line.damage;
        entry.matches += 1;
    }

    aggregates
}

/// Player with the highest summed kill count. Ties keep the player that was
/// encountered first in the input.
pub fn compute_mvp(lines: &[PlayerLine]) -> Option<PlayerAggregate> {
    aggregate_players(lines).into_iter().reduce(|best, candidate| {
        if candidate.kills > best.kills {
            candidate
        } else {
            best
        }
    })
}

/// Same as [`compute_mvp`] but over damage. Independent of the kill title,
/// the same player may or may not hold both.
pub fn compute_top_damage(lines: &[PlayerLine]) -> Option<PlayerAggregate> {
    aggregate_players(lines).into_iter().reduce(|best, candidate| {
        if candidate.damage > best.damage {
            candidate
        } else {
            best
        }
    })
}
