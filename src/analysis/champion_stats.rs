use serde::Serialize;
use std::collections::HashMap;

use crate::data::models::ChampionStatRecord;
use crate::data::loader::CHAMPION_STATS_TABLE;
use crate::draft::{ChampionId, Role};
use crate::error::DataIntegrityError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleStats {
    pub role: Role,
    pub pick_rate: f64,
    pub ban_rate: f64,
    pub win_rate: f64,
    pub pick_count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Champion {
    pub id: ChampionId,
    pub name: String,
    /// Playable roles, most picked first.
    pub roles: Vec<RoleStats>,
}

impl Champion {
    pub fn role_stats(&self, role: Role) -> Option<&RoleStats> {
        self.roles.iter().find(|r| r.role == role)
    }

    pub fn plays(&self, role: Role) -> bool {
        self.role_stats(role).is_some()
    }

    pub fn primary_role(&self) -> Option<Role> {
        self.roles.first().map(|r| r.role)
    }

    pub fn max_pick_rate(&self) -> f64 {
        self.roles.iter().map(|r| r.pick_rate).fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectorySummary {
    pub champions: usize,
    pub combinations: usize,
    pub multi_role: usize,
}

/// Champion identities and per-role statistics, ordered by champion id.
#[derive(Debug, Clone)]
pub struct ChampionDirectory {
    champions: Vec<Champion>,
    by_id: HashMap<ChampionId, usize>,
    by_name: HashMap<String, usize>,
    combinations: usize,
}

impl ChampionDirectory {
    pub fn from_records(records: &[ChampionStatRecord]) -> Result<Self, DataIntegrityError> {
        if records.is_empty() {
            return Err(DataIntegrityError::EmptyTable {
                table: CHAMPION_STATS_TABLE,
            });
        }

        let mut names: HashMap<ChampionId, &str> = HashMap::new();
        let mut ids_by_name: HashMap<String, ChampionId> = HashMap::new();
        let mut roles: HashMap<ChampionId, Vec<RoleStats>> = HashMap::new();

        for (idx, rec) in records.iter().enumerate() {
            let line = idx + 2;
            check_rate("Pick_Rate", rec.pick_rate, line)?;
            check_rate("Ban_Rate", rec.ban_rate, line)?;
            check_rate("Win_Rate", rec.win_rate, line)?;

            match names.get(&rec.champion_id) {
                Some(existing) if *existing != rec.champion_name => {
                    return Err(DataIntegrityError::ConflictingName {
                        champion_id: rec.champion_id,
                        first: existing.to_string(),
                        second: rec.champion_name.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    let key = normalize(&rec.champion_name);
                    if let Some(&other) = ids_by_name.get(&key) {
                        return Err(DataIntegrityError::DuplicateName {
                            name: rec.champion_name.clone(),
                            first: other,
                            second: rec.champion_id,
                        });
                    }
                    ids_by_name.insert(key, rec.champion_id);
                    names.insert(rec.champion_id, &rec.champion_name);
                }
            }

            let entry = roles.entry(rec.champion_id).or_default();
            if entry.iter().any(|r| r.role == rec.role) {
                return Err(DataIntegrityError::DuplicateChampionRole {
                    table: CHAMPION_STATS_TABLE,
                    champion_id: rec.champion_id,
                    role: rec.role,
                });
            }
            entry.push(RoleStats {
                role: rec.role,
                pick_rate: rec.pick_rate,
                ban_rate: rec.ban_rate,
                win_rate: rec.win_rate,
                pick_count: rec.pick_count,
            });
        }

        let mut champions: Vec<Champion> = names
            .into_iter()
            .map(|(id, name)| {
                let mut playable: Vec<RoleStats> = roles
                    .remove(&id)
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|r| r.pick_rate > 0.0 || r.pick_count > 0)
                    .collect();
                playable.sort_by(|a, b| {
                    b.pick_rate
                        .total_cmp(&a.pick_rate)
                        .then(a.role.cmp(&b.role))
                });
                Champion {
                    id,
                    name: name.to_string(),
                    roles: playable,
                }
            })
            .collect();
        champions.sort_by_key(|c| c.id);

        let by_id = champions
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.id, idx))
            .collect();
        let by_name = champions
            .iter()
            .enumerate()
            .map(|(idx, c)| (normalize(&c.name), idx))
            .collect();

        Ok(ChampionDirectory {
            champions,
            by_id,
            by_name,
            combinations: records.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.champions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.champions.is_empty()
    }

    /// Champions in directory order (ascending id).
    pub fn iter(&self) -> impl Iterator<Item = &Champion> {
        self.champions.iter()
    }

    pub fn get(&self, id: ChampionId) -> Option<&Champion> {
        self.by_id.get(&id).map(|&idx| &self.champions[idx])
    }

    pub fn name(&self, id: ChampionId) -> Option<&str> {
        self.get(id).map(|c| c.name.as_str())
    }

    /// Display name, or the raw id when the champion is unknown.
    pub fn label(&self, id: ChampionId) -> String {
        self.name(id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{id}"))
    }

    /// Case- and punctuation-insensitive exact name lookup.
    pub fn id_of(&self, name: &str) -> Option<ChampionId> {
        self.by_name
            .get(&normalize(name))
            .map(|&idx| self.champions[idx].id)
    }

    /// Exact match first, then a unique prefix match ("kai" -> "Kai'Sa").
    pub fn search(&self, query: &str) -> Option<&Champion> {
        let key = normalize(query);
        if key.is_empty() {
            return None;
        }
        if let Some(&idx) = self.by_name.get(&key) {
            return Some(&self.champions[idx]);
        }

        let mut matches = self
            .champions
            .iter()
            .filter(|c| normalize(&c.name).starts_with(&key));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    pub fn role_stats(&self, id: ChampionId, role: Role) -> Option<&RoleStats> {
        self.get(id).and_then(|c| c.role_stats(role))
    }

    /// Most played role among `vacant`, else the champion's most played role.
    pub fn best_role(&self, id: ChampionId, vacant: &[Role]) -> Option<Role> {
        let champion = self.get(id)?;
        champion
            .roles
            .iter()
            .find(|r| vacant.contains(&r.role))
            .map(|r| r.role)
            .or_else(|| champion.primary_role())
    }

    pub fn summary(&self) -> DirectorySummary {
        DirectorySummary {
            champions: self.champions.len(),
            combinations: self.combinations,
            multi_role: self.champions.iter().filter(|c| c.roles.len() > 1).count(),
        }
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn check_rate(column: &'static str, value: f64, line: usize) -> Result<(), DataIntegrityError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DataIntegrityError::RateOutOfRange {
            table: CHAMPION_STATS_TABLE,
            column,
            value,
            line,
        })
    }
}
