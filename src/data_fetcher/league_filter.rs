//! Narrows fixtures to the configured leagues

use std::collections::HashSet;

use crate::data_fetcher::models::{Fixture, League};

/// Set of league ids the report covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeagueAllowSet {
    ids: HashSet<i64>,
}

impl LeagueAllowSet {
    pub fn from_leagues(leagues: &[League]) -> Self {
        leagues.iter().map(|league| league.id).collect()
    }

    pub fn contains(&self, league_id: i64) -> bool {
        self.ids.contains(&league_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Sorted, comma-separated ids. Equal sets give equal fingerprints.
    pub fn fingerprint(&self) -> String {
        let mut ids: Vec<i64> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids.iter().map(i64::to_string).collect::<Vec<_>>().join(",")
    }
}

impl FromIterator<i64> for LeagueAllowSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Keeps fixtures whose league is allowed, preserving their relative order.
pub fn filter_fixtures(fixtures: Vec<Fixture>, allowed: &LeagueAllowSet) -> Vec<Fixture> {
    fixtures
        .into_iter()
        .filter(|fixture| allowed.contains(fixture.league_id))
        .collect()
}
