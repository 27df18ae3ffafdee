use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::predictions::Prediction;

/// Raw fixture record as returned by `GET /fixtures`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFixture {
    pub fixture: ApiFixtureInfo,
    pub league: ApiLeagueInfo,
    pub teams: ApiFixtureTeams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFixtureInfo {
    pub id: i64,
    pub date: DateTime<FixedOffset>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub venue: Option<ApiVenue>,
    #[serde(default)]
    pub status: Option<ApiFixtureStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiVenue {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiFixtureStatus {
    #[serde(default)]
    pub short: Option<String>,
    #[serde(default)]
    pub long: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiLeagueInfo {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub season: Option<i32>,
    #[serde(default)]
    pub round: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFixtureTeams {
    pub home: ApiTeamRef,
    pub away: ApiTeamRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTeamRef {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

/// One scheduled match, as surfaced by the pipeline.
///
/// `prediction` is always present; it stays [`Prediction::Empty`] until
/// enrichment succeeds and remains empty if enrichment fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: i64,
    pub league_id: i64,
    pub league_name: String,
    pub country: String,
    pub round: Option<String>,
    pub kickoff_time: DateTime<FixedOffset>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub prediction: Prediction,
}

impl Fixture {
    /// Returns the fixture with `prediction` replaced.
    pub fn with_prediction(mut self, prediction: Prediction) -> Self {
        self.prediction = prediction;
        self
    }
}

impl From<ApiFixture> for Fixture {
    fn from(raw: ApiFixture) -> Self {
        let venue = raw.fixture.venue.and_then(|v| match (v.name, v.city) {
            (Some(name), Some(city)) => Some(format!("{name}, {city}")),
            (Some(name), None) => Some(name),
            (None, city) => city,
        });

        Fixture {
            id: raw.fixture.id,
            league_id: raw.league.id,
            league_name: raw.league.name,
            country: raw.league.country.unwrap_or_default(),
            round: raw.league.round,
            kickoff_time: raw.fixture.date,
            home_team: raw.teams.home.name,
            away_team: raw.teams.away.name,
            venue,
            prediction: Prediction::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_fixture_into_fixture() {
        let raw: ApiFixture = serde_json::from_value(json!({
            "fixture": {
                "id": 1035037,
                "date": "2024-05-01T19:00:00+00:00",
                "timezone": "UTC",
                "venue": {"id": 556, "name": "Old Trafford", "city": "Manchester"},
                "status": {"long": "Not Started", "short": "NS", "elapsed": null}
            },
            "league": {
                "id": 39,
                "name": "Premier League",
                "country": "England",
                "season": 2023,
                "round": "Regular Season - 35"
            },
            "teams": {
                "home": {"id": 33, "name": "Manchester United", "winner": null},
                "away": {"id": 50, "name": "Manchester City", "winner": null}
            },
            "goals": {"home": null, "away": null}
        }))
        .unwrap();

        let fixture = Fixture::from(raw);
        assert_eq!(fixture.id, 1035037);
        assert_eq!(fixture.league_id, 39);
        assert_eq!(fixture.country, "England");
        assert_eq!(fixture.home_team, "Manchester United");
        assert_eq!(fixture.away_team, "Manchester City");
        assert_eq!(fixture.venue.as_deref(), Some("Old Trafford, Manchester"));
        assert_eq!(fixture.kickoff_time.to_rfc3339(), "2024-05-01T19:00:00+00:00");
        assert!(fixture.prediction.is_empty());
    }

    #[test]
    fn test_fixture_missing_required_field_fails() {
        let result = serde_json::from_value::<ApiFixture>(json!({
            "fixture": {"id": 1, "date": "2024-05-01T19:00:00+00:00"},
            "teams": {"home": {"name": "A"}, "away": {"name": "B"}}
        }));
        assert!(result.is_err());
    }
}
