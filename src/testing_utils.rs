use chrono::DateTime;
use serde_json::{Value, json};

use crate::data_fetcher::models::{ApiPrediction, Fixture, Prediction};

/// Test utilities for creating fixtures, predictions and provider payloads
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// Kickoff used by every generated fixture
    pub const KICKOFF: &'static str = "2024-05-01T19:00:00+00:00";

    /// Creates a not-started fixture with an empty prediction
    pub fn fixture(id: i64, league_id: i64) -> Fixture {
        Fixture {
            id,
            league_id,
            league_name: format!("League {league_id}"),
            country: "England".to_string(),
            round: Some("Regular Season - 35".to_string()),
            kickoff_time: DateTime::parse_from_rfc3339(Self::KICKOFF)
                .expect("test kickoff is valid RFC 3339"),
            home_team: format!("Home {id}"),
            away_team: format!("Away {id}"),
            venue: Some("Stadium, City".to_string()),
            prediction: Prediction::Empty,
        }
    }

    /// Creates an available prediction naming `winner`
    pub fn prediction(winner: &str) -> Prediction {
        let raw: ApiPrediction = serde_json::from_value(Self::prediction_json(winner))
            .expect("test prediction payload is valid");
        Prediction::from_response(vec![raw])
    }

    /// Raw `/fixtures` response item
    pub fn fixture_json(id: i64, league_id: i64) -> Value {
        json!({
            "fixture": {
                "id": id,
                "referee": null,
                "timezone": "UTC",
                "date": Self::KICKOFF,
                "timestamp": 1714590000,
                "venue": {"id": 1, "name": "Stadium", "city": "City"},
                "status": {"long": "Not Started", "short": "NS", "elapsed": null}
            },
            "league": {
                "id": league_id,
                "name": format!("League {league_id}"),
                "country": "England",
                "season": 2023,
                "round": "Regular Season - 35"
            },
            "teams": {
                "home": {"id": id * 10, "name": format!("Home {id}"), "winner": null},
                "away": {"id": id * 10 + 1, "name": format!("Away {id}"), "winner": null}
            },
            "goals": {"home": null, "away": null}
        })
    }

    /// Raw `/predictions` response item
    pub fn prediction_json(winner: &str) -> Value {
        json!({
            "predictions": {
                "winner": {"id": 42, "name": winner, "comment": "Win or draw"},
                "win_or_draw": true,
                "under_over": "-2.5",
                "advice": format!("Double chance : {winner} or draw"),
                "percent": {"home": "50%", "draw": "25%", "away": "25%"}
            },
            "teams": {
                "home": {
                    "id": 42,
                    "name": winner,
                    "last_5": {"played": 5, "form": "80%", "att": "70%", "def": "60%"},
                    "league": {"form": "WWDLW"}
                },
                "away": {
                    "id": 43,
                    "name": "Opponent",
                    "last_5": {"played": 5, "form": "40%", "att": "50%", "def": "30%"},
                    "league": {"form": "LDLWL"}
                }
            },
            "comparison": {
                "form": {"home": "67%", "away": "33%"},
                "h2h": {"home": "55%", "away": "45%"},
                "total": {"home": "60%", "away": "40%"}
            }
        })
    }

    /// Wraps items in the provider envelope with paging metadata
    pub fn envelope(items: Vec<Value>, current: u32, total: u32) -> Value {
        json!({
            "get": "fixtures",
            "parameters": {},
            "errors": [],
            "results": items.len(),
            "paging": {"current": current, "total": total},
            "response": items
        })
    }
}
