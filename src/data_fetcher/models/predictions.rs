use serde::{Deserialize, Serialize};

// Raw `GET /predictions` payload. Only the fields the report uses are modelled;
// serde skips the rest (h2h history, goal averages, poisson, league block).

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiPrediction {
    pub predictions: ApiPredictionSummary,
    pub teams: ApiPredictionTeams,
    #[serde(default)]
    pub comparison: ApiComparison,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiPredictionSummary {
    #[serde(default)]
    pub winner: Option<ApiWinner>,
    #[serde(default)]
    pub advice: Option<String>,
    #[serde(default)]
    pub percent: ApiPercent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiWinner {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiPercent {
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub draw: Option<String>,
    #[serde(default)]
    pub away: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiPredictionTeams {
    pub home: ApiPredictionTeam,
    pub away: ApiPredictionTeam,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiPredictionTeam {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_5: ApiLastFive,
    #[serde(default)]
    pub league: ApiTeamLeagueStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiLastFive {
    #[serde(default)]
    pub played: Option<u32>,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub att: Option<String>,
    #[serde(default)]
    pub def: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiTeamLeagueStats {
    #[serde(default)]
    pub form: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiComparison {
    #[serde(default)]
    pub h2h: Option<ApiSidePair>,
    #[serde(default)]
    pub total: Option<ApiSidePair>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSidePair {
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub away: Option<String>,
}

/// Prediction attached to a fixture.
///
/// `Empty` covers both "upstream has nothing yet" and "enrichment failed";
/// empty values are never cached.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Prediction {
    Available(Box<PredictionDetails>),
    #[default]
    Empty,
}

impl Prediction {
    pub fn is_empty(&self) -> bool {
        matches!(self, Prediction::Empty)
    }

    pub fn details(&self) -> Option<&PredictionDetails> {
        match self {
            Prediction::Available(details) => Some(details),
            Prediction::Empty => None,
        }
    }

    /// Builds a prediction from the envelope's `response` array (zero or one object).
    pub fn from_response(response: Vec<ApiPrediction>) -> Self {
        match response.into_iter().next() {
            Some(raw) => Prediction::Available(Box::new(PredictionDetails::from(raw))),
            None => Prediction::Empty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionDetails {
    pub winner: Option<String>,
    pub advice: Option<String>,
    pub percent: Percentages,
    pub home: TeamOutlook,
    pub away: TeamOutlook,
    pub comparison: Comparison,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Percentages {
    pub home: Option<String>,
    pub draw: Option<String>,
    pub away: Option<String>,
}

/// Recent form for one side of the fixture
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamOutlook {
    pub name: Option<String>,
    /// Matches counted in the last-five window
    pub played: Option<u32>,
    /// Last-five form rating, e.g. "60%"
    pub form: Option<String>,
    pub attack: Option<String>,
    pub defence: Option<String>,
    /// Season form string, e.g. "WWDLW"
    pub league_form: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Comparison {
    /// Head-to-head share
    pub h2h: Option<SidePair>,
    pub total: Option<SidePair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePair {
    pub home: String,
    pub away: String,
}

/// Keeps a comparison only when both sides are reported.
fn side_pair(raw: Option<ApiSidePair>) -> Option<SidePair> {
    let raw = raw?;
    match (raw.home, raw.away) {
        (Some(home), Some(away)) => Some(SidePair { home, away }),
        _ => None,
    }
}

impl From<ApiPredictionTeam> for TeamOutlook {
    fn from(raw: ApiPredictionTeam) -> Self {
        TeamOutlook {
            name: raw.name,
            played: raw.last_5.played,
            form: raw.last_5.form,
            attack: raw.last_5.att,
            defence: raw.last_5.def,
            league_form: raw.league.form.filter(|f| !f.is_empty()),
        }
    }
}

impl From<ApiPrediction> for PredictionDetails {
    fn from(raw: ApiPrediction) -> Self {
        let summary = raw.predictions;
        PredictionDetails {
            winner: summary.winner.and_then(|w| w.name),
            advice: summary.advice,
            percent: Percentages {
                home: summary.percent.home,
                draw: summary.percent.draw,
                away: summary.percent.away,
            },
            home: raw.teams.home.into(),
            away: raw.teams.away.into(),
            comparison: Comparison {
                h2h: side_pair(raw.comparison.h2h),
                total: side_pair(raw.comparison.total),
            },
        }
    }
}
