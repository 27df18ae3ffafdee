//! Report rows for enriched fixtures: CSV export and a terminal summary

use chrono_tz::Tz;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tokio::fs;

use crate::data_fetcher::models::{Fixture, SidePair};
use crate::error::AppError;

/// Placeholder for any cell without a value
pub const PLACEHOLDER: &str = "-";

/// Replaces W/D/L in a season form string with result symbols.
pub fn format_league_form(form: &str) -> String {
    form.chars()
        .map(|c| match c {
            'W' => "✅".to_string(),
            'L' => "❌".to_string(),
            'D' => "🔘".to_string(),
            other => other.to_string(),
        })
        .collect()
}

/// One report line per fixture. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "League")]
    pub league: String,
    #[serde(rename = "Home")]
    pub home: String,
    #[serde(rename = "Away")]
    pub away: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Prediction")]
    pub winner: String,
    #[serde(rename = "Advice")]
    pub advice: String,
    #[serde(rename = "Prob Home")]
    pub prob_home: String,
    #[serde(rename = "Prob Draw")]
    pub prob_draw: String,
    #[serde(rename = "Prob Away")]
    pub prob_away: String,
    #[serde(rename = "Played Home")]
    pub played_home: String,
    #[serde(rename = "Played Away")]
    pub played_away: String,
    #[serde(rename = "Form Home")]
    pub form_home: String,
    #[serde(rename = "Form Away")]
    pub form_away: String,
    #[serde(rename = "ATT Home")]
    pub att_home: String,
    #[serde(rename = "ATT Away")]
    pub att_away: String,
    #[serde(rename = "DEF Home")]
    pub def_home: String,
    #[serde(rename = "DEF Away")]
    pub def_away: String,
    #[serde(rename = "H2H Home")]
    pub h2h_home: String,
    #[serde(rename = "H2H Away")]
    pub h2h_away: String,
    #[serde(rename = "Comp Home")]
    pub comp_home: String,
    #[serde(rename = "Comp Away")]
    pub comp_away: String,
}

fn cell(value: Option<&String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn count_cell(value: Option<u32>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

impl ReportRow {
    /// Builds the row for `fixture`, showing kickoff in `tz`.
    /// Every prediction-derived cell is `-` when the prediction is empty.
    pub fn from_fixture(fixture: &Fixture, tz: Tz) -> Self {
        let kickoff = fixture.kickoff_time.with_timezone(&tz);
        let details = fixture.prediction.details();
        let total: Option<&SidePair> = details.and_then(|d| d.comparison.total.as_ref());
        let h2h: Option<&SidePair> = details.and_then(|d| d.comparison.h2h.as_ref());

        ReportRow {
            country: cell(Some(&fixture.country)),
            league: fixture.league_name.clone(),
            home: fixture.home_team.clone(),
            away: fixture.away_team.clone(),
            date: kickoff.format("%d-%m-%Y").to_string(),
            time: kickoff.format("%H:%M %Z").to_string(),
            winner: cell(details.and_then(|d| d.winner.as_ref())),
            advice: cell(details.and_then(|d| d.advice.as_ref())),
            prob_home: cell(details.and_then(|d| d.percent.home.as_ref())),
            prob_draw: cell(details.and_then(|d| d.percent.draw.as_ref())),
            prob_away: cell(details.and_then(|d| d.percent.away.as_ref())),
            played_home: count_cell(details.and_then(|d| d.home.played)),
            played_away: count_cell(details.and_then(|d| d.away.played)),
            form_home: cell(details.and_then(|d| d.home.form.as_ref())),
            form_away: cell(details.and_then(|d| d.away.form.as_ref())),
            att_home: cell(details.and_then(|d| d.home.attack.as_ref())),
            att_away: cell(details.and_then(|d| d.away.attack.as_ref())),
            def_home: cell(details.and_then(|d| d.home.defence.as_ref())),
            def_away: cell(details.and_then(|d| d.away.defence.as_ref())),
            h2h_home: cell(h2h.map(|p| &p.home)),
            h2h_away: cell(h2h.map(|p| &p.away)),
            comp_home: cell(total.map(|t| &t.home)),
            comp_away: cell(total.map(|t| &t.away)),
        }
    }
}

/// Builds report rows in fixture order.
pub fn build_rows(fixtures: &[Fixture], tz: Tz) -> Vec<ReportRow> {
    fixtures.iter().map(|f| ReportRow::from_fixture(f, tz)).collect()
}

/// Writes rows as CSV (header line first) to any writer.
pub fn write_csv_to<W: Write>(writer: W, rows: &[ReportRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes rows as a CSV file, creating the parent directory when needed.
pub async fn write_csv(path: impl AsRef<Path>, rows: &[ReportRow]) -> Result<(), AppError> {
    let path = path.as_ref();
    let mut buffer = Vec::new();
    write_csv_to(&mut buffer, rows)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, buffer).await?;
    Ok(())
}

fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{text}{}", " ".repeat(width - count))
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

/// Renders a compact text table: kickoff, league, match, predicted winner
/// and probabilities, followed by the total count. Round, venue and season
/// form go on indented detail lines.
pub fn render_table(date: &str, rows: &[ReportRow], fixtures: &[Fixture]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Predictions for {date}\n"));
    out.push_str(&format!(
        "{} {} {} {} {}\n",
        fit("Time", 10),
        fit("League", 22),
        fit("Match", 40),
        fit("Prediction", 22),
        "H / D / A"
    ));
    out.push_str(&"─".repeat(110));
    out.push('\n');

    for (row, fixture) in rows.iter().zip(fixtures) {
        let matchup = format!("{} vs {}", row.home, row.away);
        out.push_str(&format!(
            "{} {} {} {} {} / {} / {}\n",
            fit(&row.time, 10),
            fit(&row.league, 22),
            fit(&matchup, 40),
            fit(&row.winner, 22),
            row.prob_home,
            row.prob_draw,
            row.prob_away
        ));

        let place: Vec<&str> = [fixture.round.as_deref(), fixture.venue.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !place.is_empty() {
            out.push_str(&format!("{}{}\n", " ".repeat(11), place.join(" @ ")));
        }

        if let Some(details) = fixture.prediction.details() {
            let home_form = details.home.league_form.as_deref().map(format_league_form);
            let away_form = details.away.league_form.as_deref().map(format_league_form);
            if let (Some(home_form), Some(away_form)) = (home_form, away_form) {
                out.push_str(&format!("{}form {home_form} | {away_form}\n", " ".repeat(11)));
            }
        }
    }

    out.push_str(&"─".repeat(110));
    out.push('\n');
    out.push_str(&format!("Total predictions: {} fixtures\n", rows.len()));
    out
}
