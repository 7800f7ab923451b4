//! Plain-text renderings of results for clipboard sharing. Pure
//! formatting over the core shapes, no state.

use std::fmt::Write;

use crate::record::models::GameRecord;
use crate::scoring::{RoundSettlement, RuleConfig};
use crate::session::models::SessionStanding;

fn rules_line(settings: &RuleConfig) -> String {
    format!(
        "Rules: {} start / {} return / uma {}",
        settings.starting_points, settings.return_points, settings.uma
    )
}

/// Renders one settled round in rank order, raw scores included
pub fn format_round_result(
    players: &[RoundSettlement],
    settings: &RuleConfig,
    date: chrono::DateTime<chrono::Utc>,
) -> String {
    let mut sorted: Vec<&RoundSettlement> = players.iter().collect();
    sorted.sort_by_key(|p| p.rank);

    let mut text = format!("[Match Result] {}\n", date.format("%Y-%m-%d"));
    text.push_str(&rules_line(settings));
    text.push_str("\n\n");
    for player in sorted {
        let _ = writeln!(
            text,
            "#{} {} {:+.1}pt ({})",
            player.rank, player.name, player.final_score, player.raw_score
        );
    }
    text
}

/// Renders a full record: the round result plus venue, highlights and
/// tags when present
pub fn format_record_detail(record: &GameRecord) -> String {
    let mut text = format_round_result(&record.players, &record.settings, record.date);

    if let Some(venue) = &record.venue {
        let _ = writeln!(text, "\nVenue: {}", venue);
    }
    if !record.highlights.is_empty() {
        text.push_str("\nHighlights:\n");
        for highlight in &record.highlights {
            let _ = writeln!(text, "- {}", highlight.text);
        }
    }
    if !record.tags.is_empty() {
        let _ = writeln!(text, "\nTags: {}", record.tags.join(", "));
    }
    text
}

/// Renders a session's cumulative standings, no raw-score detail
pub fn format_session_summary(
    name: &str,
    standings: &[SessionStanding],
    settings: &RuleConfig,
) -> String {
    let mut text = format!("[Session Result] {}\n", name);
    text.push_str(&rules_line(settings));
    text.push_str("\n\n");
    for standing in standings {
        let _ = writeln!(
            text,
            "#{} {} {:+.1}pt",
            standing.rank, standing.name, standing.total_final_score
        );
    }
    text
}
