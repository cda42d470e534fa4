use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::attendance::total_attendance_count;
use crate::scoring::Standing;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a point total for display. Totals are not clamped, so negatives
/// keep their sign.
pub fn format_points(points: i64) -> String {
    points.to_string()
}

/// Format standings as a ranked table with columns: Rank, Points, Name,
/// Activity summary.
/// Rank column: 3 chars (fits "99."), right-aligned
/// Points column is right-aligned, 6 chars wide
pub fn format_standings_table(standings: &[Standing<'_>], use_colors: bool) -> String {
    if standings.is_empty() {
        return "Nenhum participante encontrado.".to_string();
    }

    let term_width = get_terminal_width();

    let rank_width = 3;
    let points_width = 6;
    let separator = "  ";

    // Name column takes what remains after rank, points and the summary.
    let summary_width = 24;
    let name_width = term_width
        .map(|w| {
            w.saturating_sub(rank_width + points_width + summary_width + 3 * separator.len())
                .max(12)
        })
        .unwrap_or(32);

    standings
        .iter()
        .enumerate()
        .map(|(idx, standing)| {
            let rank = format!("{:>width$}.", idx + 1, width = rank_width - 1);
            let points = format!("{:>width$}", format_points(standing.result.total), width = points_width);
            let name = truncate_name(&standing.participant.name, name_width);
            let summary = activity_summary(standing);

            if use_colors {
                format!(
                    "{}{}{}{}{}{}{}",
                    rank.dimmed(),
                    separator,
                    points.bold(),
                    separator,
                    name,
                    separator,
                    summary.dimmed()
                )
            } else {
                format!(
                    "{}{}{}{}{}{}{}",
                    rank, separator, points, separator, name, separator, summary
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single participant with their score breakdown (verbose mode).
pub fn format_standing_detail(standing: &Standing<'_>, use_colors: bool) -> String {
    let mut lines = Vec::new();

    if use_colors {
        lines.push(format!(
            "{}  {}",
            standing.participant.name.bold(),
            format_points(standing.result.total).bold()
        ));
    } else {
        lines.push(format!(
            "{}  {}",
            standing.participant.name,
            format_points(standing.result.total)
        ));
    }

    let breakdown = &standing.result.breakdown;
    if breakdown.start_points != 0 {
        lines.push(format!("  Base: {}", format_points(breakdown.start_points)));
    }
    for category in &breakdown.categories {
        lines.push(format!(
            "  {}: {:+} ({})",
            category.label,
            category.delta(),
            category.detail
        ));
    }

    lines.join("\n")
}

/// One-line activity summary shown next to each standing,
/// e.g. "8 presenças, 2 versículos, 1 visitante"
fn activity_summary(standing: &Standing<'_>) -> String {
    let mut parts = Vec::new();

    let attendance = total_attendance_count(standing.participant);
    if attendance > 0 {
        parts.push(format!("{} presenças", attendance));
    }
    let verses = standing.participant.memorized_verse_refs().len();
    if verses > 0 {
        parts.push(format!("{} versículos", verses));
    }
    let visitors = standing.participant.visitor_count();
    if visitors > 0 {
        parts.push(format!("{} visitantes", visitors));
    }

    parts.join(", ")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        format!("{:<width$}", name, width = max_width)
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::Participant;
    use crate::scoring::rank_participants;

    fn participant(id: u32, name: &str, start_points: i64) -> Participant {
        Participant {
            id,
            name: name.to_string(),
            start_points: Some(start_points),
            points: None,
            memorized_verses: None,
            visitors: None,
            attendance: None,
            candidato_progress: None,
            disciplines: None,
        }
    }

    #[test]
    fn test_empty_standings_message() {
        assert_eq!(
            format_standings_table(&[], false),
            "Nenhum participante encontrado."
        );
    }

    #[test]
    fn test_table_ranks_in_order() {
        let participants = vec![participant(1, "Ana", 50), participant(2, "Bruno", 120)];
        let standings = rank_participants(&participants, &[], None, "NVI", None, None);
        let table = format_standings_table(&standings, false);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Bruno"));
        assert!(lines[0].contains("120"));
        assert!(lines[1].contains("Ana"));
        assert!(lines[1].starts_with(" 2."));
    }

    #[test]
    fn test_negative_totals_keep_their_sign() {
        assert_eq!(format_points(-15), "-15");
        assert_eq!(format_points(0), "0");
    }

    #[test]
    fn test_detail_includes_breakdown() {
        let mut p = participant(1, "Ana", 100);
        p.visitors = Some(vec!["Pedro".to_string()]);
        let rules = vec![crate::data::types::Rule {
            id: 1,
            description: "Cada visitante convidado".to_string(),
            points: 25,
            icon: None,
            explanation: None,
            activity_type: None,
        }];
        let participants = vec![p];
        let standings = rank_participants(&participants, &rules, None, "NVI", None, None);
        let detail = format_standing_detail(&standings[0], false);

        assert!(detail.contains("Ana"));
        assert!(detail.contains("125"));
        assert!(detail.contains("Base: 100"));
        assert!(detail.contains("Visitantes: +25"));
    }

    #[test]
    fn test_truncate_name_unicode_safe() {
        assert_eq!(truncate_name("João", 10), "João      ");
        assert_eq!(truncate_name("João Gabriel dos Santos", 10), "João Ga...");
    }
}
