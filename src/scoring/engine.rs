use super::rules::{points_for_activity_type, points_for_pattern};
use super::verses::expand_verse_range;
use crate::data::types::{BonusData, GamesData, Participant, Rule, VersesData};

// Description fragments used by rule sets that predate activity-type keys.
// The fallback order (exact key, legacy fragment, the type string itself)
// is load-bearing: changing it changes historical scores.
const VISITOR_PATTERN: &str = "visitante";
const SMALL_VERSE_PATTERN: &str = "<20";
const LARGE_VERSE_PATTERN: &str = ">=20";
const PREREQUISITES_PATTERN: &str = "pre-requisitos";
const MANUAL_TASK_PATTERN: &str = "tarefa manual";

/// Word-count threshold separating small and large verses, and the values
/// used when the rule set has no matching verse rules.
const LARGE_VERSE_WORDS: u32 = 20;
const SMALL_VERSE_FALLBACK: i64 = 25;
const LARGE_VERSE_FALLBACK: i64 = 35;

#[derive(Debug, Clone)]
pub struct CategoryContribution {
    pub label: String,  // e.g. "Presenças", "Visitantes"
    pub detail: String, // e.g. "3 registros", "2 x 25"
    pub before: i64,    // Total before this category
    pub after: i64,     // Total after this category
}

impl CategoryContribution {
    pub fn delta(&self) -> i64 {
        self.after - self.before
    }
}

#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub start_points: i64,
    pub categories: Vec<CategoryContribution>,
}

#[derive(Debug, Clone)]
pub struct ScoreResult {
    pub total: i64,
    pub breakdown: ScoreBreakdown,
}

/// Compute a participant's total score from their activity records.
///
/// Point values come from the rule set, so weights stay configurable
/// without code changes. Deterministic, pure, and total: absent optional
/// inputs contribute zero, lookups that fail degrade to zero, and the
/// legacy raw `points` field on the participant is never consulted.
/// Totals are not clamped and may be negative.
pub fn calculate_score(
    participant: &Participant,
    rules: &[Rule],
    verses_data: Option<&VersesData>,
    selected_version: &str,
    games_data: Option<&GamesData>,
    bonus_data: Option<&BonusData>,
) -> ScoreResult {
    // Baseline frozen from before the tracking system. Opaque: never
    // reconstructed from activity history.
    let start_points = participant.start_points.unwrap_or(0);
    let mut total = start_points;
    let mut categories = Vec::new();

    // Attendance: every record contributes independently, repeats included.
    let records = participant.attendance_records();
    if !records.is_empty() {
        let before = total;
        for record in records {
            total += attendance_points(rules, &record.activity_type);
        }
        categories.push(CategoryContribution {
            label: "Presenças".to_string(),
            detail: format!("{} registros", records.len()),
            before,
            after: total,
        });
    }

    // Visitors
    let visitor_count = participant.visitor_count();
    if visitor_count > 0 {
        let before = total;
        let per_visitor = points_for_pattern(rules, VISITOR_PATTERN);
        total += visitor_count as i64 * per_visitor;
        categories.push(CategoryContribution {
            label: "Visitantes".to_string(),
            detail: format!("{} x {}", visitor_count, per_visitor),
            before,
            after: total,
        });
    }

    // Memorized verses, weighted by word count in the selected translation
    let verse_refs = participant.memorized_verse_refs();
    if !verse_refs.is_empty() {
        let before = total;
        let small = non_zero_or(points_for_pattern(rules, SMALL_VERSE_PATTERN), SMALL_VERSE_FALLBACK);
        let large = non_zero_or(points_for_pattern(rules, LARGE_VERSE_PATTERN), LARGE_VERSE_FALLBACK);
        let mut verse_count = 0usize;
        for reference in verse_refs {
            for single_ref in expand_verse_range(reference) {
                verse_count += 1;
                // Missing word-count metadata scores as a small verse.
                total += match verses_data.and_then(|v| v.word_count(&single_ref, selected_version)) {
                    Some(words) if words >= LARGE_VERSE_WORDS => large,
                    _ => small,
                };
            }
        }
        categories.push(CategoryContribution {
            label: "Versículos".to_string(),
            detail: format!("{} versículos", verse_count),
            before,
            after: total,
        });
    }

    // Candidate-track progress
    if let Some(progress) = &participant.candidato_progress {
        let before = total;
        if progress.prerequisites {
            total += points_for_pattern(rules, PREREQUISITES_PATTERN);
        }
        total += progress.manual_tasks as i64 * points_for_pattern(rules, MANUAL_TASK_PATTERN);
        categories.push(CategoryContribution {
            label: "Progresso".to_string(),
            detail: format!("{} tarefas", progress.manual_tasks),
            before,
            after: total,
        });
    }

    // Discipline: stored per record with specific values, applied verbatim
    let disciplines = participant.discipline_records();
    if !disciplines.is_empty() {
        let before = total;
        for record in disciplines {
            total += record.points;
        }
        categories.push(CategoryContribution {
            label: "Disciplina".to_string(),
            detail: format!("{} ocorrências", disciplines.len()),
            before,
            after: total,
        });
    }

    // Games: every result for this participant, across every game
    if let Some(games) = games_data {
        let before = total;
        let mut appearances = 0usize;
        for game in &games.games {
            for result in game.results.iter().filter(|r| r.participant_id == participant.id) {
                total += result.points;
                appearances += 1;
            }
        }
        if appearances > 0 {
            categories.push(CategoryContribution {
                label: "Jogos".to_string(),
                detail: format!("{} resultados", appearances),
                before,
                after: total,
            });
        }
    }

    // Bonus challenges: same summation semantics as games
    if let Some(bonus) = bonus_data {
        let before = total;
        let mut appearances = 0usize;
        for challenge in &bonus.challenges {
            for result in challenge.results.iter().filter(|r| r.participant_id == participant.id) {
                total += result.points;
                appearances += 1;
            }
        }
        if appearances > 0 {
            categories.push(CategoryContribution {
                label: "Bônus".to_string(),
                detail: format!("{} resultados", appearances),
                before,
                after: total,
            });
        }
    }

    ScoreResult {
        total,
        breakdown: ScoreBreakdown {
            start_points,
            categories,
        },
    }
}

/// Resolve the point value for one attendance record.
///
/// Exact activity-type key first; when that yields zero, fall back to the
/// legacy description fragment for the two original types, and to the type
/// string itself for everything newer.
fn attendance_points(rules: &[Rule], activity_type: &str) -> i64 {
    let by_type = points_for_activity_type(rules, activity_type);
    if by_type != 0 {
        return by_type;
    }
    let pattern = match activity_type {
        "embaixada" => "embaixada",
        "igreja" => "compromissos",
        other => other,
    };
    points_for_pattern(rules, pattern)
}

fn non_zero_or(points: i64, fallback: i64) -> i64 {
    if points != 0 {
        points
    } else {
        fallback
    }
}
