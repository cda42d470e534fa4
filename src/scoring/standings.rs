use super::engine::{calculate_score, ScoreResult};
use crate::data::types::{BonusData, GamesData, Participant, Rule, VersesData};

/// A participant with their computed score, ready for display.
pub struct Standing<'a> {
    pub participant: &'a Participant,
    pub result: ScoreResult,
}

/// Score every participant and sort by total descending, name ascending on
/// ties. The legacy raw `points` field is never consulted; the computed
/// score supersedes it.
pub fn rank_participants<'a>(
    participants: &'a [Participant],
    rules: &[Rule],
    verses_data: Option<&VersesData>,
    selected_version: &str,
    games_data: Option<&GamesData>,
    bonus_data: Option<&BonusData>,
) -> Vec<Standing<'a>> {
    let mut standings: Vec<Standing> = participants
        .iter()
        .map(|participant| Standing {
            participant,
            result: calculate_score(
                participant,
                rules,
                verses_data,
                selected_version,
                games_data,
                bonus_data,
            ),
        })
        .collect();

    standings.sort_by(|a, b| {
        b.result
            .total
            .cmp(&a.result.total)
            .then_with(|| a.participant.name.cmp(&b.participant.name))
    });

    standings
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_sorted_by_total_descending() {
        let participants = vec![
            participant(1, "Ana", 50),
            participant(2, "Bruno", 120),
            participant(3, "Caio", 80),
        ];
        let standings = rank_participants(&participants, &[], None, "NVI", None, None);
        let names: Vec<&str> = standings.iter().map(|s| s.participant.name.as_str()).collect();
        assert_eq!(names, ["Bruno", "Caio", "Ana"]);
    }

    #[test]
    fn test_ties_broken_by_name() {
        let participants = vec![
            participant(1, "Caio", 100),
            participant(2, "Ana", 100),
            participant(3, "Bruno", 100),
        ];
        let standings = rank_participants(&participants, &[], None, "NVI", None, None);
        let names: Vec<&str> = standings.iter().map(|s| s.participant.name.as_str()).collect();
        assert_eq!(names, ["Ana", "Bruno", "Caio"]);
    }

    #[test]
    fn test_legacy_points_do_not_affect_order() {
        let mut low = participant(1, "Ana", 10);
        low.points = Some(1000);
        let high = participant(2, "Bruno", 20);

        let roster = [low, high];
        let standings = rank_participants(&roster, &[], None, "NVI", None, None);
        assert_eq!(standings[0].participant.name, "Bruno");
        assert_eq!(standings[0].result.total, 20);
        assert_eq!(standings[1].result.total, 10);
    }
}
