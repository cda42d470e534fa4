use std::collections::BTreeMap;

use super::types::{Game, GameResult, GamesData, Participant};

/// Display name for a participant id, with a numbered placeholder when the
/// id is unknown to the snapshot.
pub fn participant_name(participants: &[Participant], participant_id: u32) -> String {
    participants
        .iter()
        .find(|p| p.id == participant_id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| format!("Participante #{}", participant_id))
}

/// One participant's aggregate across all games, for the by-participant
/// games view.
pub struct GameSummary<'a> {
    pub participant_id: u32,
    pub total_points: i64,
    pub games_played: usize,
    /// Most recent game first.
    pub history: Vec<(&'a Game, &'a GameResult)>,
}

/// Per-participant game totals, sorted by points descending.
pub fn game_summaries(games_data: &GamesData) -> Vec<GameSummary<'_>> {
    let mut by_participant: BTreeMap<u32, GameSummary> = BTreeMap::new();

    for game in &games_data.games {
        for result in &game.results {
            let summary = by_participant
                .entry(result.participant_id)
                .or_insert_with(|| GameSummary {
                    participant_id: result.participant_id,
                    total_points: 0,
                    games_played: 0,
                    history: Vec::new(),
                });
            summary.total_points += result.points;
            summary.games_played += 1;
            summary.history.push((game, result));
        }
    }

    let mut summaries: Vec<GameSummary> = by_participant.into_values().collect();
    for summary in &mut summaries {
        summary.history.sort_by(|a, b| b.0.date.cmp(&a.0.date));
    }
    summaries.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(id: u32, name: &str) -> Participant {
        Participant {
            id,
            name: name.to_string(),
            start_points: None,
            points: None,
            memorized_verses: None,
            visitors: None,
            attendance: None,
            candidato_progress: None,
            disciplines: None,
        }
    }

    fn sample_games() -> GamesData {
        serde_json::from_str(
            r#"{
                "updatedAt": "2026-02-01T12:00:00Z",
                "defaultRules": [],
                "games": [
                    {"id": 1, "name": "Corrida", "date": "2026-01-25",
                     "results": [{"participantId": 1, "position": 1, "points": 30},
                                 {"participantId": 2, "position": 2, "points": 20}]},
                    {"id": 2, "name": "Quiz", "date": "2026-02-01",
                     "results": [{"participantId": 2, "position": 1, "points": 30}]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_participant_name_lookup() {
        let participants = vec![participant(1, "Ana"), participant(2, "Bruno")];
        assert_eq!(participant_name(&participants, 2), "Bruno");
        assert_eq!(participant_name(&participants, 42), "Participante #42");
        assert_eq!(participant_name(&[], 1), "Participante #1");
    }

    #[test]
    fn test_game_summaries_sorted_by_points() {
        let games = sample_games();
        let summaries = game_summaries(&games);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].participant_id, 2);
        assert_eq!(summaries[0].total_points, 50);
        assert_eq!(summaries[0].games_played, 2);
        assert_eq!(summaries[1].participant_id, 1);
        assert_eq!(summaries[1].total_points, 30);
    }

    #[test]
    fn test_game_summary_history_most_recent_first() {
        let games = sample_games();
        let summaries = game_summaries(&games);
        let bruno = &summaries[0];
        assert_eq!(bruno.history[0].0.name, "Quiz");
        assert_eq!(bruno.history[1].0.name, "Corrida");
    }

    #[test]
    fn test_empty_games_yield_no_summaries() {
        let games: GamesData = serde_json::from_str(
            r#"{"updatedAt": "2026-02-01T12:00:00Z", "defaultRules": [], "games": []}"#,
        )
        .unwrap();
        assert!(game_summaries(&games).is_empty());
    }
}
