use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// A configured point rule.
///
/// Older rule sets key rules only by their description text; newer ones add
/// an explicit `activityType`. The resolver in `scoring::rules` supports
/// both without requiring a data migration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: u32,
    pub description: String,
    pub points: i64,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub activity_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: u32,
    pub name: String,
    /// Frozen score imported from before the tracking system existed.
    /// Treated as an opaque offset, never recomputed from records.
    #[serde(default)]
    pub start_points: Option<i64>,
    /// Raw total kept by pre-scoring snapshots. Accepted on deserialization
    /// for compatibility but never read by the engine.
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub memorized_verses: Option<Vec<String>>,
    #[serde(default)]
    pub visitors: Option<Vec<String>>,
    #[serde(default)]
    pub attendance: Option<Vec<AttendanceRecord>>,
    #[serde(default)]
    pub candidato_progress: Option<CandidatoProgress>,
    #[serde(default)]
    pub disciplines: Option<Vec<DisciplineRecord>>,
}

impl Participant {
    pub fn attendance_records(&self) -> &[AttendanceRecord] {
        self.attendance.as_deref().unwrap_or_default()
    }

    pub fn discipline_records(&self) -> &[DisciplineRecord] {
        self.disciplines.as_deref().unwrap_or_default()
    }

    pub fn memorized_verse_refs(&self) -> &[String] {
        self.memorized_verses.as_deref().unwrap_or_default()
    }

    pub fn visitor_names(&self) -> &[String] {
        self.visitors.as_deref().unwrap_or_default()
    }

    pub fn visitor_count(&self) -> usize {
        self.visitor_names().len()
    }
}

/// One attended activity on one calendar day. The type is an open
/// vocabulary: new types may appear in the data without code changes.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub activity_type: String,
}

/// Candidate-track progress (Royal Ambassadors). The task count is
/// conceptually bounded 0..10 but not enforced here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatoProgress {
    pub prerequisites: bool,
    #[serde(default)]
    pub manual_tasks: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisciplineRecord {
    pub date: NaiveDate,
    /// Signed delta applied verbatim to the total. Expected negative.
    pub points: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Root of leaderboard.json: the season snapshot everything else keys into.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardData {
    pub season: String,
    pub updated_at: DateTime<Utc>,
    pub rules: Vec<Rule>,
    pub participants: Vec<Participant>,
}

/// Word-count metadata per verse reference, keyed by normalized reference
/// string and then by translation version code.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersesData {
    pub default_version: String,
    pub verses: HashMap<String, HashMap<String, VerseInfo>>,
}

impl VersesData {
    /// Word count of a single-verse reference in the given translation, if
    /// the metadata carries it.
    pub fn word_count(&self, reference: &str, version: &str) -> Option<u32> {
        self.verses
            .get(reference)?
            .get(version)
            .map(|info| info.word_count)
    }

    /// Version codes present anywhere in the metadata, sorted, with the
    /// default version first. Used to cycle translations in the UI.
    pub fn available_versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = self
            .verses
            .values()
            .flat_map(|by_version| by_version.keys().cloned())
            .collect();
        versions.sort();
        versions.dedup();
        if let Some(pos) = versions.iter().position(|v| *v == self.default_version) {
            versions.rotate_left(pos);
        }
        versions
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseInfo {
    pub word_count: u32,
    #[serde(default)]
    pub text: Option<String>,
}

/// Root of games.json.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamesData {
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub default_rules: Vec<GameRule>,
    pub games: Vec<Game>,
}

impl GamesData {
    /// Sum of every result across every game where the participant appears.
    /// A participant may appear zero, one, or many times; every occurrence
    /// counts.
    pub fn points_for(&self, participant_id: u32) -> i64 {
        self.games
            .iter()
            .flat_map(|game| &game.results)
            .filter(|result| result.participant_id == participant_id)
            .map(|result| result.points)
            .sum()
    }

    pub fn total_points_distributed(&self) -> i64 {
        self.games
            .iter()
            .flat_map(|game| &game.results)
            .map(|result| result.points)
            .sum()
    }
}

/// A named, dated mini-game with ranked per-participant outcomes.
#[derive(Debug, Clone, Deserialize)]
pub struct Game {
    pub id: u32,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub rules: Option<Vec<GameRule>>,
    pub results: Vec<GameResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameRule {
    pub position: u32,
    pub label: String,
    pub points: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub participant_id: u32,
    pub position: u32,
    pub points: i64,
}

/// Root of bonus.json. Bonus challenges share the games shape minus the
/// rank position.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusData {
    pub updated_at: DateTime<Utc>,
    pub challenges: Vec<BonusChallenge>,
}

impl BonusData {
    /// Same summation semantics as `GamesData::points_for`.
    pub fn points_for(&self, participant_id: u32) -> i64 {
        self.challenges
            .iter()
            .flat_map(|challenge| &challenge.results)
            .filter(|result| result.participant_id == participant_id)
            .map(|result| result.points)
            .sum()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BonusChallenge {
    pub id: u32,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    pub results: Vec<BonusResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusResult {
    pub participant_id: u32,
    pub points: i64,
}
