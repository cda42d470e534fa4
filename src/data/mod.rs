pub mod cache;
pub mod dates;
pub mod fetch;
pub mod participants;
pub mod types;

pub use cache::{CacheConfig, DocumentCache};
pub use fetch::{load_snapshot, Snapshot};
pub use participants::{game_summaries, participant_name, GameSummary};
pub use types::{
    AttendanceRecord, BonusChallenge, BonusData, BonusResult, CandidatoProgress, DisciplineRecord,
    Game, GameResult, GameRule, GamesData, LeaderboardData, Participant, Rule, VerseInfo,
    VersesData,
};
