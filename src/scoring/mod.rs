pub mod engine;
pub mod rules;
pub mod standings;
pub mod verses;

pub use engine::{calculate_score, CategoryContribution, ScoreBreakdown, ScoreResult};
pub use rules::{points_for_activity_type, points_for_pattern};
pub use standings::{rank_participants, Standing};
pub use verses::expand_verse_range;
