pub mod formatter;

pub use formatter::{
    format_points, format_standing_detail, format_standings_table, should_use_colors,
};
