use chrono::{Datelike, NaiveDate};
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::data::cache::CacheConfig;
use crate::data::fetch::Snapshot;
use crate::prefs::{save_prefs, Prefs};
use crate::scoring::{rank_participants, Standing};
use crate::tui::theme::ThemeColors;

pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Ranking,
    Jogos,
    Bonus,
    Visitantes,
    Presenca,
    Regras,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Ranking => "Ranking",
            Tab::Jogos => "Jogos",
            Tab::Bonus => "Bônus",
            Tab::Visitantes => "Visitantes",
            Tab::Presenca => "Presença",
            Tab::Regras => "Regras",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Search,
    Breakdown,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamesView {
    ByEvent,
    ByParticipant,
}

pub struct App {
    pub config: Config,
    pub cache_config: CacheConfig,
    pub snapshot: Snapshot,
    pub prefs: Prefs,
    pub prefs_path: PathBuf,
    pub theme: ThemeColors,

    pub tabs: Vec<Tab>,
    pub current_tab: usize,
    pub table_state: ratatui::widgets::TableState,
    pub games_view: GamesView,
    pub list_scroll: u16,

    pub input_mode: InputMode,
    pub search_input: String,
    pub flash_message: Option<(String, Instant)>,

    pub selected_date: NaiveDate,
    pub calendar_month: (i32, u32),

    pub should_quit: bool,
    pub needs_refresh: bool,
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub last_refresh: Instant,
    pub verbose: bool,
}

impl App {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        cache_config: CacheConfig,
        snapshot: Snapshot,
        prefs: Prefs,
        prefs_path: PathBuf,
        theme: ThemeColors,
        today: NaiveDate,
        verbose: bool,
    ) -> Self {
        let tabs = build_tabs(&config);

        // Start the calendar on the most recent attendance, falling back
        // to the current month.
        let selected_date = crate::attendance::all_attendance_dates(&snapshot.leaderboard.participants)
            .into_iter()
            .next_back()
            .unwrap_or(today);

        let mut table_state = ratatui::widgets::TableState::default();
        if !snapshot.leaderboard.participants.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            config,
            cache_config,
            snapshot,
            prefs,
            prefs_path,
            theme,
            tabs,
            current_tab: 0,
            table_state,
            games_view: GamesView::ByEvent,
            list_scroll: 0,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            flash_message: None,
            calendar_month: (selected_date.year(), selected_date.month()),
            selected_date,
            should_quit: false,
            needs_refresh: false,
            is_loading: false,
            spinner_frame: 0,
            last_refresh: Instant::now(),
            verbose,
        }
    }

    pub fn current_tab(&self) -> Tab {
        self.tabs[self.current_tab]
    }

    pub fn next_tab(&mut self) {
        self.current_tab = (self.current_tab + 1) % self.tabs.len();
        self.list_scroll = 0;
    }

    pub fn previous_tab(&mut self) {
        self.current_tab = if self.current_tab == 0 {
            self.tabs.len() - 1
        } else {
            self.current_tab - 1
        };
        self.list_scroll = 0;
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < self.tabs.len() {
            self.current_tab = index;
            self.list_scroll = 0;
        }
    }

    /// Standings recomputed from the current snapshot. Scores are derived
    /// data: every render recomputes them rather than caching a copy that
    /// could drift from the inputs.
    pub fn standings(&self) -> Vec<Standing<'_>> {
        let standings = rank_participants(
            &self.snapshot.leaderboard.participants,
            &self.snapshot.leaderboard.rules,
            self.snapshot.verses.as_ref(),
            self.selected_version(),
            self.snapshot.games.as_ref(),
            self.snapshot.bonus.as_ref(),
        );

        if self.search_input.is_empty() {
            return standings;
        }
        let needle = self.search_input.to_lowercase();
        standings
            .into_iter()
            .filter(|standing| standing.participant.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Translation version used for verse word counts: the saved
    /// preference, or the document default.
    pub fn selected_version(&self) -> &str {
        let default = self
            .snapshot
            .verses
            .as_ref()
            .map(|verses| verses.default_version.as_str())
            .unwrap_or("NVI");
        self.prefs.effective_version(default)
    }

    /// Switch to the next available translation and persist the choice.
    pub fn cycle_version(&mut self) {
        let Some(verses) = self.snapshot.verses.as_ref() else {
            self.show_flash("Sem dados de versículos carregados".to_string());
            return;
        };
        let versions = verses.available_versions();
        if versions.len() < 2 {
            return;
        }

        let current = self.selected_version().to_string();
        let next_index = versions
            .iter()
            .position(|v| *v == current)
            .map(|i| (i + 1) % versions.len())
            .unwrap_or(0);
        let next = versions[next_index].clone();

        self.prefs.bible_version = Some(next.clone());
        if let Err(e) = save_prefs(&self.prefs_path, &self.prefs) {
            self.show_flash(format!("Failed to save preferences: {}", e));
        } else {
            self.show_flash(format!("Versão: {}", next));
        }
    }

    pub fn next_row(&mut self) {
        let len = self.standings().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.standings().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn scroll_down(&mut self) {
        self.list_scroll = self.list_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.list_scroll = self.list_scroll.saturating_sub(1);
    }

    pub fn toggle_games_view(&mut self) {
        self.games_view = match self.games_view {
            GamesView::ByEvent => GamesView::ByParticipant,
            GamesView::ByParticipant => GamesView::ByEvent,
        };
        self.list_scroll = 0;
    }

    /// Move the calendar selection by whole days, following across month
    /// boundaries.
    pub fn move_selected_day(&mut self, days: i64) {
        if let Some(date) = self
            .selected_date
            .checked_add_signed(chrono::Duration::days(days))
        {
            self.selected_date = date;
            self.calendar_month = (date.year(), date.month());
        }
    }

    /// Move the calendar a whole month, keeping the day number where the
    /// target month allows it.
    pub fn move_month(&mut self, delta: i32) {
        let (year, month) = self.calendar_month;
        let zero_based = year * 12 + month as i32 - 1 + delta;
        let new_year = zero_based.div_euclid(12);
        let new_month = (zero_based.rem_euclid(12) + 1) as u32;

        let day = self
            .selected_date
            .day()
            .min(days_in_month(new_year, new_month));
        if let Some(date) = NaiveDate::from_ymd_opt(new_year, new_month, day) {
            self.selected_date = date;
            self.calendar_month = (new_year, new_month);
        }
    }

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn confirm_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.table_state.select(if self.standings().is_empty() {
            None
        } else {
            Some(0)
        });
    }

    pub fn cancel_search(&mut self) {
        self.search_input.clear();
        self.confirm_search();
    }

    pub fn show_breakdown(&mut self) {
        if self.table_state.selected().is_some() {
            self.input_mode = InputMode::Breakdown;
        }
    }

    pub fn dismiss_breakdown(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    /// Swap in a freshly loaded snapshot, surfacing its warnings.
    pub fn update_snapshot(&mut self, snapshot: Snapshot) {
        let warning_count = snapshot.warnings.len();
        self.snapshot = snapshot;
        self.last_refresh = Instant::now();

        let len = self.standings().len();
        match self.table_state.selected() {
            Some(i) if i >= len && len > 0 => self.table_state.select(Some(len - 1)),
            None if len > 0 => self.table_state.select(Some(0)),
            _ if len == 0 => self.table_state.select(None),
            _ => {}
        }

        if warning_count > 0 {
            let warnings = self.snapshot.warnings.join("; ");
            self.show_flash(format!("Atualizado com avisos: {}", warnings));
        } else {
            self.show_flash("Atualizado".to_string());
        }
    }
}

fn build_tabs(config: &Config) -> Vec<Tab> {
    let mut tabs = vec![Tab::Ranking];
    if config.features.games {
        tabs.push(Tab::Jogos);
        tabs.push(Tab::Bonus);
    }
    if config.features.visitor_tracking {
        tabs.push(Tab::Visitantes);
    }
    if config.features.attendance_calendar {
        tabs.push(Tab::Presenca);
    }
    tabs.push(Tab::Regras);
    tabs
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt()).map(|d| d.day()).unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fetch::Snapshot;
    use crate::data::types::{LeaderboardData, Participant};

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

    fn sample_app() -> App {
        let config: Config = serde_saphyr::from_str(
            "app:\n  name: Embaixada\ndata:\n  base_url: \"https://example.org/data\"\n",
        )
        .unwrap();
        let leaderboard = LeaderboardData {
            season: "2026.1".to_string(),
            updated_at: "2026-02-01T12:00:00Z".parse().unwrap(),
            rules: vec![],
            participants: vec![
                participant(1, "Ana", 50),
                participant(2, "Bruno", 120),
                participant(3, "Caio", 80),
            ],
        };
        let snapshot = Snapshot {
            leaderboard,
            verses: None,
            games: None,
            bonus: None,
            warnings: vec![],
        };
        App::new(
            config,
            CacheConfig {
                enabled: true,
                max_age: std::time::Duration::from_secs(3600),
            },
            snapshot,
            Prefs::new(),
            std::env::temp_dir().join("placar_test_app_prefs.json"),
            ThemeColors::dark(),
            "2026-02-05".parse().unwrap(),
            false,
        )
    }

    #[test]
    fn test_tabs_built_from_features() {
        let app = sample_app();
        assert_eq!(app.tabs[0], Tab::Ranking);
        assert!(app.tabs.contains(&Tab::Jogos));
        assert!(app.tabs.contains(&Tab::Presenca));
        assert_eq!(*app.tabs.last().unwrap(), Tab::Regras);
    }

    #[test]
    fn test_tab_cycling_wraps() {
        let mut app = sample_app();
        let count = app.tabs.len();
        for _ in 0..count {
            app.next_tab();
        }
        assert_eq!(app.current_tab, 0);
        app.previous_tab();
        assert_eq!(app.current_tab, count - 1);
    }

    #[test]
    fn test_row_navigation_wraps() {
        let mut app = sample_app();
        assert_eq!(app.table_state.selected(), Some(0));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(1));
        app.next_row();
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(2));
    }

    #[test]
    fn test_standings_sorted_and_filtered() {
        let mut app = sample_app();
        let standings = app.standings();
        assert_eq!(standings[0].participant.name, "Bruno");

        app.search_input = "an".to_string();
        let filtered = app.standings();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].participant.name, "Ana");

        app.cancel_search();
        assert_eq!(app.standings().len(), 3);
    }

    #[test]
    fn test_search_confirm_resets_selection() {
        let mut app = sample_app();
        app.next_row();
        app.search_input = "zzz".to_string();
        app.confirm_search();
        assert_eq!(app.table_state.selected(), None);
    }

    #[test]
    fn test_calendar_day_moves_across_months() {
        let mut app = sample_app();
        app.selected_date = "2026-01-31".parse().unwrap();
        app.calendar_month = (2026, 1);
        app.move_selected_day(1);
        assert_eq!(app.selected_date, "2026-02-01".parse().unwrap());
        assert_eq!(app.calendar_month, (2026, 2));
    }

    #[test]
    fn test_calendar_month_moves_clamp_day() {
        let mut app = sample_app();
        app.selected_date = "2026-01-31".parse().unwrap();
        app.calendar_month = (2026, 1);
        app.move_month(1);
        // February 2026 has 28 days.
        assert_eq!(app.selected_date, "2026-02-28".parse().unwrap());

        app.move_month(-2);
        assert_eq!(app.calendar_month, (2025, 12));
    }

    #[test]
    fn test_games_view_toggle() {
        let mut app = sample_app();
        assert_eq!(app.games_view, GamesView::ByEvent);
        app.toggle_games_view();
        assert_eq!(app.games_view, GamesView::ByParticipant);
        app.toggle_games_view();
        assert_eq!(app.games_view, GamesView::ByEvent);
    }

    #[test]
    fn test_selected_version_defaults_without_verses() {
        let app = sample_app();
        assert_eq!(app.selected_version(), "NVI");
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2026, 2), 28);
        assert_eq!(days_in_month(2028, 2), 29);
        assert_eq!(days_in_month(2026, 12), 31);
    }
}
