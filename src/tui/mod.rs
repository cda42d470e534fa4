pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, ThemeColors};

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use crate::data::fetch::{load_snapshot, Snapshot};
use app::{InputMode, Tab};

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let mut events = EventHandler::new(250); // 250ms tick

    let mut pending_fetch: Option<tokio::task::JoinHandle<anyhow::Result<Snapshot>>> = None;

    // Main loop
    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
            }
        }

        // Check if a background refresh has completed
        if let Some(handle) = &mut pending_fetch {
            if handle.is_finished() {
                let handle = pending_fetch.take().unwrap();
                match handle.await {
                    Ok(Ok(snapshot)) => app.update_snapshot(snapshot),
                    Ok(Err(e)) => app.show_flash(format!("Failed to refresh: {}", e)),
                    Err(e) => app.show_flash(format!("Refresh task panicked: {}", e)),
                }
                app.is_loading = false;
            }
        }

        // Spawn a refresh if requested and none is pending
        if app.needs_refresh && pending_fetch.is_none() {
            app.needs_refresh = false;
            let config = app.config.clone();
            let cache_config = app.cache_config.clone();

            pending_fetch = Some(tokio::spawn(async move {
                // verbose stays off here: stderr would corrupt the display
                tokio::time::timeout(
                    Duration::from_secs(20),
                    load_snapshot(&config, &cache_config, false),
                )
                .await
                .map_err(|_| anyhow::anyhow!("Refresh timed out (20s)"))?
            }));
            app.is_loading = true;
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    ratatui::restore();

    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Search => match key.code {
            KeyCode::Enter => app.confirm_search(),
            KeyCode::Esc => app.cancel_search(),
            KeyCode::Backspace => {
                app.search_input.pop();
            }
            KeyCode::Char(c) if !c.is_control() => app.search_input.push(c),
            // Ignore all other keys (don't propagate to Normal mode)
            _ => {}
        },
        InputMode::Breakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') => app.dismiss_breakdown(),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
        InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    // Keys shared by every tab
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab => {
            app.next_tab();
            return;
        }
        KeyCode::BackTab => {
            app.previous_tab();
            return;
        }
        KeyCode::Char(c @ '1'..='9') => {
            app.select_tab(c as usize - '1' as usize);
            return;
        }
        KeyCode::Char('/') => {
            app.start_search();
            return;
        }
        KeyCode::Esc => {
            if !app.search_input.is_empty() {
                app.cancel_search();
            }
            return;
        }
        KeyCode::Char('v') => {
            app.cycle_version();
            return;
        }
        KeyCode::Char('o') => {
            match crate::browser::open_site(&app.config) {
                Ok(url) => app.show_flash(format!("Abrindo {}", url)),
                Err(e) => app.show_flash(format!("Failed to open browser: {}", e)),
            }
            return;
        }
        KeyCode::Char('r') => {
            app.needs_refresh = true;
            app.show_flash("Atualizando...".to_string());
            return;
        }
        KeyCode::Char('?') => {
            app.show_help();
            return;
        }
        _ => {}
    }

    // Tab-specific navigation
    match app.current_tab() {
        Tab::Ranking => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            KeyCode::Char('b') | KeyCode::Enter => app.show_breakdown(),
            _ => {}
        },
        Tab::Presenca => match key.code {
            KeyCode::Char('h') | KeyCode::Left => app.move_selected_day(-1),
            KeyCode::Char('l') | KeyCode::Right => app.move_selected_day(1),
            KeyCode::Char('j') | KeyCode::Down => app.move_selected_day(7),
            KeyCode::Char('k') | KeyCode::Up => app.move_selected_day(-7),
            KeyCode::Char('n') => app.move_month(1),
            KeyCode::Char('p') => app.move_month(-1),
            _ => {}
        },
        Tab::Jogos => match key.code {
            KeyCode::Char('p') => app.toggle_games_view(),
            KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
            _ => {}
        },
        Tab::Bonus | Tab::Visitantes | Tab::Regras => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
            _ => {}
        },
    }
}
