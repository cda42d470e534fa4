use chrono::Datelike;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};

use crate::attendance;
use crate::data::dates::{format_date_pt, format_date_short, format_month_year_pt};
use crate::data::participants::{game_summaries, participant_name};
use crate::tui::app::{App, GamesView, InputMode, Tab, SPINNER_FRAMES};

const WEEKDAY_HEADER: [&str; 7] = ["Seg", "Ter", "Qua", "Qui", "Sex", "Sáb", "Dom"];

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 8 || area.width < 40 {
        let msg = Paragraph::new("Terminal muito pequeno").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.current_tab() {
        Tab::Ranking => render_ranking(frame, chunks[2], app),
        Tab::Jogos => render_games(frame, chunks[2], app),
        Tab::Bonus => render_bonus(frame, chunks[2], app),
        Tab::Visitantes => render_visitors(frame, chunks[2], app),
        Tab::Presenca => render_attendance(frame, chunks[2], app),
        Tab::Regras => render_rules(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    match app.input_mode {
        InputMode::Search => render_search_popup(frame, app),
        InputMode::Breakdown => render_breakdown_popup(frame, app),
        InputMode::Help => render_help_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let name = &app.config.app.name;
    let season = format!(
        "  {} {}",
        app.config.terminology.season, app.snapshot.leaderboard.season
    );

    let updated = format!(
        "atualizado {}",
        format_date_short(app.snapshot.leaderboard.updated_at.date_naive())
    );
    let left_len = name.chars().count() + season.chars().count();
    let padding = (area.width as usize).saturating_sub(left_len + updated.chars().count());

    let line = Line::from(vec![
        Span::styled(name.clone(), app.theme.title_style),
        Span::styled(season, Style::default().fg(app.theme.muted)),
        Span::raw(" ".repeat(padding)),
        Span::styled(updated, Style::default().fg(app.theme.muted)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<String> = app
        .tabs
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.title()))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_tab)
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style)
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_ranking(frame: &mut Frame, area: Rect, app: &mut App) {
    let standings = app.standings();

    if standings.is_empty() {
        let msg = if app.search_input.is_empty() {
            "Nenhum participante ainda".to_string()
        } else {
            format!("Nenhum resultado para \"{}\"", app.search_input)
        };
        frame.render_widget(Paragraph::new(msg).alignment(Alignment::Center), area);
        return;
    }

    let rows: Vec<Row> = standings
        .iter()
        .enumerate()
        .map(|(idx, standing)| {
            let position = idx + 1;
            let rank_style = match app.theme.medal_color(position) {
                Some(color) => Style::default().fg(color).bold(),
                None => Style::default().fg(app.theme.rank_color),
            };

            let row_style = if idx % 2 == 1 {
                Style::default().bg(app.theme.row_alt_bg)
            } else {
                Style::default()
            };

            let participant = standing.participant;
            Row::new(vec![
                Cell::from(format!("{:>2}.", position)).style(rank_style),
                Cell::from(format!("{:>6}", standing.result.total))
                    .style(Style::default().fg(app.theme.accent).bold()),
                Cell::from(participant.name.clone()),
                Cell::from(format!("{:>4}", attendance::total_attendance_count(participant))),
                Cell::from(format!("{:>4}", participant.memorized_verse_refs().len())),
                Cell::from(format!("{:>4}", participant.visitor_count())),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
    ];

    let header_titles = vec![
        "#".to_string(),
        "Pontos".to_string(),
        app.config.terminology.participant.clone(),
        "Pres".to_string(),
        "Vers".to_string(),
        "Vis".to_string(),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(header_titles).style(app.theme.header_style).bottom_margin(1))
        .row_highlight_style(app.theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_games(frame: &mut Frame, area: Rect, app: &App) {
    let Some(games_data) = app.snapshot.games.as_ref() else {
        frame.render_widget(
            Paragraph::new("Nenhum jogo ainda").alignment(Alignment::Center),
            area,
        );
        return;
    };

    let participants = &app.snapshot.leaderboard.participants;
    let needle = app.search_input.to_lowercase();
    let mut lines: Vec<Line> = Vec::new();

    match app.games_view {
        GamesView::ByEvent => {
            // Most recent first, filtered by game or participant name.
            let mut games: Vec<_> = games_data
                .games
                .iter()
                .filter(|game| {
                    needle.is_empty()
                        || game.name.to_lowercase().contains(&needle)
                        || game.results.iter().any(|r| {
                            participant_name(participants, r.participant_id)
                                .to_lowercase()
                                .contains(&needle)
                        })
                })
                .collect();
            games.sort_by(|a, b| b.date.cmp(&a.date));

            let total_points = games_data.total_points_distributed();
            lines.push(Line::from(Span::styled(
                format!(
                    "{} jogos realizados | {} pontos distribuídos",
                    games_data.games.len(),
                    total_points
                ),
                Style::default().fg(app.theme.muted),
            )));
            lines.push(Line::raw(""));

            for game in games {
                lines.push(game_header_line(app, &game.name, game.date, game.description.as_deref()));
                let mut results = game.results.clone();
                results.sort_by_key(|result| result.position);
                for result in &results {
                    lines.push(result_line(
                        app,
                        result.position as usize,
                        &participant_name(participants, result.participant_id),
                        result.points,
                    ));
                }
                lines.push(Line::raw(""));
            }
        }
        GamesView::ByParticipant => {
            lines.push(Line::from(Span::styled(
                "Por participante (p alterna a visão)",
                Style::default().fg(app.theme.muted),
            )));
            lines.push(Line::raw(""));

            for summary in game_summaries(games_data) {
                let name = participant_name(participants, summary.participant_id);
                if !needle.is_empty() && !name.to_lowercase().contains(&needle) {
                    continue;
                }
                lines.push(Line::from(vec![
                    Span::styled(name, Style::default().bold()),
                    Span::styled(
                        format!(
                            "  {} jogos | +{} pts",
                            summary.games_played, summary.total_points
                        ),
                        Style::default().fg(app.theme.accent),
                    ),
                ]));
                for (game, result) in &summary.history {
                    lines.push(result_line(
                        app,
                        result.position as usize,
                        &format!("{} ({})", game.name, format_date_short(game.date)),
                        result.points,
                    ));
                }
                lines.push(Line::raw(""));
            }
        }
    }

    if lines.is_empty() {
        frame.render_widget(
            Paragraph::new("Nenhum resultado encontrado").alignment(Alignment::Center),
            area,
        );
        return;
    }

    let paragraph = Paragraph::new(lines).scroll((app.list_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_bonus(frame: &mut Frame, area: Rect, app: &App) {
    let Some(bonus_data) = app.snapshot.bonus.as_ref() else {
        frame.render_widget(
            Paragraph::new("Nenhum desafio bônus ainda").alignment(Alignment::Center),
            area,
        );
        return;
    };

    let participants = &app.snapshot.leaderboard.participants;
    let needle = app.search_input.to_lowercase();
    let mut lines: Vec<Line> = Vec::new();

    let mut challenges: Vec<_> = bonus_data
        .challenges
        .iter()
        .filter(|challenge| {
            needle.is_empty()
                || challenge.name.to_lowercase().contains(&needle)
                || challenge.results.iter().any(|r| {
                    participant_name(participants, r.participant_id)
                        .to_lowercase()
                        .contains(&needle)
                })
        })
        .collect();
    challenges.sort_by(|a, b| b.date.cmp(&a.date));

    for challenge in challenges {
        lines.push(game_header_line(
            app,
            &challenge.name,
            challenge.date,
            challenge.description.as_deref(),
        ));
        for result in &challenge.results {
            lines.push(result_line(
                app,
                0,
                &participant_name(participants, result.participant_id),
                result.points,
            ));
        }
        lines.push(Line::raw(""));
    }

    if lines.is_empty() {
        frame.render_widget(
            Paragraph::new("Nenhum resultado encontrado").alignment(Alignment::Center),
            area,
        );
        return;
    }

    let paragraph = Paragraph::new(lines).scroll((app.list_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_visitors(frame: &mut Frame, area: Rect, app: &App) {
    let needle = app.search_input.to_lowercase();
    let mut lines: Vec<Line> = Vec::new();

    let mut total = 0usize;
    for participant in &app.snapshot.leaderboard.participants {
        let visitors = participant.visitor_names();
        total += visitors.len();
        if visitors.is_empty() {
            continue;
        }
        if !needle.is_empty() && !participant.name.to_lowercase().contains(&needle) {
            continue;
        }

        lines.push(Line::from(vec![
            Span::styled(participant.name.clone(), Style::default().bold()),
            Span::styled(
                format!("  ({})", visitors.len()),
                Style::default().fg(app.theme.muted),
            ),
        ]));
        for visitor in visitors {
            lines.push(Line::from(Span::raw(format!("    {}", visitor))));
        }
        lines.push(Line::raw(""));
    }

    if lines.is_empty() {
        frame.render_widget(
            Paragraph::new("Nenhum visitante registrado").alignment(Alignment::Center),
            area,
        );
        return;
    }

    lines.insert(
        0,
        Line::from(Span::styled(
            format!("{} visitantes no total", total),
            Style::default().fg(app.theme.muted),
        )),
    );
    lines.insert(1, Line::raw(""));

    let paragraph = Paragraph::new(lines).scroll((app.list_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_attendance(frame: &mut Frame, area: Rect, app: &App) {
    let chunks =
        Layout::horizontal([Constraint::Length(32), Constraint::Fill(1)]).split(area);

    render_calendar(frame, chunks[0], app);
    render_day_details(frame, chunks[1], app);
}

fn render_calendar(frame: &mut Frame, area: Rect, app: &App) {
    let participants = &app.snapshot.leaderboard.participants;
    let dates_by_type = attendance::dates_by_activity_type(participants);
    let (year, month) = app.calendar_month;

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        format!("  {}", format_month_year_pt(year, month)),
        app.theme.header_style,
    )));
    lines.push(Line::from(Span::styled(
        format!("  {}", WEEKDAY_HEADER.join(" ")),
        Style::default().fg(app.theme.muted),
    )));

    let first = match chrono::NaiveDate::from_ymd_opt(year, month, 1) {
        Some(date) => date,
        None => return,
    };
    let leading = first.weekday().num_days_from_monday() as usize;

    let mut spans: Vec<Span> = vec![Span::raw("  ")];
    spans.extend(std::iter::repeat_n(Span::raw("    "), leading));

    let mut day = Some(first);
    while let Some(date) = day {
        if date.month() != month {
            break;
        }

        // Marker color of the first configured type active on this day;
        // days with only unlisted types still get the muted marker.
        let marker = app
            .config
            .activity_types
            .iter()
            .enumerate()
            .find(|(_, activity_type)| {
                dates_by_type
                    .get(*activity_type)
                    .is_some_and(|dates| dates.contains(&date))
            })
            .map(|(index, _)| app.theme.activity_color(Some(index)))
            .or_else(|| {
                dates_by_type
                    .values()
                    .any(|dates| dates.contains(&date))
                    .then(|| app.theme.activity_color(None))
            });

        let mut style = match marker {
            Some(color) => Style::default().fg(color).bold(),
            None => Style::default().fg(app.theme.calendar_muted),
        };
        if date == app.selected_date {
            style = style.patch(app.theme.calendar_selected);
        }

        spans.push(Span::styled(format!("{:>3}", date.day()), style));
        spans.push(Span::raw(" "));

        if date.weekday().num_days_from_monday() == 6 {
            lines.push(Line::from(std::mem::take(&mut spans)));
            spans.push(Span::raw("  "));
        }
        day = date.succ_opt();
    }
    if spans.len() > 1 {
        lines.push(Line::from(spans));
    }

    // Legend: one marker per configured activity type.
    lines.push(Line::raw(""));
    for (index, activity_type) in app.config.activity_types.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                "  ● ",
                Style::default().fg(app.theme.activity_color(Some(index))),
            ),
            Span::raw(app.config.activity_label(activity_type)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_day_details(frame: &mut Frame, area: Rect, app: &App) {
    let participants = &app.snapshot.leaderboard.participants;
    let date = app.selected_date;
    let groups = attendance::grouped_by_type_on_date(participants, date);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        format_date_pt(date),
        app.theme.header_style,
    )));
    lines.push(Line::raw(""));

    if groups.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Nenhuma {} registrada", app.config.terminology.attendance.to_lowercase()),
            Style::default().fg(app.theme.muted),
        )));
    } else {
        for group in &groups {
            let type_index = app
                .config
                .activity_types
                .iter()
                .position(|t| t == group.activity_type);
            lines.push(Line::from(vec![
                Span::styled(
                    "● ",
                    Style::default().fg(app.theme.activity_color(type_index)),
                ),
                Span::styled(
                    app.config.activity_label(group.activity_type),
                    Style::default().bold(),
                ),
                Span::styled(
                    format!(" ({})", group.roster.len()),
                    Style::default().fg(app.theme.muted),
                ),
            ]));
            for participant in &group.roster {
                lines.push(Line::from(Span::raw(format!("  {}", participant.name))));
            }
            lines.push(Line::raw(""));
        }

        let occurrences = attendance::records_on_date(participants, date).len();
        lines.push(Line::from(vec![
            Span::styled(
                format!("Total: {} presenças", occurrences),
                Style::default().fg(app.theme.muted),
            ),
            Span::styled(
                format!("  +{} pontos", attendance::day_total_points(participants, date)),
                Style::default().fg(app.theme.accent).bold(),
            ),
        ]));
    }

    let block = Block::default().borders(Borders::LEFT);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_rules(frame: &mut Frame, area: Rect, app: &App) {
    let rules = &app.snapshot.leaderboard.rules;
    if rules.is_empty() {
        frame.render_widget(
            Paragraph::new("Nenhuma regra configurada").alignment(Alignment::Center),
            area,
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for rule in rules {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>5}  ", format!("{:+}", rule.points)),
                Style::default().fg(app.theme.accent).bold(),
            ),
            Span::raw(rule.description.clone()),
        ]));
        if let Some(ref explanation) = rule.explanation {
            lines.push(Line::from(Span::styled(
                format!("       {}", explanation),
                Style::default().fg(app.theme.muted),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).scroll((app.list_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let line = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.contains("avisos") {
            app.theme.flash_error
        } else {
            app.theme.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let mut spans = vec![Span::styled(
            " q sair | tab abas | / buscar | r atualizar | ? ajuda",
            Style::default().fg(app.theme.muted),
        )];
        if app.snapshot.verses.is_some() {
            spans.push(Span::styled(
                format!(" | versão {}", app.selected_version()),
                Style::default().fg(app.theme.status_key_color),
            ));
        }
        if app.is_loading {
            spans.push(Span::styled(
                format!("  {} carregando...", SPINNER_FRAMES[app.spinner_frame]),
                Style::default().fg(app.theme.accent),
            ));
        }
        Line::from(spans)
    };

    let paragraph =
        Paragraph::new(line).style(Style::default().bg(app.theme.status_bar_bg));
    frame.render_widget(paragraph, area);
}

fn render_search_popup(frame: &mut Frame, app: &App) {
    let area = centered_rect(frame.area(), 40, 3);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.popup_border))
        .title(Span::styled(" Buscar ", app.theme.popup_title));
    let input = Paragraph::new(format!("{}_", app.search_input))
        .block(block)
        .style(Style::default().bg(app.theme.popup_bg));
    frame.render_widget(input, area);
}

fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let standings = app.standings();
    let Some(standing) = app.table_state.selected().and_then(|i| standings.get(i)) else {
        return;
    };

    let breakdown = &standing.result.breakdown;
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(standing.participant.name.clone(), Style::default().bold()),
        Span::styled(
            format!("  {} pontos", standing.result.total),
            Style::default().fg(app.theme.accent).bold(),
        ),
    ]));
    lines.push(Line::raw(""));

    if breakdown.start_points != 0 {
        lines.push(Line::from(Span::raw(format!(
            "  Base        {:>6}",
            breakdown.start_points
        ))));
    }
    for category in &breakdown.categories {
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<11} {:>+6}", category.label, category.delta())),
            Span::styled(
                format!("  {}", category.detail),
                Style::default().fg(app.theme.muted),
            ),
        ]));
    }
    if breakdown.start_points == 0 && breakdown.categories.is_empty() {
        lines.push(Line::from(Span::styled(
            "  Nenhuma atividade registrada",
            Style::default().fg(app.theme.muted),
        )));
    }

    let height = (lines.len() + 2).min(16) as u16;
    let area = centered_rect(frame.area(), 52, height);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.popup_border))
        .title(Span::styled(" Pontuação ", app.theme.popup_title));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(app.theme.popup_bg));
    frame.render_widget(paragraph, area);
}

fn render_help_popup(frame: &mut Frame, app: &App) {
    let lines: Vec<Line> = [
        ("q", "sair"),
        ("tab / shift-tab", "alternar abas"),
        ("1-6", "ir direto para uma aba"),
        ("j/k", "navegar (semana no calendário)"),
        ("h/l", "dia anterior/seguinte no calendário"),
        ("n/p", "mês seguinte/anterior no calendário"),
        ("p", "jogos por participante (na aba Jogos)"),
        ("/", "buscar por nome"),
        ("b", "detalhar pontuação"),
        ("v", "trocar versão bíblica"),
        ("o", "abrir o site"),
        ("r", "atualizar dados"),
    ]
    .iter()
    .map(|(key, action)| {
        Line::from(vec![
            Span::styled(
                format!("  {:<16}", key),
                Style::default().fg(app.theme.status_key_color),
            ),
            Span::raw(*action),
        ])
    })
    .collect();

    let height = (lines.len() + 2) as u16;
    let area = centered_rect(frame.area(), 46, height);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.popup_border))
        .title(Span::styled(" Atalhos ", app.theme.popup_title));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(app.theme.popup_bg));
    frame.render_widget(paragraph, area);
}

fn game_header_line<'a>(
    app: &App,
    name: &str,
    date: chrono::NaiveDate,
    description: Option<&str>,
) -> Line<'a> {
    let mut spans = vec![
        Span::styled(name.to_string(), Style::default().fg(app.theme.primary).bold()),
        Span::styled(
            format!("  {}", format_date_short(date)),
            Style::default().fg(app.theme.muted),
        ),
    ];
    if let Some(description) = description {
        spans.push(Span::styled(
            format!("  {}", description),
            Style::default().fg(app.theme.muted),
        ));
    }
    Line::from(spans)
}

/// One game/bonus result row. Position 0 means unranked (bonus results).
fn result_line<'a>(app: &App, position: usize, name: &str, points: i64) -> Line<'a> {
    let marker = match position {
        0 => Span::raw("   - "),
        p => match app.theme.medal_color(p) {
            Some(color) => Span::styled(format!("{:>3}o ", p), Style::default().fg(color).bold()),
            None => Span::styled(
                format!("{:>3}o ", p),
                Style::default().fg(app.theme.muted),
            ),
        },
    };
    Line::from(vec![
        marker,
        Span::raw(format!("{:<28}", name)),
        Span::styled(
            format!("{:+} pts", points),
            Style::default().fg(app.theme.accent),
        ),
    ])
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
