use std::sync::OnceLock;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, Popup, View};
use crate::theme::Theme;

// Palette is installed once at startup, before the first frame
static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the palette; later calls are ignored
pub fn init_theme(theme: Theme) {
    let _ = THEME.set(theme);
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn danger() -> Color { theme().danger }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn inactive() -> Color { theme().inactive }
fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info line
            Constraint::Min(8),    // Home or card view
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    draw_info_line(f, app, chunks[0]);

    match &app.view {
        View::Home => draw_home(f, chunks[1]),
        View::Cards { draw, selection } => draw_cards(f, app, draw, *selection, chunks[1]),
    }

    draw_footer(f, app, chunks[2]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::DeckBrowser => draw_deck_browser(f, app),
        Popup::Help => draw_help_popup(f),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    // Priority: status message > reveal progress > deck summary
    let line = if let Some(ref status) = app.status_message {
        let color = if status.starts_with("Error") { danger() } else { warning() };
        Line::from(Span::styled(status, Style::default().fg(color)))
    } else if app.is_animating() {
        Line::from(Span::styled("카드를 뽑는 중...", Style::default().fg(text_dim())))
    } else {
        Line::from(Span::styled(
            format!("{} cards in deck · draw {}", app.deck.len(), app.config.draw_size),
            Style::default().fg(text_dim()),
        ))
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_home(f: &mut Frame, area: Rect) {
    // Push the banner roughly a third of the way down
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(7),
            Constraint::Percentage(30),
        ])
        .split(area);

    let banner = vec![
        Line::from(Span::styled(
            "요즘 어때요?",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "당신의 마음을 카드 세 장에 담아보았습니다.",
            Style::default().fg(text_dim()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[ Enter ] ", Style::default().fg(accent()).add_modifier(Modifier::BOLD)),
            Span::styled("카드 뽑기 →", Style::default().fg(text())),
        ]),
    ];

    let home = Paragraph::new(banner).alignment(Alignment::Center);
    f.render_widget(home, chunks[1]);
}

fn draw_cards(
    f: &mut Frame,
    app: &App,
    draw: &[crate::deck::Card],
    selection: Option<u32>,
    area: Rect,
) {
    if draw.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> =
        draw.iter().map(|_| Constraint::Ratio(1, draw.len() as u32)).collect();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints(constraints)
        .split(area);

    for (i, card) in draw.iter().enumerate() {
        let is_cursor = i == app.cursor;
        let is_selected = selection == Some(card.id);
        draw_card(f, card, is_cursor, is_selected, app.card_revealed(i), columns[i]);
    }
}

fn draw_card(
    f: &mut Frame,
    card: &crate::deck::Card,
    is_cursor: bool,
    is_selected: bool,
    revealed: bool,
    area: Rect,
) {
    let border_color = if is_selected {
        success()
    } else if is_cursor {
        accent()
    } else {
        inactive()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    // Face-down during the staggered reveal
    if !revealed {
        let back = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("🂠", Style::default().fg(text_dim()))),
            Line::from(""),
            Line::from(Span::styled("· · ·", Style::default().fg(text_dim()))),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(back, area);
        return;
    }

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::raw(card.emoji.clone())),
        Line::from(""),
        Line::from(Span::styled(
            card.title.clone(),
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(card.text.clone(), Style::default().fg(text()))),
    ];

    if is_selected {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("────", Style::default().fg(inactive()))));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            card.affirmation.clone(),
            Style::default().fg(success()).add_modifier(Modifier::ITALIC),
        )));
    } else {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter 눌러 메시지 보기",
            Style::default().fg(text_dim()),
        )));
    }

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    f.render_widget(content, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: &[(&str, &str)] = match (&app.view, app.popup) {
        (_, Popup::DeckBrowser) => &[("j/k", "scroll"), ("Esc", "close")],
        (_, Popup::Help) => &[("Esc", "close")],
        (View::Home, _) => &[("Enter", "draw"), ("d", "deck"), ("?", "help"), ("q", "quit")],
        (View::Cards { .. }, _) => &[
            ("←/→", "move"),
            ("Enter", "reveal"),
            ("r", "redraw"),
            ("Esc", "home"),
            ("q", "quit"),
        ],
    };

    let mut spans = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(inactive())));
        }
        spans.push(Span::styled(*key, Style::default().fg(accent())));
        spans.push(Span::styled(format!(" {}", action), Style::default().fg(text_dim())));
    }

    let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_deck_browser(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = centered_rect(if area.width < 80 { 95 } else { 70 }, 80, area);

    f.render_widget(Clear, popup_area);

    let header_row = Row::new(vec![
        Span::styled("ID", Style::default().fg(header())),
        Span::styled("", Style::default().fg(header())),
        Span::styled("Title", Style::default().fg(header())),
        Span::styled("Prompt", Style::default().fg(header())),
    ]);

    let rows: Vec<Row> = app
        .deck
        .cards()
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let style = if i == app.browser_selected {
                Style::default().bg(bg_selected()).fg(text())
            } else {
                Style::default().fg(text())
            };
            Row::new(vec![
                Span::raw(card.id.to_string()),
                Span::raw(card.emoji.clone()),
                Span::raw(card.title.clone()),
                Span::raw(card.text.clone()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(16),
            Constraint::Min(20),
        ],
    )
    .header(header_row)
    .block(
        Block::default()
            .title(Span::styled(" Deck ", Style::default().fg(accent())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent())),
    );

    f.render_widget(table, popup_area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled("═══ Home ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  Enter/Space ", Style::default().fg(accent())),
            Span::raw("Draw three cards"),
        ]),
        Line::from(vec![
            Span::styled("  d           ", Style::default().fg(accent())),
            Span::raw("Browse the full deck"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Card View ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  ←/→ Tab     ", Style::default().fg(accent())),
            Span::raw("Move between cards"),
        ]),
        Line::from(vec![
            Span::styled("  Enter/Space ", Style::default().fg(accent())),
            Span::raw("Reveal/hide the card's message"),
        ]),
        Line::from(vec![
            Span::styled("  1-3         ", Style::default().fg(accent())),
            Span::raw("Reveal a card by position"),
        ]),
        Line::from(vec![
            Span::styled("  r           ", Style::default().fg(accent())),
            Span::raw("Draw a fresh hand"),
        ]),
        Line::from(vec![
            Span::styled("  Esc         ", Style::default().fg(accent())),
            Span::raw("Back to home"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Scripting ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  kokoro --draw          ", Style::default().fg(accent())),
            Span::raw("Print one draw as JSON"),
        ]),
        Line::from(vec![
            Span::styled("  kokoro --list          ", Style::default().fg(accent())),
            Span::raw("Print the whole deck as JSON"),
        ]),
        Line::from(vec![
            Span::styled("  kokoro --draw --seed N ", Style::default().fg(accent())),
            Span::raw("Reproducible draw"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Deck ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(Span::raw("  • Edit <config_dir>/kokoro/deck.toml to change the cards")),
        Line::from(Span::raw("  • Or point deck_path in config.toml anywhere you like")),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" kokoro Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
