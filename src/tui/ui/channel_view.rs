//! Channel view screen rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use crate::feed::layout::FeedLine;
use crate::feed::FeedPhase;
use crate::tui::app::App;
use crate::tui::types::Pane;
use super::helpers::{pane_block, truncate};

const SIDEBAR_WIDTH: u16 = 28;

/// Renders the screen
pub fn render_channel_view(f: &mut Frame, app: &mut App) {
    let size = f.size();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Panes
            Constraint::Length(3), // Status/Help
        ])
        .split(size);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SIDEBAR_WIDTH), // Guilds + channels
            Constraint::Min(20),               // Search + messages
            Constraint::Length(SIDEBAR_WIDTH), // Users
        ])
        .split(rows[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(columns[0]);

    let center = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box
            Constraint::Min(3),    // Messages
        ])
        .split(columns[1]);

    render_guilds(f, app, left[0]);
    render_channels(f, app, left[1]);
    render_search(f, app, center[0]);
    render_messages(f, app, center[1]);
    render_users(f, app, columns[2]);
    render_status(f, app, rows[1]);
}

fn render_list(
    f: &mut Frame,
    area: Rect,
    title: String,
    focused: bool,
    labels: Vec<(String, bool)>,
    selected: usize,
    empty_text: &str,
) {
    if labels.is_empty() {
        let empty = Paragraph::new(empty_text.to_string())
            .style(Style::default().fg(Color::DarkGray))
            .block(pane_block(title, focused));
        f.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = labels
        .into_iter()
        .map(|(label, active)| {
            let style = if active {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(truncate(&label, width), style)))
        })
        .collect();

    let highlight = if focused {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(pane_block(title, focused))
        .highlight_style(highlight)
        .highlight_symbol("→ ");
    let mut state = ListState::default().with_selected(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_guilds(f: &mut Frame, app: &App, area: Rect) {
    let labels = app
        .guilds
        .iter()
        .map(|g| (g.name.clone(), app.selected_guild.as_deref() == Some(g.id())))
        .collect();
    render_list(
        f,
        area,
        format!("{} ({})", Pane::Guilds.label(), app.guilds.len()),
        app.channel_view.focus == Pane::Guilds,
        labels,
        app.channel_view.guilds.selected_index,
        "No guilds",
    );
}

fn render_channels(f: &mut Frame, app: &App, area: Rect) {
    let labels = app
        .channels
        .iter()
        .map(|c| (format!("#{}", c.name), app.feed.channel() == Some(c.name.as_str())))
        .collect();
    let empty_text = if app.selected_guild.is_some() {
        "No channels"
    } else {
        "Select a guild"
    };
    render_list(
        f,
        area,
        format!("{} ({})", Pane::Channels.label(), app.channels.len()),
        app.channel_view.focus == Pane::Channels,
        labels,
        app.channel_view.channels.selected_index,
        empty_text,
    );
}

fn render_users(f: &mut Frame, app: &App, area: Rect) {
    let labels = app
        .users
        .iter()
        .map(|u| (format!("{} ({})", u.user_name, u.total_messages), false))
        .collect();
    render_list(
        f,
        area,
        format!("{} ({})", Pane::Users.label(), app.users.len()),
        app.channel_view.focus == Pane::Users,
        labels,
        app.channel_view.users.selected_index,
        "No users",
    );
}

fn render_search(f: &mut Frame, app: &App, area: Rect) {
    let view = &app.channel_view;
    let (text, style) = if view.search_input.is_empty() && !view.searching {
        (
            "Search Messages… (/)".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else if view.searching {
        (format!("{}_", view.search_input), Style::default().fg(Color::Yellow))
    } else {
        (view.search_input.clone(), Style::default().fg(Color::Yellow))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if view.searching {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .title("Search");
    f.render_widget(Paragraph::new(text).style(style).block(block), area);
}

fn render_messages(f: &mut Frame, app: &mut App, area: Rect) {
    let inner_height = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(2) as usize;
    app.feed.set_view_size(inner_height, inner_width);

    let focused = app.channel_view.focus == Pane::Messages;
    let feed = &app.feed;

    let title = match feed.channel() {
        Some(channel) => {
            let shown = feed.filtered().len();
            let loaded = feed.messages().len();
            let mut title = if feed.search_term().is_empty() {
                format!("#{} ({} messages)", channel, loaded)
            } else {
                format!("#{} ({}/{} matching)", channel, shown, loaded)
            };
            match feed.phase() {
                FeedPhase::Loading => title.push_str(" loading…"),
                FeedPhase::LoadingOlder => title.push_str(" loading older…"),
                FeedPhase::Exhausted => title.push_str(" · start of history"),
                FeedPhase::Idle | FeedPhase::Ready => {}
            }
            title
        }
        None => Pane::Messages.label().to_string(),
    };

    if feed.channel().is_none() || feed.lines().is_empty() {
        let hint = match (feed.channel(), feed.phase()) {
            (None, _) => "Select a guild and channel",
            (Some(_), FeedPhase::Loading) => "Loading messages…",
            (Some(_), _) if !feed.search_term().is_empty() => "No messages match the search",
            _ => "No messages",
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(pane_block(title, focused));
        f.render_widget(empty, area);
        return;
    }

    let lines: Vec<Line> = feed
        .visible_lines()
        .iter()
        .map(|line| match line {
            FeedLine::Header { author, timestamp } => Line::from(vec![
                Span::styled(
                    author.clone(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" - {}", timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            FeedLine::Body(text) => {
                Line::from(Span::styled(text.clone(), Style::default().fg(Color::White)))
            }
            FeedLine::Separator => Line::from(""),
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(pane_block(title, focused)), area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let view = &app.channel_view;
    let (text, color) = match &view.status_message {
        Some(status) if view.is_error => (status.clone(), Color::Red),
        Some(status) => (status.clone(), Color::Yellow),
        None if view.searching => (
            "Type to filter | Enter/Esc: Done | Ctrl+U: Clear".to_string(),
            Color::DarkGray,
        ),
        None => (
            "Tab: Focus | ↑↓: Move/Scroll | PgUp/PgDn | Enter: Open | /: Search | r: Retry | q: Quit"
                .to_string(),
            Color::DarkGray,
        ),
    };

    let status = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(app.route.to_string()));
    f.render_widget(status, area);
}
