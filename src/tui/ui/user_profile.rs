//! User profile screen rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use crate::tui::app::App;

/// Renders the screen
pub fn render_user_profile(f: &mut Frame, app: &mut App) {
    let size = f.size();

    let Some(screen) = &app.user_profile_screen else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Details
            Constraint::Length(3), // Help
        ])
        .split(size);

    let title_text = match &screen.profile {
        Some(profile) => format!("{}'s Profile", profile.user_name),
        None => format!("User {}", screen.user_id),
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let body: Vec<Line> = if screen.loading {
        vec![Line::from(Span::styled(
            "Loading profile…",
            Style::default().fg(Color::Yellow),
        ))]
    } else if let Some(profile) = &screen.profile {
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Total Messages: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    profile.total_messages.to_string(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Messages by Channel:",
                Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            )),
        ];
        if profile.channels.is_empty() {
            lines.push(Line::from(Span::styled(
                "No messages available",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            lines.extend(profile.channels.iter().map(|channel| {
                Line::from(vec![
                    Span::styled(
                        format!("  #{}: ", channel.channel_name),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(format!("{} messages", channel.message_count)),
                ])
            }));
        }
        lines
    } else {
        let mut lines = vec![Line::from(Span::styled(
            "User not found",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))];
        if let Some(error) = &screen.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines
    };

    let details = Paragraph::new(body).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Guild {}", screen.guild_id)),
    );
    f.render_widget(details, chunks[1]);

    let help = Paragraph::new("b/Esc: Back to channel | r: Reload | q: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(app.route.to_string()));
    f.render_widget(help, chunks[2]);
}
