// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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

/// A strip of `height` rows along the top edge, inset from the right.
pub fn top_banner_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    Rect {
        x: r.x + r.width.saturating_sub(width + 2).min(r.width - width),
        y: r.y + 1.min(r.height.saturating_sub(height)),
        width,
        height: height.min(r.height),
    }
}

pub fn create_overlay_widget(text: &str, is_error: bool) -> Paragraph<'_> {
    let color = if is_error { Color::Red } else { Color::Yellow };

    Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    )
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
}

pub fn key_hint_lines(menu_visible: bool) -> Vec<Line<'static>> {
    let hint = if menu_visible {
        "↑/↓ highlight | Enter play | ←/Esc close"
    } else {
        "↑/↓ channel | → menu | q quit"
    };
    vec![Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    ))]
}
