// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use super::app::App;
use super::widgets::{centered_rect, create_overlay_widget, key_hint_lines, top_banner_rect};

const MENU_WIDTH: u16 = 40;
const OVERLAY_WIDTH: u16 = 48;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();

    draw_stage(frame, app, size);

    if app.kiosk.menu().is_visible() {
        draw_menu(frame, app, size);
    } else {
        app.menu_area = None;
    }

    if app.kiosk.overlay().is_visible() {
        let area = top_banner_rect(OVERLAY_WIDTH, 3, size);
        frame.render_widget(Clear, area);
        frame.render_widget(
            create_overlay_widget(app.kiosk.overlay().text(), app.kiosk.is_unavailable()),
            area,
        );
    }
}

/// The full-screen area standing in for the playback surface.
fn draw_stage(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let lines = match app.kiosk.channels().current() {
        Some(channel) => vec![
            Line::from(Span::styled(
                channel.label(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                channel.iframe.clone(),
                Style::default().fg(Color::DarkGray),
            )),
        ],
        None if app.kiosk.is_unavailable() => vec![Line::from(Span::styled(
            "No channels to play",
            Style::default().fg(Color::DarkGray),
        ))],
        None => vec![Line::from(Span::styled(
            "⏳ Loading channels...",
            Style::default().fg(Color::Yellow),
        ))],
    };

    let stage = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(stage, centered_rect(80, 30, chunks[0]));

    let hints = Paragraph::new(key_hint_lines(app.kiosk.menu().is_visible()))
        .alignment(Alignment::Center);
    frame.render_widget(hints, chunks[1]);
}

fn draw_menu(frame: &mut Frame, app: &mut App, area: Rect) {
    let menu_area = Rect {
        width: MENU_WIDTH.min(area.width),
        ..area
    };
    frame.render_widget(Clear, menu_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Channels ");
    let inner_area = block.inner(menu_area);
    frame.render_widget(block, menu_area);
    app.menu_area = Some(inner_area);

    let channels = app.kiosk.channels().channels().clone();
    if channels.is_empty() {
        let empty_msg = Paragraph::new("No channels")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty_msg, inner_area);
        return;
    }

    let visible_height = inner_area.height as usize;
    app.scroll_menu_to_highlight(visible_height);

    let start = app.menu_scroll.min(channels.len());
    let end = (start + visible_height).min(channels.len());
    let highlighted = app.kiosk.menu().highlighted();
    let playing = app.kiosk.channels().current_index();

    let items: Vec<ListItem> = channels[start..end]
        .iter()
        .enumerate()
        .map(|(i, channel)| {
            let index = start + i;
            let marker = if Some(index) == playing { "● " } else { "  " };
            let content = if index == highlighted {
                Line::from(vec![Span::raw(" ▶ "), Span::raw(marker), Span::raw(channel.label())])
                    .style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
            } else {
                Line::from(vec![Span::raw("   "), Span::raw(marker), Span::raw(channel.label())])
            };
            ListItem::new(content)
        })
        .collect();

    let list = List::new(items).style(Style::default().fg(Color::White));
    frame.render_widget(list, inner_area);
}
