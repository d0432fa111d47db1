// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

pub mod app;
pub mod event;
pub mod ui;
pub mod widgets;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::config::Config;
use crate::kiosk::{Action, Kiosk};
use crate::player::PlaybackSink;
use crate::source::{ChannelSource, SourceEvent};

pub use app::App;
pub use event::{Event, EventHandler};

/// Upper bound on how long the loop sleeps, so a player that exits on its
/// own is noticed even when no timer is pending.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    pub event_handler: EventHandler,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        let event_handler = EventHandler::new();
        Ok(Self {
            terminal,
            event_handler,
        })
    }

    pub fn init(&mut self) -> Result<()> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    pub fn draw(&mut self, app: &mut App) -> Result<()> {
        self.terminal.draw(|frame| ui::draw(frame, app))?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

/// Opens the kiosk screen, loads channels in the background and runs until
/// the user quits. The playback surface is shut down with the screen.
pub async fn run_tui(config: Config, sink: Box<dyn PlaybackSink>) -> Result<()> {
    let source = ChannelSource::from_config(&config)?;

    let mut tui = Tui::new()?;
    tui.init()?;

    let (sender, mut source_events) = mpsc::unbounded_channel();
    let loader = tokio::spawn(async move {
        let channels = source.load(&sender).await;
        debug!("Channel load finished with {} channel(s)", channels.len());
    });

    let mut app = App::new(Kiosk::new(sink, &config.ui));
    let res = run_app(&mut tui, &mut app, &mut source_events).await;

    loader.abort();
    if let Err(e) = app.kiosk.shutdown() {
        error!("Failed to stop player: {:#}", e);
    }

    tui.exit()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app(
    tui: &mut Tui,
    app: &mut App,
    source_events: &mut mpsc::UnboundedReceiver<SourceEvent>,
) -> Result<()> {
    tui.draw(app)?;

    loop {
        let wake_at = {
            let poll = Instant::now() + POLL_INTERVAL;
            app.kiosk.next_deadline().map_or(poll, |deadline| deadline.min(poll))
        };

        let should_redraw = tokio::select! {
            event = tui.event_handler.next() => match event? {
                Event::Key(key_event) => match app.handle_key_event(key_event) {
                    Some(Action::Quit) => break,
                    None => true,
                },
                Event::Mouse(mouse_event) => app.handle_mouse_event(mouse_event),
                Event::Resize(_, _) => true,
            },
            Some(event) = source_events.recv() => {
                app.kiosk.apply(event, Instant::now());
                true
            }
            _ = tokio::time::sleep_until(wake_at.into()) => app.kiosk.tick(Instant::now()),
        };

        if should_redraw {
            tui.draw(app)?;
        }
    }

    Ok(())
}
