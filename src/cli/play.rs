// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::info;

use super::CommandContext;
use channel_kiosk::player::{CommandSink, PlaybackSink};
use channel_kiosk::state::ChannelListState;

/// Plays one channel without the kiosk screen and waits for the player.
pub struct PlayCommand {
    /// Any integer; wraps around the list like remote navigation does.
    pub index: i64,
}

impl PlayCommand {
    pub async fn execute(self, context: CommandContext) -> Result<()> {
        let (sender, _events) = mpsc::unbounded_channel();
        let channels = context.source.load(&sender).await;

        let mut state = ChannelListState::new(channels);
        let Some(channel) = state.select(self.index) else {
            anyhow::bail!("No channels available");
        };
        let url = channel.playback_url(channel_kiosk::now_epoch_ms());
        info!("Playing {}", channel.label());
        println!("▶ {}", channel.label());

        let mut sink = CommandSink::new(&context.config.player);
        sink.set_source(&url)?;

        let status = tokio::task::spawn_blocking(move || sink.wait()).await??;
        if let Some(status) = status
            && !status.success()
        {
            eprintln!("Player exited with {}", status);
        }

        Ok(())
    }
}
