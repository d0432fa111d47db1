// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;
use serde_json::json;
use tokio::sync::mpsc;

use super::{CommandContext, OutputFormat};
use channel_kiosk::source::SourceEvent;

pub struct ListCommand {
    pub format: OutputFormat,
}

impl ListCommand {
    pub async fn execute(self, context: CommandContext) -> Result<()> {
        let (sender, mut events) = mpsc::unbounded_channel();
        let channels = context.source.load(&sender).await;
        drop(sender);

        let mut origin = None;
        while let Some(event) = events.recv().await {
            if let SourceEvent::ListUpdated { origin: o, .. } = event {
                origin = Some(o);
            }
        }

        match self.format {
            OutputFormat::Json => {
                let results: Vec<_> = channels
                    .iter()
                    .enumerate()
                    .map(|(index, channel)| {
                        json!({
                            "index": index,
                            "id": channel.id,
                            "title": channel.title,
                            "iframe": channel.iframe,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
            OutputFormat::Text => {
                if channels.is_empty() {
                    println!("No channels found");
                    return Ok(());
                }
                if let Some(origin) = origin {
                    eprintln!("{} channel(s) from {}", channels.len(), origin);
                }
                for (index, channel) in channels.iter().enumerate() {
                    println!("{:4} | {}", index, channel.label());
                }
            }
        }

        Ok(())
    }
}
