// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::{Context, Result};
use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::{debug, info, warn};

use crate::config::PlayerConfig;

/// Placeholder in player arguments that is replaced with the channel URL.
pub const URL_PLACEHOLDER: &str = "{url}";

/// The surface that actually renders a channel.
pub trait PlaybackSink: Send {
    fn set_source(&mut self, url: &str) -> Result<()>;

    /// Reports, once, that the surface went away on its own.
    fn poll_exit(&mut self) -> Option<String> {
        None
    }

    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Runs an external viewer (a kiosk browser, mpv, ...) per channel, replacing
/// the previous process on every source change.
pub struct CommandSink {
    command: String,
    args: Vec<String>,
    process: Option<Child>,
}

impl CommandSink {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            process: None,
        }
    }

    pub fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Arguments for one launch: `{url}` is substituted, or the URL is
    /// appended when no argument mentions it.
    pub fn command_args(&self, url: &str) -> Vec<String> {
        let mut substituted = false;
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains(URL_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(URL_PLACEHOLDER, url)
                } else {
                    arg.clone()
                }
            })
            .collect();

        if !substituted {
            args.push(url.to_string());
        }
        args
    }

    /// Blocks until the current player process exits.
    pub fn wait(&mut self) -> Result<Option<ExitStatus>> {
        let Some(mut child) = self.process.take() else {
            return Ok(None);
        };
        let status = child.wait().context("Failed to wait for player")?;
        Ok(Some(status))
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.process.take() {
            debug!("Stopping player process {}", child.id());
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl PlaybackSink for CommandSink {
    fn set_source(&mut self, url: &str) -> Result<()> {
        self.stop();

        let args = self.command_args(url);
        debug!("Launching {} {:?}", self.command, args);

        let child = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start player '{}'", self.command))?;

        self.process = Some(child);
        Ok(())
    }

    fn poll_exit(&mut self) -> Option<String> {
        let child = self.process.as_mut()?;
        match child.try_wait() {
            Ok(Some(status)) => {
                self.process = None;
                let message = if status.success() {
                    "Player exited normally".to_string()
                } else if let Some(code) = status.code() {
                    format!("Player exited with error code: {}", code)
                } else {
                    "Player terminated by signal".to_string()
                };
                warn!("{}", message);
                Some(message)
            }
            Ok(None) => None,
            Err(e) => {
                self.process = None;
                Some(format!("Failed to check player status: {}", e))
            }
        }
    }

    fn shutdown(&mut self) -> Result<()> {
        debug!("Shutting down player");
        self.stop();
        Ok(())
    }
}

impl Drop for CommandSink {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Logs the URL instead of rendering it; used for dry runs.
#[derive(Debug, Default)]
pub struct LogSink {
    pub last_url: Option<String>,
}

impl PlaybackSink for LogSink {
    fn set_source(&mut self, url: &str) -> Result<()> {
        info!("Would play: {}", url);
        self.last_url = Some(url.to_string());
        Ok(())
    }
}
