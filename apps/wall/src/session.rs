//! The terminal event loop.
//!
//! One task owns the `Wall` and reacts to three sources: input lines, live
//! inserts and finished backend calls. Feed loads, the subscribe step and
//! publishing all run on spawned tasks, so a stalled request never holds up
//! input.

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use wall_core::Wall;
use wall_core::domain::{Attachment, MAX_BODY_CHARS, Post};
use wall_core::error::RepoError;
use wall_core::ports::{ChannelError, PostInserted, Subscription};
use wall_core::wall::PublishError;

use crate::command::{Command, HELP};
use crate::render::render;

/// A backend call that finished on its own task.
enum Completion {
    FeedLoaded(Result<Vec<Post>, RepoError>),
    Subscribed(Result<Subscription, ChannelError>),
    Published(Result<Post, PublishError>),
}

pub struct Session {
    wall: Wall,
    subscription: Option<Subscription>,
    notice: Option<String>,
    done_tx: mpsc::UnboundedSender<Completion>,
    done_rx: mpsc::UnboundedReceiver<Completion>,
}

impl Session {
    pub fn new(wall: Wall) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            wall,
            subscription: None,
            notice: None,
            done_tx,
            done_rx,
        }
    }

    /// Mount the wall and process stdin until `/quit` or end of input.
    pub async fn run(mut self) -> anyhow::Result<()> {
        self.run_with(BufReader::new(tokio::io::stdin())).await
    }

    pub async fn run_with<R: AsyncBufRead + Unpin>(&mut self, input: R) -> anyhow::Result<()> {
        self.mount();
        self.draw()?;

        let mut lines = input.lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    self.notice = None;
                    if !self.handle(Command::parse(&line)).await {
                        break;
                    }
                }
                Some(event) = next_insert(&mut self.subscription) => {
                    self.wall.apply_insert(event);
                }
                Some(done) = self.done_rx.recv() => {
                    self.complete(done);
                }
            }
            self.draw()?;
        }

        if let Some(subscription) = self.subscription.take() {
            self.wall.unmount(subscription);
        }
        Ok(())
    }

    /// Start the feed load and the subscribe step side by side.
    fn mount(&self) {
        self.refresh();

        let subscriber = self.wall.subscriber();
        let done = self.done_tx.clone();
        tokio::spawn(async move {
            let result = subscriber.subscribe().await;
            // A closed loop drops the subscription, which tears it down.
            let _ = done.send(Completion::Subscribed(result));
        });
    }

    fn refresh(&self) {
        let loader = self.wall.feed_loader();
        let done = self.done_tx.clone();
        tokio::spawn(async move {
            let _ = done.send(Completion::FeedLoaded(loader.load().await));
        });
    }

    fn complete(&mut self, done: Completion) {
        match done {
            Completion::FeedLoaded(result) => {
                let _ = self.wall.finish_load(result);
            }
            Completion::Subscribed(result) => {
                if let Some(subscription) = self.wall.finish_subscribe(result) {
                    if let Some(previous) = self.subscription.replace(subscription) {
                        self.wall.unmount(previous);
                    }
                }
            }
            Completion::Published(result) => {
                self.wall.finish_submit(result);
            }
        }
    }

    /// Returns false to stop the loop.
    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Edit(text) => {
                if !self.wall.edit_text(text) {
                    self.notice = Some(format!(
                        "Posts are limited to {MAX_BODY_CHARS} characters, draft unchanged"
                    ));
                }
            }
            Command::Type(text) => {
                for c in text.chars() {
                    if !self.wall.type_char(c) {
                        break;
                    }
                }
            }
            Command::Attach(path) => self.attach(&path).await,
            Command::Detach => self.wall.clear_attachment(),
            Command::Share => self.share(),
            Command::Refresh => self.refresh(),
            Command::Help => println!("{HELP}"),
            Command::Quit => return false,
            Command::Unknown(line) => {
                tracing::debug!(input = %line, "Unknown command");
                println!("{HELP}");
            }
        }
        true
    }

    async fn attach(&mut self, path: &Path) {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Could not read attachment");
                return;
            }
        };
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        tracing::debug!(file = %file_name, bytes = bytes.len(), "Attachment selected");
        self.wall.select_attachment(
            Attachment::new(file_name, bytes),
            Some(path.display().to_string()),
        );
    }

    fn share(&mut self) {
        let Some(request) = self.wall.begin_submit() else {
            return;
        };

        let publisher = self.wall.publisher();
        let done = self.done_tx.clone();
        tokio::spawn(async move {
            let result = publisher.publish(request).await;
            let _ = done.send(Completion::Published(result));
        });
    }

    fn draw(&self) -> std::io::Result<()> {
        let page = render(&self.wall.page(Utc::now()));
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout)?;
        stdout.write_all(page.as_bytes())?;
        if let Some(notice) = &self.notice {
            writeln!(stdout, "! {notice}")?;
        }
        stdout.flush()
    }
}

/// Next live insert; never resolves without a subscription. A closed
/// subscription is dropped so the loop stops polling it.
async fn next_insert(subscription: &mut Option<Subscription>) -> Option<PostInserted> {
    let Some(active) = subscription else {
        return std::future::pending().await;
    };

    let event = active.next().await;
    if event.is_none() {
        tracing::warn!(channel = %active.channel(), "Live updates ended");
        *subscription = None;
        return std::future::pending().await;
    }
    event
}
