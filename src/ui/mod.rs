//! Terminal front-end
//!
//! A single event loop reduces terminal input, timers and request
//! completions in arrival order; see [`app::App`].

pub mod app;
pub mod form;
pub mod theme;
pub mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_channel::Sender;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::config::Config;
use crate::core::spawn_poller;
use crate::render::SystemClipboard;

pub use app::{App, AppEvent};
pub use form::{FormOption, FormResult, ScoutForm};

/// Redraw heartbeat for spinners and expiring "Copied!" labels
const TICK: Duration = Duration::from_millis(250);

/// How often the input thread checks whether the UI loop is gone
const INPUT_POLL: Duration = Duration::from_millis(200);

pub async fn run(config: Config) -> Result<()> {
    let client = Arc::new(
        ApiClient::from_config(&config.api).context("Failed to create API client")?,
    );
    info!(base_url = client.base_url(), "Starting TUI");

    let (tx, rx) = async_channel::unbounded();
    let mut app = App::new(&config, client, tx.clone(), Box::new(SystemClipboard::new()));

    // Dropping these handles on return stops the background tasks
    let _stats = spawn_poller(config.stats.interval(), tx.clone(), || AppEvent::StatsTick);
    let _ticker = spawn_poller(TICK, tx.clone(), || AppEvent::Tick);
    spawn_input_reader(tx);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Always restore the terminal, even on early return
    struct TerminalRestore;
    impl Drop for TerminalRestore {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
    let _restore = TerminalRestore;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;
    terminal.hide_cursor()?;

    while !app.should_quit() {
        terminal.draw(|f| view::draw(f, &app))?;

        let Ok(event) = rx.recv().await else {
            break;
        };
        app.handle(event);
        // Reduce whatever else is queued before paying for a redraw
        while let Ok(event) = rx.try_recv() {
            app.handle(event);
        }
    }

    terminal.show_cursor()?;
    info!("TUI closed");
    Ok(())
}

/// Forward terminal events from a blocking thread into the UI channel
fn spawn_input_reader(tx: Sender<AppEvent>) {
    std::thread::spawn(move || loop {
        if tx.is_closed() {
            break;
        }
        let ready = match event::poll(INPUT_POLL) {
            Ok(ready) => ready,
            Err(err) => {
                warn!("Terminal input failed: {err}");
                break;
            }
        };
        if !ready {
            continue;
        }
        let forwarded = match event::read() {
            Ok(Event::Key(key)) => AppEvent::Key(key),
            Ok(Event::Resize(..)) => AppEvent::Resize,
            Ok(_) => continue,
            Err(err) => {
                warn!("Terminal input failed: {err}");
                break;
            }
        };
        if tx.send_blocking(forwarded).is_err() {
            break;
        }
    });
}
