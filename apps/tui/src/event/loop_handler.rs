use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::app::{handle_input, App};
use crate::event::load::LoadMachine;
use crate::ui;

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut loader = LoadMachine::new();
    info!("event loop started");

    loop {
        loader.poll(app).await;
        app.tick(Instant::now());
        app.sync_views();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(width, height)) => {
                    debug!(width, height, "terminal resized");
                }
                Ok(_) | Err(_) => {
                    // Ignore non-key events
                }
            }
        }

        // Let spawned load tasks make progress between frames
        tokio::task::yield_now().await;
    }

    app.worker.terminate();
    info!(load_phase = %loader.state(), "event loop finished");
    Ok(())
}
