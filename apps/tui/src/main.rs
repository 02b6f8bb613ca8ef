mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use marketing_dashboard::config::init_app_config;
use marketing_dashboard::logging::init_logging;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = init_app_config()?;

    let headless = args.headless || !is_terminal();
    init_logging(&config, headless)?;

    let actions = args.view_actions()?;
    info!(
        data_path = %config.data_path.display(),
        page_size = config.page_size,
        headless,
        "starting marketing dashboard"
    );

    if headless {
        return event::run_headless(&config, actions, args.json).await;
    }

    let mut app = App::new(config)?;
    for action in actions {
        app.dispatch(action);
    }

    let mut terminal = terminal::setup_terminal()?;
    let result = event::run(&mut terminal, &mut app).await;
    terminal::cleanup_terminal_state(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
