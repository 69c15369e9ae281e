use clap::Parser;
use color_eyre::Result;
use tariff_tracker::app::actions::AppActions;
use tariff_tracker::app::App;
use tariff_tracker::cli::CliArgs;
use tariff_tracker::config::AppConfig;
use tariff_tracker::telemetry::{init_tracing, LogTarget};
use tariff_tracker::{data, event, terminal};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = AppConfig::from_env()?;

    // Without a terminal there is nothing to draw on.
    let headless = args.headless || args.json || !is_terminal();

    let log_target = if headless {
        LogTarget::Stderr
    } else {
        LogTarget::File(config.log_file.clone())
    };
    init_tracing(&log_target, config.debug)?;
    info!(source = %config.data_source.describe(), headless, "starting tariff tracker");

    if headless {
        return event::run_headless(&config, args.json).await;
    }

    let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel();
    let actions = AppActions::new(
        data::http_client()?,
        config.data_source.clone(),
        config.webhook_url.clone(),
        events_tx,
    );
    let mut app = App::new(&config, actions);

    let mut terminal = terminal::setup_terminal()?;
    let result = event::run(&mut terminal, &mut app, &mut events_rx).await;
    terminal::cleanup_terminal_state(true, true);

    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
