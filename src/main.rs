use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;
use voxlog_session::LogSink;

#[derive(Parser)]
#[command(name = "voxlog", about = "Speech recognition log and text-to-speech console")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "voxlog.toml")]
    config: PathBuf,

    /// Do not start listening on launch
    #[arg(long)]
    no_autostart: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = voxlog_core::AppConfig::load_from_file(&cli.config)
        .with_context(|| format!("failed to load config from {:?}", cli.config))?;

    // Diagnostics tab buffer and layered tracing subscriber
    let diagnostics = voxlog_tui::line_buffer();
    let diagnostic_layer = voxlog_tui::DiagnosticLayer::new(diagnostics.clone(), 1000);

    let env_filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(diagnostic_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    tracing::info!("voxlog starting");

    let registry = voxlog_engine::EngineRegistry::new();
    let platform = voxlog_engine::SpeechPlatform::probe(&config, &registry)
        .context("failed to set up speech engines")?;
    tracing::info!(
        recognition = %config.recognition.engine,
        synthesis = %config.synthesis.engine,
        can_listen = platform.can_listen(),
        can_speak = platform.can_speak(),
        "speech platform probed"
    );

    // Transcript sinks: the on-screen log, plus a file if configured
    let transcript = voxlog_tui::line_buffer();
    let mut sinks: Vec<Box<dyn LogSink>> = vec![Box::new(voxlog_session::MemoryLog::with_buffer(
        transcript.clone(),
        config.log.capacity,
    ))];
    if let Some(ref path) = config.log.file {
        let file_log = voxlog_session::FileLog::open(path)
            .with_context(|| format!("failed to open transcript file {:?}", path))?;
        tracing::info!("also writing transcript to {:?}", file_log.path());
        sinks.push(Box::new(file_log));
    }

    let mut adapter = voxlog_session::SpeechSessionAdapter::new(platform, sinks);
    if config.recognition.autostart && !cli.no_autostart {
        adapter.start_listening();
    }

    // Session ↔ TUI channels
    let (state_tx, state_rx) = tokio::sync::watch::channel(adapter.snapshot());
    let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel::<voxlog_core::UiCommand>();

    let mut host = voxlog_session::SessionHost::new(adapter, cmd_rx, state_tx);
    host.start();

    tracing::info!("TUI active, press Esc to quit");

    let app = voxlog_tui::App::new(transcript, diagnostics)
        .with_voice_settings(config.synthesis.pitch, config.synthesis.rate);

    // Run TUI (blocks until user quits)
    let tui_result = voxlog_tui::run(state_rx, cmd_tx, app).await;

    tracing::info!("shutting down");
    host.shutdown().await;

    tui_result.context("TUI error")
}
