use bevy::prelude::*;

use bevy::app::ScheduleRunnerPlugin;
use bevy::state::app::StatesPlugin;

use raftworks::game::GamePlugin;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const LOG_PREFIX: &str = "raftworks";
const KEEP_LOG_FILES: usize = 25;

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bevy_ecs=info,bevy_asset=warn,raftworks=info"))
}

/// Install the stdout + file subscriber. Returns the log file path, or `None`
/// when the logs directory is unusable (stdout logging still works then).
fn setup_file_logging() -> Option<String> {
    let log_dir = PathBuf::from("logs");
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Cannot create {}: {e}; logging to stdout only", log_dir.display());
        tracing_subscriber::registry()
            .with(default_filter())
            .with(fmt::layer().with_writer(std::io::stdout).with_target(false))
            .init();
        return None;
    }

    // Clean up old log files, keeping only the newest ones
    cleanup_old_logs(&log_dir, KEEP_LOG_FILES);

    let now = chrono::Local::now();
    let log_filename = format!("{}_{}.log", LOG_PREFIX, now.format("%Y%m%d_%H%M%S"));
    let log_path_str = log_dir.join(&log_filename).to_string_lossy().to_string();

    let file_appender = RollingFileAppender::new(
        Rotation::NEVER, // One file per run
        &log_dir,
        &log_filename,
    );

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    tracing_subscriber::registry()
        .with(default_filter())
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Some(log_path_str)
}

fn cleanup_old_logs(log_dir: &Path, keep_count: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else { return };
    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|s| s.starts_with(LOG_PREFIX) && s.ends_with(".log"))
        })
        .collect();

    // Oldest first
    log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

    if log_files.len() > keep_count {
        for file in log_files.iter().take(log_files.len() - keep_count) {
            let _ = fs::remove_file(file.path());
        }
    }
}

fn main() -> AppExit {
    if let Some(log_file) = setup_file_logging() {
        println!("raftworks: logging to {log_file}");
    }

    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
            AssetPlugin::default(),
            StatesPlugin,
        ))
        .add_plugins(GamePlugin)
        .run()
}
