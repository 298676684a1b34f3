mod cli;
mod error_fmt;
mod run;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use balance_core::BalanceError;
use clap::Parser;
use eyre::{Result, WrapErr, eyre};
use serde_json::json;
use tracing::{Level, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::run::{Output, RunOverrides, mode_name, run_balance, self_check};

fn main() {
    let cli = Cli::parse();
    let json = cli.json;
    let _ = JSON_MODE.set(json);
    if let Err(e) = color_eyre::install() {
        eprintln!("warning: failed to install color-eyre: {e}");
    }

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> Result<()> {
    let cfg = match &cli.config {
        Some(path) => balance_config::load_file(path).map_err(config_error)?,
        None => balance_config::Config::default(),
    };

    let level = cli
        .log_level
        .as_deref()
        .or(cfg.logging.level.as_deref())
        .unwrap_or("info");
    // Dropping the guard flushes the file writer; keep it for the whole run.
    let _file_guard = setup_tracing(cli.json, level, &cfg.logging)?;

    match cli.cmd {
        Commands::Run {
            ticks,
            time_scale,
            tick_hz,
            mode,
            every,
            stats,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&shutdown);
            ctrlc::set_handler(move || {
                info!("received shutdown signal");
                flag.store(true, Ordering::SeqCst);
            })
            .wrap_err("install Ctrl-C handler")?;

            let ov = RunOverrides {
                ticks,
                time_scale,
                tick_hz,
                mode: mode.map(Into::into),
            };
            let out = Output {
                json: cli.json,
                every,
                stats,
            };
            run_balance(&cfg, &ov, out, shutdown)?;
        }
        Commands::SelfCheck => {
            let snap = self_check(&cfg)?;
            if cli.json {
                println!(
                    "{}",
                    json!({
                        "ok": true,
                        "measurement_m": snap.measurement_m,
                        "angle": snap.actuator_angle,
                    })
                );
            } else {
                println!(
                    "self-check ok: measurement {:.4} m, angle {:.4} rad",
                    snap.measurement_m, snap.actuator_angle
                );
            }
        }
        Commands::Health => {
            println!(
                "{}",
                json!({
                    "status": "ok",
                    "version": env!("CARGO_PKG_VERSION"),
                    "tick_hz": cfg.timing.tick_hz,
                    "time_scale": cfg.timing.time_scale,
                    "mode": mode_name(cfg.controller.mode.into()),
                    "config": cli.config.as_ref().map(|p| p.display().to_string()),
                })
            );
        }
    }
    Ok(())
}

/// Config loading errors are untyped; tag them so they share the config exit code.
fn config_error(e: eyre::Report) -> eyre::Report {
    eyre::Report::new(BalanceError::Config(e.to_string()))
}

fn setup_tracing(
    json: bool,
    level: &str,
    logging: &balance_config::Logging,
) -> Result<Option<WorkerGuard>> {
    let level: Level = level.parse().map_err(|_| {
        eyre::Report::new(BalanceError::Config(format!(
            "invalid log level {level:?} (expected error|warn|info|debug|trace)"
        )))
    })?;
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Console output goes to stderr; stdout carries results and telemetry.
    let console = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().compact().with_writer(std::io::stderr).boxed()
    };

    let mut guard = None;
    let file = match &logging.file {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre!("logging.file has no file name: {file:?}"))?;
            let appender = match logging.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, g) = tracing_appender::non_blocking(appender);
            guard = Some(g);
            Some(fmt::layer().json().with_ansi(false).with_writer(writer).boxed())
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(guard)
}
