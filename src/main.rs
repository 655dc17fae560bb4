// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use imgur_upload::{
    cli::{Cli, LogLevel},
    collect_interactive_args, constants, run_from_cli,
};
use log::warn;
use std::{env, sync::Arc, time::Duration};

fn init_logger(level: LogLevel) {
    if level == LogLevel::Off {
        return;
    }

    let filter = match level {
        LogLevel::Off => log::LevelFilter::Off,
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warn => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
        LogLevel::Trace => log::LevelFilter::Trace,
    };

    let app_name = clap::crate_name!();

    let log_file_path = match dirs::home_dir() {
        Some(home) => home
            .join(constants::CONFIG_DIR_NAME)
            .join(constants::LOG_FILE_NAME),
        None => {
            eprintln!("warning: home directory not found, logging to the temp directory.");
            env::temp_dir().join(app_name).join(constants::LOG_FILE_NAME)
        }
    };

    if let Some(dir) = log_file_path.parent()
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!("warning: could not create the log directory {:?}: {}", dir, e);
    }

    let file_appender = match fern::log_file(&log_file_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "warning: could not open the log file {:?}: {}. Trying a fallback.",
                log_file_path, e
            );
            let fallback_path = env::temp_dir().join(format!(
                "{}-{}",
                app_name,
                constants::LOG_FALLBACK_FILE_NAME
            ));
            match fern::log_file(&fallback_path) {
                Ok(fb_file) => {
                    warn!("log output redirected to {:?}", fallback_path);
                    fb_file
                }
                Err(e_fb) => {
                    eprintln!(
                        "error: could not create either log file {:?}: {}. File logging is off.",
                        fallback_path, e_fb
                    );
                    return;
                }
            }
        }
    };

    let result = fern::Dispatch::new()
        .level(filter)
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{:<5}] [{}:{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        .chain(file_appender)
        .apply();

    if let Err(e) = result {
        eprintln!("warning: logger initialization failed: {}", e);
    }
}

#[tokio::main]
async fn main() {
    // Enable ANSI colors on Windows terminals.
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!("\n{} Interrupted by user.", "[!]".yellow());
        tokio::time::sleep(Duration::from_millis(100)).await;
        std::process::exit(130);
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "imgur-upload".to_string());

    // Invoking the program with no arguments at all opens the interactive
    // form instead of the flag parser. The same flag decides whether the
    // run ends with a "press enter" pause.
    let interactive = env::args().count() <= 1;

    let result = if interactive {
        match collect_interactive_args() {
            Ok(args) => {
                init_logger(args.log_level);
                run_from_cli(Arc::new(args), true).await
            }
            Err(e) => Err(e),
        }
    } else {
        let after_help = format!(
            "Examples:\n  # Upload one image with a title\n  {bin} photo.jpg -t \"Holiday 2024\"\n\n  # Upload a whole directory anonymously\n  {bin} ./screenshots -a\n\n  # Mix remote and local targets\n  {bin} https://example.com/cat.png notes.png -t Cats -d \"cat pictures\"",
            bin = bin_name
        );

        let cmd = Cli::command().after_help(after_help);
        let args = Arc::new(Cli::from_arg_matches(&cmd.get_matches()).unwrap());
        init_logger(args.log_level);
        run_from_cli(args, false).await
    };

    if let Err(e) = result {
        eprintln!("\n{} {}", "[X]".red(), format!("run failed: {}", e).red());
        std::process::exit(1);
    }
}
