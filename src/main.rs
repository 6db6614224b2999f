#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;

use anyhow::Error;
use owo_colors::OwoColorize;

use crate::application::cli;
use crate::configuration::Config;
use crate::configuration::DEBUG_LOG_FILE_NAME;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        format!(
            "Oh no! promptbar has failed with the following app version and error.\n\nVersion: {}\nCommit: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            env!("VERGEN_GIT_DESCRIBE"),
            err
        )
        .red()
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

#[tokio::main]
async fn main() {
    better_panic::install();

    let debug_log_dir = Config::log_dir();

    let mut _guard = None;
    if !debug_log_dir.is_empty()
        && env::var("RUST_LOG")
            .unwrap_or_else(|_| return "".to_string())
            .contains("promptbar")
    {
        let file_appender = tracing_appender::rolling::never(debug_log_dir, DEBUG_LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        _guard = Some(guard);
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    if let Err(err) = cli::parse().await {
        drop(_guard);
        handle_error(err);
    }
}
