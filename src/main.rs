// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2ghost::{
    publish_from_env, server, Command, CommandLineInput, ProcessEnvironment, PublishOutcome,
    PublishProgress, NOTHING_TO_PUBLISH_MESSAGE,
};
use std::fs;
use std::process::ExitCode;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion2ghost.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Prints a line per stage of a one-shot run.
struct ConsoleProgress;

impl PublishProgress for ConsoleProgress {
    fn fetching(&self) {
        println!("Fetching posts from Notion...");
    }

    fn found(&self, count: usize) {
        if count > 0 {
            println!("Found {} post(s) to publish. Publishing to Ghost...", count);
        }
    }

    fn finished(&self, outcome: PublishOutcome) {
        match outcome {
            PublishOutcome::NothingToPublish => println!("{}", NOTHING_TO_PUBLISH_MESSAGE),
            PublishOutcome::Published { count } => {
                log::info!("Created {} Ghost draft(s)", count);
                println!("Publishing complete.");
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = CommandLineInput::parse();

    if let Err(e) = setup_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match cli.command.unwrap_or(Command::Publish) {
        Command::Publish => match publish_from_env(&ProcessEnvironment, &ConsoleProgress).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                log::debug!("Publish failed: {:?}", e);
                eprintln!("Error while running Notion → Ghost publisher:");
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        Command::Serve { bind } => match server::serve(&bind).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Server error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}
