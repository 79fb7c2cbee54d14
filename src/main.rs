mod api;
mod cli;
mod commands;
mod credentials;
mod format;
mod messages;

use clap::{CommandFactory, Parser};
use log::LevelFilter;
use std::error::Error;
use std::io;
use std::process;

use api::KspClient;
use cli::{Cli, Command};
use commands::config::{get_settings_file, ClientConfig, Settings};
use commands::{generate, list, run, status, submit};
use credentials::Token;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = execute(cli).await {
        eprintln!("{}", e);
        process::exit(1);
    }
}

/// `--verbose` zapne debug log tohoto programu, `RUST_LOG` má přednost
fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("ksp_klient", level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

async fn execute(cli: Cli) -> Result<(), Box<dyn Error>> {
    let command = match cli.command {
        Some(command) => command,
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    let settings = Settings::load(&get_settings_file())?;
    let config = ClientConfig::resolve(cli.api_url, cli.training_ground, settings);
    let token = Token::load(&config.token_path)?;
    let client = KspClient::new(&config, token);

    let mut stdout = io::stdout();
    match command {
        Command::List => list::execute(&client, &mut stdout).await,
        Command::Status { task } => status::execute(&client, &task, &mut stdout).await,
        Command::Generate { task, subtask } => {
            generate::execute(&client, &task, subtask, &mut stdout).await
        }
        Command::Submit {
            task,
            subtask,
            file,
        } => submit::execute(&client, &task, subtask, &file, &mut stdout).await,
        Command::Run { task, solver } => run::execute(&client, &task, &solver, &mut stdout).await,
    }
}
