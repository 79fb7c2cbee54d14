//! Definice příkazové řádky.
//!
//! Nápověda clapu je přeložená přes katalog v `messages`: vlastní šablona
//! nápovědy, vlastní přepínač `-h/--help` a české nadpisy skupin argumentů.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::messages::{example_usage, text, Msg};

#[derive(Parser, Debug)]
#[command(
    name = "ksp-klient",
    about = text(Msg::AppAbout),
    help_template = text(Msg::HelpTemplate),
    disable_help_flag = true,
    disable_help_subcommand = true,
    subcommand_help_heading = text(Msg::SubcommandHeading),
    next_help_heading = text(Msg::OptionsHeading)
)]
pub struct Cli {
    #[allow(dead_code)]
    #[arg(short, long, global = true, action = ArgAction::Help, help = text(Msg::HelpFlag))]
    help: Option<bool>,

    #[arg(short, long, help = text(Msg::VerboseFlag))]
    pub verbose: bool,

    #[arg(short = 'c', long = "cviciste", help = text(Msg::TrainingGroundFlag))]
    pub training_ground: bool,

    #[arg(short, long, help = text(Msg::ApiUrlFlag))]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    #[command(
        about = text(Msg::ListAbout),
        help_template = text(Msg::HelpTemplate),
        disable_help_flag = true,
        next_help_heading = text(Msg::OptionsHeading),
        after_help = example_usage("ksp-klient list")
    )]
    List,

    #[command(
        about = text(Msg::StatusAbout),
        help_template = text(Msg::HelpTemplate),
        disable_help_flag = true,
        next_help_heading = text(Msg::OptionsHeading),
        after_help = example_usage("ksp-klient status 32-Z4-1")
    )]
    Status {
        #[arg(help = text(Msg::TaskArg), help_heading = text(Msg::PositionalHeading))]
        task: String,
    },

    #[command(
        about = text(Msg::GenerateAbout),
        help_template = text(Msg::HelpTemplate),
        disable_help_flag = true,
        next_help_heading = text(Msg::OptionsHeading),
        after_help = example_usage("ksp-klient generate 32-Z4-1 1")
    )]
    Generate {
        #[arg(help = text(Msg::TaskArg), help_heading = text(Msg::PositionalHeading))]
        task: String,
        #[arg(help = text(Msg::SubtaskArg), help_heading = text(Msg::PositionalHeading))]
        subtask: u32,
    },

    #[command(
        about = text(Msg::SubmitAbout),
        help_template = text(Msg::HelpTemplate),
        disable_help_flag = true,
        next_help_heading = text(Msg::OptionsHeading),
        after_help = example_usage("ksp-klient submit 32-Z4-1 1 01.out")
    )]
    Submit {
        #[arg(help = text(Msg::TaskArg), help_heading = text(Msg::PositionalHeading))]
        task: String,
        #[arg(help = text(Msg::SubtaskArg), help_heading = text(Msg::PositionalHeading))]
        subtask: u32,
        #[arg(help = text(Msg::FileArg), help_heading = text(Msg::PositionalHeading))]
        file: PathBuf,
    },

    #[command(
        about = text(Msg::RunAbout),
        help_template = text(Msg::HelpTemplate),
        disable_help_flag = true,
        next_help_heading = text(Msg::OptionsHeading),
        after_help = example_usage("ksp-klient run 32-Z4-1 python3 solver.py")
    )]
    Run {
        #[arg(help = text(Msg::TaskArg), help_heading = text(Msg::PositionalHeading))]
        task: String,
        #[arg(
            help = text(Msg::SolverArg),
            help_heading = text(Msg::PositionalHeading),
            required = true,
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        solver: Vec<String>,
    },
}
