// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use dotstrap::{
    config::Settings,
    link::{ask_operator, InquirePrompter},
    menu::{self, MenuChoice},
    path::default_config_path,
    setup_environment, Profile, ProgressFetcher, SetupContext,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "\n  dotstrap [options]\n  dotstrap [options] <dotstrap-command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Path to dotfiles source root.
    #[arg(short, long, global = true, value_name = "path")]
    pub dotfiles: Option<PathBuf>,

    /// Path to directory that links are placed into.
    #[arg(long, global = true, value_name = "path")]
    pub home: Option<PathBuf>,

    /// Run interactive menu when no command is given.
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    async fn run(self) -> Result<()> {
        let settings = self.settings()?;
        match self.command {
            None => run_menu(settings).await,
            Some(Command::Setup(opts)) => run_setup(settings, opts).await,
            Some(Command::Config) => run_config(settings),
        }
    }

    fn settings(&self) -> Result<Settings> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => default_config_path()?,
        };
        let mut settings = Settings::load(path)?;
        if let Some(dotfiles) = &self.dotfiles {
            settings.paths.dotfiles = Some(dotfiles.clone());
        }
        if let Some(home) = &self.home {
            settings.paths.home = Some(home.clone());
        }

        Ok(settings)
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Set up one environment profile without the menu.
    #[command(override_usage = "dotstrap setup [options] <profile>")]
    Setup(SetupOptions),

    /// Show effective configuration.
    #[command(override_usage = "dotstrap config [options]")]
    Config,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct SetupOptions {
    /// Profile to set up.
    #[arg(required = true, value_enum, value_name = "profile")]
    pub profile: Profile,
}

#[tokio::main]
async fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_default();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run().await {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

async fn run() -> Result<()> {
    Cli::parse().run().await
}

fn context(settings: Settings) -> SetupContext<InquirePrompter> {
    settings.apply_environment();
    SetupContext::new(settings, ProgressFetcher::new(), InquirePrompter::new())
}

async fn run_menu(settings: Settings) -> Result<()> {
    let mut ctx = context(settings);
    loop {
        println!("{}", menu::render());
        let Some(answer) = ask_operator("choice", "number of profile, or q to quit")? else {
            break;
        };
        match answer.parse::<MenuChoice>() {
            Ok(MenuChoice::Quit) => break,
            Ok(MenuChoice::Setup(profile)) => {
                setup_environment(profile, &mut ctx).await?;
                info!("{profile} environment is ready");
            }
            Err(err) => error!("{err}"),
        }
    }

    Ok(())
}

async fn run_setup(settings: Settings, opts: SetupOptions) -> Result<()> {
    let mut ctx = context(settings);
    setup_environment(opts.profile, &mut ctx).await?;
    info!("{} environment is ready", opts.profile);

    Ok(())
}

fn run_config(settings: Settings) -> Result<()> {
    print!("{settings}");
    Ok(())
}
