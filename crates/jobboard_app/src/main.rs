mod browse;
mod config;
mod controller;
mod render;

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use board_logging::{board_info, LogDestination};
use clap::{Args, Parser, Subcommand};
use jobboard_core::{LoadStatus, Msg, RefreshPhase, Selection, SortColumn, SortDirection, SortOrder};
use jobboard_engine::{system_clock, EngineHandle, SitePublisher};
use log::LevelFilter;

use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};
use crate::controller::Controller;
use crate::render::{html, terminal};

#[derive(Debug, Parser)]
#[command(name = "jobboard", version, about = "Government job board viewer")]
struct Cli {
    /// RON configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Log debug output to the terminal.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the feed and print stats with one table page.
    Show(TableArgs),
    /// Print the source and qualification filter choices.
    Options,
    /// Write the filtered board as a static HTML page.
    Render {
        #[command(flatten)]
        table: TableArgs,
        /// Output directory.
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = html::DEFAULT_PAGE_FILE)]
        file: String,
    },
    /// Trigger the scraper if the data is stale, wait, and reload.
    Refresh,
    /// Interactive filter/sort/page prompt.
    Browse,
}

impl Command {
    /// Whether the command has nothing to do without loaded records.
    /// Refresh and browse can still recover from a failed first load.
    fn needs_board(&self) -> bool {
        matches!(
            self,
            Command::Show(_) | Command::Options | Command::Render { .. }
        )
    }
}

#[derive(Debug, Args)]
struct TableArgs {
    #[arg(long)]
    source: Option<String>,
    #[arg(long)]
    qualification: Option<String>,
    #[arg(long)]
    search: Option<String>,
    /// source, title, posts, qualification or last_date.
    #[arg(long)]
    sort: Option<SortColumn>,
    #[arg(long, requires = "sort")]
    ascending: bool,
    /// One-based page number.
    #[arg(long, default_value_t = 1)]
    page: usize,
}

impl TableArgs {
    fn messages(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        if let Some(source) = &self.source {
            msgs.push(Msg::SourceSelected(Selection::from_choice(source)));
        }
        if let Some(qualification) = &self.qualification {
            msgs.push(Msg::QualificationSelected(Selection::from_choice(
                qualification,
            )));
        }
        if let Some(search) = &self.search {
            msgs.push(Msg::SearchChanged(search.clone()));
        }
        if let Some(column) = self.sort {
            let direction = if self.ascending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
            msgs.push(Msg::SortChanged(SortOrder { column, direction }));
        }
        msgs.push(Msg::PageChanged(self.page.saturating_sub(1)));
        msgs
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?.with_env_token();
    init_logging(&config, cli.verbose);
    board_info!("jobboard starting with {:?}", cli.command);

    let engine = EngineHandle::new(config.engine_config());
    let mut controller = Controller::new(config.board.clone(), engine, system_clock());

    load_board(&mut controller, cli.command.needs_board())?;

    match cli.command {
        Command::Show(args) => {
            apply(&mut controller, args.messages());
            println!("{}", terminal::render_board(&controller.view()));
        }
        Command::Options => {
            print!("{}", terminal::render_options(&controller.view().options));
        }
        Command::Render { table, out, file } => {
            apply(&mut controller, table.messages());
            let generated_at = controller.now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
            let page = html::render_page(&controller.view(), &controller.all_rows(), &generated_at)
                .context("rendering board page")?;
            let path = SitePublisher::new(out)
                .publish(&file, &page)
                .context("writing board page")?;
            println!("Wrote {}", path.display());
        }
        Command::Refresh => {
            controller.refresh(|view| {
                if let Some(status) = terminal::render_refresh(&view.refresh) {
                    println!("{status}");
                }
            })?;
            print_alerts(&mut controller);
            if let RefreshPhase::Failed(err) = controller.state().refresh_phase() {
                bail!("refresh failed: {err}");
            }
            print!("{}", terminal::render_stats(&controller.view()));
        }
        Command::Browse => {
            let stdin = io::stdin();
            browse::run(&mut controller, stdin.lock(), io::stdout())?;
        }
    }
    Ok(())
}

/// Initial load. An empty board is fatal only when `required`.
fn load_board(controller: &mut Controller, required: bool) -> Result<()> {
    controller.load()?;
    print_alerts(controller);
    if let LoadStatus::Failed(err) = controller.state().load_status() {
        if required {
            bail!("{} ({err})", err.user_message());
        }
        eprintln!("{}", err.user_message());
    }
    Ok(())
}

fn apply(controller: &mut Controller, msgs: Vec<Msg>) {
    for msg in msgs {
        controller.dispatch(msg);
    }
}

fn print_alerts(controller: &mut Controller) {
    for alert in controller.take_alerts() {
        eprintln!("ALERT: {alert}");
    }
}

fn init_logging(config: &AppConfig, verbose: bool) {
    // The terminal shares stdout with the board, so it only gets warnings unless verbose.
    let (destination, level) = match (&config.log_file, verbose) {
        (Some(path), true) => (LogDestination::Both(path.clone()), LevelFilter::Debug),
        (Some(path), false) => (LogDestination::File(path.clone()), LevelFilter::Info),
        (None, true) => (LogDestination::Terminal, LevelFilter::Debug),
        (None, false) => (LogDestination::Terminal, LevelFilter::Warn),
    };
    board_logging::initialize(destination, level);
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use jobboard_core::{Msg, Selection, SortColumn, SortDirection, SortOrder};

    use super::{Cli, Command};

    #[test]
    fn show_arguments_become_messages() {
        let cli = Cli::parse_from([
            "jobboard",
            "show",
            "--source",
            "CareerPower",
            "--sort",
            "title",
            "--ascending",
            "--page",
            "2",
        ]);
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(
            args.messages(),
            vec![
                Msg::SourceSelected(Selection::Only("CareerPower".to_string())),
                Msg::SortChanged(SortOrder {
                    column: SortColumn::Title,
                    direction: SortDirection::Ascending
                }),
                Msg::PageChanged(1),
            ]
        );
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["jobboard", "options", "--config", "other.ron", "-v"]);
        assert_eq!(cli.config, std::path::PathBuf::from("other.ron"));
        assert!(cli.verbose);
    }

    #[test]
    fn only_board_commands_require_a_loaded_feed() {
        let parse = |args: &[&str]| Cli::parse_from(args).command;
        assert!(parse(&["jobboard", "show"]).needs_board());
        assert!(parse(&["jobboard", "options"]).needs_board());
        assert!(parse(&["jobboard", "render", "--out", "site"]).needs_board());
        assert!(!parse(&["jobboard", "refresh"]).needs_board());
        assert!(!parse(&["jobboard", "browse"]).needs_board());
    }
}
