use std::io::{BufRead, Write};

use anyhow::Result;
use jobboard_core::{AppViewModel, Msg, Selection, SortColumn, SortDirection, SortOrder};

use crate::controller::Controller;
use crate::render::terminal;

pub const HELP: &str = "\
Commands:
  source <name|all>        filter by source
  qual <name|all>          filter by qualification
  search <text>            free-text search (empty clears)
  clear                    reset every filter
  sort <column> [asc|desc] sort by source, title, posts, qual or date
  page <n> | next | prev   move between pages
  options                  list filter choices
  refresh                  smart refresh
  reload                   fetch the feed again
  help                     this text
  quit                     leave";

/// One line typed at the browse prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Source(Selection),
    Qualification(Selection),
    Search(String),
    Clear,
    Sort {
        column: SortColumn,
        direction: Option<SortDirection>,
    },
    /// One-based page number as typed.
    Page(usize),
    Next,
    Prev,
    Options,
    Refresh,
    Reload,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "source" => BrowseCommand::Source(Selection::from_choice(rest)),
        "qual" | "qualification" => BrowseCommand::Qualification(Selection::from_choice(rest)),
        "search" => BrowseCommand::Search(rest.to_string()),
        "clear" => BrowseCommand::Clear,
        "sort" => parse_sort(rest)?,
        "page" => {
            let page: usize = rest
                .parse()
                .map_err(|_| format!("page expects a number, got {rest:?}"))?;
            if page == 0 {
                return Err("pages start at 1".to_string());
            }
            BrowseCommand::Page(page)
        }
        "next" | "n" => BrowseCommand::Next,
        "prev" | "p" => BrowseCommand::Prev,
        "options" => BrowseCommand::Options,
        "refresh" => BrowseCommand::Refresh,
        "reload" => BrowseCommand::Reload,
        "help" | "?" => BrowseCommand::Help,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        "" => return Err("empty command".to_string()),
        other => return Err(format!("unknown command {other:?}; type help")),
    };
    Ok(command)
}

fn parse_sort(rest: &str) -> Result<BrowseCommand, String> {
    let mut parts = rest.split_whitespace();
    let column = parts
        .next()
        .ok_or_else(|| "sort expects a column".to_string())?
        .parse::<SortColumn>()?;
    let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
        None => None,
        Some("asc") => Some(SortDirection::Ascending),
        Some("desc") => Some(SortDirection::Descending),
        Some(other) => return Err(format!("unknown direction {other:?}")),
    };
    Ok(BrowseCommand::Sort { column, direction })
}

/// Message for a table command; re-sorting the current column flips it,
/// a new column starts ascending.
pub fn command_msg(command: &BrowseCommand, view: &AppViewModel) -> Option<Msg> {
    let msg = match command {
        BrowseCommand::Source(selection) => Msg::SourceSelected(selection.clone()),
        BrowseCommand::Qualification(selection) => Msg::QualificationSelected(selection.clone()),
        BrowseCommand::Search(query) => Msg::SearchChanged(query.clone()),
        BrowseCommand::Clear => Msg::FiltersCleared,
        BrowseCommand::Sort { column, direction } => {
            let direction = direction.unwrap_or(if *column == view.sort.column {
                match view.sort.direction {
                    SortDirection::Ascending => SortDirection::Descending,
                    SortDirection::Descending => SortDirection::Ascending,
                }
            } else {
                SortDirection::Ascending
            });
            Msg::SortChanged(SortOrder {
                column: *column,
                direction,
            })
        }
        BrowseCommand::Page(page) => Msg::PageChanged(page - 1),
        BrowseCommand::Next => Msg::PageChanged(view.table.page + 1),
        BrowseCommand::Prev => Msg::PageChanged(view.table.page.saturating_sub(1)),
        BrowseCommand::Reload => Msg::LoadRequested,
        BrowseCommand::Options
        | BrowseCommand::Refresh
        | BrowseCommand::Help
        | BrowseCommand::Quit => return None,
    };
    Some(msg)
}

/// Line-oriented loop over `input`, printing the board after every change.
pub fn run(controller: &mut Controller, input: impl BufRead, mut output: impl Write) -> Result<()> {
    writeln!(output, "{}", terminal::render_board(&controller.view()))?;
    writeln!(output, "Type help for commands.")?;
    prompt(&mut output)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            prompt(&mut output)?;
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(output, "{message}")?;
                prompt(&mut output)?;
                continue;
            }
        };

        match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => writeln!(output, "{HELP}")?,
            BrowseCommand::Options => {
                write!(output, "{}", terminal::render_options(&controller.view().options))?
            }
            BrowseCommand::Refresh => {
                let mut statuses = Vec::new();
                controller.refresh(|view| {
                    statuses.extend(terminal::render_refresh(&view.refresh));
                })?;
                for status in statuses {
                    writeln!(output, "{status}")?;
                }
                report_alerts(controller, &mut output)?;
                writeln!(output, "{}", terminal::render_board(&controller.view()))?;
            }
            other => {
                if let Some(msg) = command_msg(&other, &controller.view()) {
                    controller.dispatch(msg);
                    controller.settle(|_| {})?;
                }
                report_alerts(controller, &mut output)?;
                writeln!(output, "{}", terminal::render_board(&controller.view()))?;
            }
        }
        prompt(&mut output)?;
    }
    Ok(())
}

fn report_alerts(controller: &mut Controller, output: &mut impl Write) -> Result<()> {
    for alert in controller.take_alerts() {
        writeln!(output, "ALERT: {alert}")?;
    }
    Ok(())
}

fn prompt(output: &mut impl Write) -> Result<()> {
    write!(output, "jobboard> ")?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use jobboard_core::{
        AppViewModel, Msg, Selection, SortColumn, SortDirection, SortOrder,
    };
    use pretty_assertions::assert_eq;

    use super::{command_msg, parse_command, run, BrowseCommand};
    use crate::controller::tests::controller;

    /// Accepts output until a refresh progress line arrives.
    struct BrokenOnProgress(Vec<u8>);

    impl Write for BrokenOnProgress {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if String::from_utf8_lossy(buf).contains("Refresh [") {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn filter_commands_parse() {
        assert_eq!(
            parse_command("source CareerPower").unwrap(),
            BrowseCommand::Source(Selection::Only("CareerPower".to_string()))
        );
        assert_eq!(
            parse_command("qual all").unwrap(),
            BrowseCommand::Qualification(Selection::All)
        );
        assert_eq!(
            parse_command("  search  bank clerk ").unwrap(),
            BrowseCommand::Search("bank clerk".to_string())
        );
        assert_eq!(parse_command("search").unwrap(), BrowseCommand::Search(String::new()));
    }

    #[test]
    fn sort_and_page_commands_parse() {
        assert_eq!(
            parse_command("sort date desc").unwrap(),
            BrowseCommand::Sort {
                column: SortColumn::LastDate,
                direction: Some(SortDirection::Descending)
            }
        );
        assert_eq!(parse_command("page 3").unwrap(), BrowseCommand::Page(3));
        assert!(parse_command("page 0").is_err());
        assert!(parse_command("page two").is_err());
        assert!(parse_command("sort colour").is_err());
        assert!(parse_command("sort title sideways").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn sorting_same_column_flips_direction() {
        let view = AppViewModel::default();
        assert_eq!(view.sort.column, SortColumn::LastDate);

        let flipped = command_msg(
            &BrowseCommand::Sort {
                column: SortColumn::LastDate,
                direction: None,
            },
            &view,
        );
        assert_eq!(
            flipped,
            Some(Msg::SortChanged(SortOrder {
                column: SortColumn::LastDate,
                direction: SortDirection::Ascending
            }))
        );

        let fresh = command_msg(
            &BrowseCommand::Sort {
                column: SortColumn::Title,
                direction: None,
            },
            &view,
        );
        assert_eq!(
            fresh,
            Some(Msg::SortChanged(SortOrder {
                column: SortColumn::Title,
                direction: SortDirection::Ascending
            }))
        );
    }

    #[test]
    fn paging_is_one_based_at_the_prompt() {
        let view = AppViewModel::default();
        assert_eq!(
            command_msg(&BrowseCommand::Page(2), &view),
            Some(Msg::PageChanged(1))
        );
        assert_eq!(
            command_msg(&BrowseCommand::Prev, &view),
            Some(Msg::PageChanged(0))
        );
        assert_eq!(command_msg(&BrowseCommand::Quit, &view), None);
    }

    #[test]
    fn refresh_progress_is_printed() {
        let mut controller = controller();
        controller.load().unwrap();
        let mut output = Vec::new();

        run(&mut controller, "refresh\nquit\n".as_bytes(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Refresh [  0%]"));
        assert!(text.contains("Jobs refreshed."));
    }

    #[test]
    fn failed_progress_write_ends_the_session() {
        let mut controller = controller();
        controller.load().unwrap();

        let result = run(
            &mut controller,
            "refresh\nquit\n".as_bytes(),
            BrokenOnProgress(Vec::new()),
        );

        let err = result.unwrap_err();
        assert_eq!(
            err.downcast_ref::<io::Error>().map(io::Error::kind),
            Some(io::ErrorKind::BrokenPipe)
        );
    }
}
