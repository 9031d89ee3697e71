//! Line commands for interactive browsing.

use crate::catalog::SortKey;
use crate::session::SessionStatus;
use crate::ui::browse::BrowseIntent;

pub const HELP: &str = "\
Commands:
  sort <newest|oldest|price-asc|price-desc>
  filter <min|-> <max|->     set a price range, '-' leaves a bound open
  clear                      remove the price filter
  page <n> | next | prev
  refresh
  session <authenticated|unauthenticated|loading>
  help
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Intent(BrowseIntent),
    /// Change the session status shown in the navigation bar.
    Session(SessionStatus),
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let parsed = match (command.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("sort", [key]) => {
            let sort = key.parse::<SortKey>().map_err(|e| e.to_string())?;
            ReplCommand::Intent(BrowseIntent::SetSort(sort))
        }
        ("filter", [min, max]) => ReplCommand::Intent(BrowseIntent::SetFilters {
            min_price: parse_bound(min)?,
            max_price: parse_bound(max)?,
        }),
        ("clear", []) => ReplCommand::Intent(BrowseIntent::ClearFilters),
        ("page", [n]) => {
            let page = n
                .parse::<u32>()
                .map_err(|_| format!("'{}' is not a page number", n))?;
            ReplCommand::Intent(BrowseIntent::SetPage(page))
        }
        ("next", []) => ReplCommand::Intent(BrowseIntent::NextPage),
        ("prev", []) => ReplCommand::Intent(BrowseIntent::PrevPage),
        ("refresh", []) => ReplCommand::Intent(BrowseIntent::Refresh),
        ("session", [status]) => {
            let status = status.parse::<SessionStatus>().map_err(|e| e.to_string())?;
            ReplCommand::Session(status)
        }
        ("help" | "?", []) => ReplCommand::Help,
        ("quit" | "exit" | "q", []) => ReplCommand::Quit,
        (other, _) => return Err(format!("unrecognized command '{}', try 'help'", other)),
    };
    Ok(Some(parsed))
}

fn parse_bound(raw: &str) -> Result<Option<f64>, String> {
    if raw == "-" {
        return Ok(None);
    }
    raw.trim_start_matches('$')
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("'{}' is not a price", raw))
}
