//! Command-line flag parsing.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

pub const USAGE: &str = "\
FixQuote - appliance repair quote calculator

Usage: fixquote --catalog <PATH> --quote <PATH> [OPTIONS]

Options:
      --catalog <PATH>   Catalog snapshot (JSON: { \"services\": [...], \"parts\": [...] })
      --quote <PATH>     Quote draft (JSON saved selection)
      --config <PATH>    Settings file (default: <config dir>/fixquote/fixquote.toml)
      --client <NAME>    Client name for the customer message
      --view <VIEW>      customer | technician | both
      --combo            Search for a combo discount and apply it if one is safe
      --work-order       Print the work-order record as JSON
  -h, --help             Show this help message";

/// Which summary to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Customer,
    Technician,
    #[default]
    Both,
}

impl View {
    pub fn shows_customer(&self) -> bool {
        matches!(self, View::Customer | View::Both)
    }

    pub fn shows_technician(&self) -> bool {
        matches!(self, View::Technician | View::Both)
    }
}

impl FromStr for View {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" | "client" => Ok(View::Customer),
            "technician" | "tech" => Ok(View::Technician),
            "both" | "all" => Ok(View::Both),
            other => Err(CliError::usage(format!(
                "Unknown view: '{}'. Valid options: customer, technician, both",
                other
            ))),
        }
    }
}

/// Parsed flags for a quote run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteArgs {
    pub catalog: PathBuf,
    pub quote: PathBuf,
    pub config: Option<PathBuf>,
    pub client: Option<String>,
    pub view: Option<View>,
    pub combo: bool,
    pub work_order: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quote(QuoteArgs),
}

/// Parses arguments, excluding the program name.
pub fn parse<I, S>(args: I) -> CliResult<Command>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut catalog = None;
    let mut quote = None;
    let mut config = None;
    let mut client = None;
    let mut view = None;
    let mut combo = false;
    let mut work_order = false;

    let mut args = args.into_iter().map(Into::into);
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| CliError::usage(format!("{} needs a value", flag)))
        };

        match arg.as_str() {
            "--catalog" => catalog = Some(PathBuf::from(value("--catalog")?)),
            "--quote" => quote = Some(PathBuf::from(value("--quote")?)),
            "--config" => config = Some(PathBuf::from(value("--config")?)),
            "--client" => client = Some(value("--client")?),
            "--view" => view = Some(value("--view")?.parse()?),
            "--combo" => combo = true,
            "--work-order" => work_order = true,
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(CliError::usage(format!("Unknown argument: {}", other))),
        }
    }

    Ok(Command::Quote(QuoteArgs {
        catalog: catalog.ok_or_else(|| CliError::usage("--catalog is required"))?,
        quote: quote.ok_or_else(|| CliError::usage("--quote is required"))?,
        config,
        client,
        view,
        combo,
        work_order,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_full_flag_set() {
        let cmd = parse([
            "--catalog", "cat.json", "--quote", "q.json", "--view", "tech", "--combo",
            "--work-order", "--client", "Ana",
        ])
        .unwrap();

        let Command::Quote(args) = cmd else {
            panic!("expected quote command");
        };
        assert_eq!(args.catalog, PathBuf::from("cat.json"));
        assert_eq!(args.quote, PathBuf::from("q.json"));
        assert_eq!(args.view, Some(View::Technician));
        assert_eq!(args.client.as_deref(), Some("Ana"));
        assert!(args.combo);
        assert!(args.work_order);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_help_wins() {
        assert_eq!(parse(["--quote", "q.json", "-h"]).unwrap(), Command::Help);
    }

    #[test]
    fn test_usage_errors() {
        for bad in [
            vec!["--quote", "q.json"],
            vec!["--catalog", "c.json"],
            vec!["--catalog"],
            vec!["--catalog", "c.json", "--quote", "q.json", "--view", "everyone"],
            vec!["--catalog", "c.json", "--quote", "q.json", "--verbose"],
        ] {
            let err = parse(bad).unwrap_err();
            assert_eq!(err.code(), ErrorCode::Usage);
        }
    }

    #[test]
    fn test_view_predicates() {
        assert!(View::Both.shows_customer() && View::Both.shows_technician());
        assert!(!View::Customer.shows_technician());
        assert!(!View::Technician.shows_customer());
    }
}
