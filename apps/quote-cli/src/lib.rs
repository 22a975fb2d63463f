//! # fixquote CLI
//!
//! Loads settings, a catalog snapshot and a quote draft, runs the pricing
//! engine and prints the requested summaries.
//!
//! ## Run Sequence
//! 1. Parse flags
//! 2. Load settings (defaults → TOML → environment) and validate
//! 3. Load the draft, then the catalog scoped to the draft's equipment
//! 4. Compute totals; optionally search and apply a combo
//! 5. Render summaries and, on request, the work-order record

pub mod args;
pub mod error;
pub mod input;
pub mod report;
pub mod settings;

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use fixquote_core::combo::{suggest_combo, ComboSuggestion};
use fixquote_core::presentation::{CustomerSummary, TechnicianSummary};
use fixquote_core::pricing::compute_totals;
use fixquote_core::work_order::WorkOrderDraft;

use crate::args::{Command, QuoteArgs, USAGE};
use crate::error::CliResult;
use crate::settings::Settings;

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout stays clean for the report.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: `info,fixquote=debug`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fixquote=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the CLI and returns what should be printed on stdout.
pub fn run<I, S>(argv: I) -> CliResult<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    match args::parse(argv)? {
        Command::Help => Ok(USAGE.to_string()),
        Command::Quote(quote_args) => {
            let settings = Settings::load(quote_args.config.as_deref())?;
            quote(&quote_args, &settings)
        }
    }
}

/// Prices one draft with already-loaded settings.
pub fn quote(args: &QuoteArgs, settings: &Settings) -> CliResult<String> {
    let config = settings.pricing_config();
    debug!(?config, "Pricing configuration resolved");

    let mut selection = input::load_draft(&args.quote)?;
    let catalog = input::load_catalog(&args.catalog, selection.equipment())?;

    let totals = compute_totals(&selection, &catalog, &config);
    info!(
        equipment = totals.equipment.tag(),
        services = totals.services.len(),
        parts = totals.parts.len(),
        card = totals.card.cents(),
        real_profit = totals.real_profit.cents(),
        "Quote computed"
    );

    if args.combo {
        let suggestion = suggest_combo(&totals, &config);
        selection.record_suggestion(&suggestion);
        match suggestion {
            ComboSuggestion::Offer(offer) => {
                selection.activate_combo()?;
                info!(
                    discount_bps = offer.discount.bps(),
                    discounted_card = offer.discounted_card.cents(),
                    "Combo applied"
                );
            }
            ComboSuggestion::Rejected { reason } => {
                warn!(%reason, "No combo offered");
            }
        }
    }

    // --client wins over the draft header, which wins over settings.
    if let Some(name) = args
        .client
        .as_deref()
        .or(selection.header().client_name.as_deref())
        .or(settings.quote.client_name.as_deref())
    {
        let header = selection.header().clone().with_client_name(name);
        selection.set_header(header);
    }
    let client_name = selection.header().client_name.clone().unwrap_or_default();
    let view = args.view.unwrap_or(settings.quote.view);

    let mut out = Vec::new();
    if view.shows_customer() {
        let summary = CustomerSummary::from_totals(&totals, selection.combo(), &config);
        out.push(report::render_customer(&summary, &client_name));
    }
    if view.shows_technician() {
        let summary = TechnicianSummary::from_totals(&totals, selection.combo(), &config);
        if summary.effective.real_profit.is_negative() {
            warn!(
                real_profit = summary.effective.real_profit.cents(),
                "Quote loses money"
            );
        }
        out.push(report::render_technician(&summary));
    }
    if args.work_order {
        let record = WorkOrderDraft::from_totals(&selection, &totals)?;
        info!(work_order_id = %record.id, "Work-order record built");
        out.push(record.to_json()?);
    }

    Ok(out.join("\n"))
}
