//! Command handlers behind the `mealinsights` binary.
//!
//! Each handler runs one service operation and renders its result as the
//! string printed on stdout.

mod nutrition;
mod shopping;

use std::sync::Arc;

use clap::ValueEnum;
use mealinsights_shopping::{Presenter, ShoppingService};
use time::{Date, macros::format_description};

use crate::config::Config;
use crate::snapshot::Snapshot;

pub use nutrition::{nutrition, week};
pub use shopping::{preview, shopping_list, shopping_request};

pub type SnapshotService = ShoppingService<Arc<Snapshot>, Arc<Snapshot>, Arc<Snapshot>>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Loads the snapshot named by `snapshot_path` (or the configured one) and
/// wires it into every store slot of the service, prices included.
pub fn build_service(
    config: &Config,
    snapshot_path: Option<String>,
) -> anyhow::Result<SnapshotService> {
    let path = snapshot_path.unwrap_or_else(|| config.snapshot.path.to_owned());
    let snapshot = Arc::new(Snapshot::load(&path)?);

    Ok(
        ShoppingService::new(snapshot.clone(), snapshot.clone(), snapshot.clone())
            .with_cost_estimator(snapshot)
            .with_presenter(Presenter::new(config.shopping.display_precision)),
    )
}

/// Parses an ISO `YYYY-MM-DD` date argument.
pub fn parse_date(value: &str) -> Result<Date, String> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("invalid date '{value}': {e}"))
}
