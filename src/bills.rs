use anyhow::Result;
use clap::ArgMatches;
use tracing::info;

use crate::display::print_bills;
use crate::settings::Settings;

#[tracing::instrument(skip(settings))]
async fn list(settings: Settings) -> Result<()> {
    let store = crate::store::from_settings(&settings)?;
    let bills = store.list().await?;
    info!(count = bills.len(), "listing bills");

    print_bills(std::io::stdout(), &bills)
}

pub(crate) async fn run(matches: &ArgMatches, settings: Settings) -> Result<()> {
    match matches.subcommand() {
        Some(("list", _list_matches)) => list(settings).await,
        None => unreachable!("command is required"),
        _ => unreachable!(),
    }
}
