mod bills;
mod containers;
mod core;
mod display;
mod dom;
mod init;
mod router;
mod server;
mod settings;
mod storage;
mod store;
mod views;

use std::sync::Arc;

use anyhow::Result;
use clap::{arg, Command};
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::settings::Settings;

static CLIENT_NAME: &str = "billed";

async fn run() -> Result<()> {
    let app = Command::new(CLIENT_NAME)
        .about("The billed utility lets employees submit expense reports and \
         administrators review them.")
        .version("0.1.0")
        .subcommand_required(true)
        .allow_external_subcommands(false)
        .arg(arg!(CONFIG: -c --config [FILE] "Sets a custom config file"))
        .arg(arg!(verbose: -v --verbose "Logs informational messages"))
        .subcommand(Command::new("init").about("Stores the session user for the application."))
        .subcommand(Command::new("serve").about("Serves the expense report application over HTTP."))
        .subcommand(Command::new("bills")
            .subcommand_required(true)
            .about("Inspects submitted bills.")
            .subcommand(Command::new("list")
                .about("Prints all bills from the store, earliest first.")));

    let matches = app.get_matches();

    let level = if matches.is_present("verbose") {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::new(matches.value_of("CONFIG"))?;

    match matches.subcommand() {
        Some(("init", _init_matches)) => {
            init::run(settings)?;
        }
        Some(("serve", _serve_matches)) => {
            let storage = Arc::new(storage::FileStorage::open(&settings.data_file)?);
            let store = store::from_settings(&settings)?;
            let router = router::Router::new(store, storage);
            server::serve(settings.listen.parse()?, router).await?;
        }
        Some(("bills", bills_matches)) => {
            bills::run(bills_matches, settings).await?;
        }
        None => unreachable!("subcommand is required"),
        _ => unreachable!(),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        println!("{:#}", err);
        std::process::exit(1);
    }
}
