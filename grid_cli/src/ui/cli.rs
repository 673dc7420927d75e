use anyhow::Context;
use clap::{Parser, Subcommand};
use grid_core::metadata::{HttpMetadataRegistry, MetadataFetcher};
use grid_core::transfer::{submit_transfer, AmountBounds};
use grid_core::{Address, Client, ConnectionStore, GridConfig, GridContext, MemoryBridge};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use super::render::{render_profile, render_state};
use super::script::SessionScript;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "grid", version, subcommand_required = true)]
pub struct Args {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a transfer amount against the configured bounds
    Validate {
        /// Amount as typed by the user, e.g. 12.5
        amount: String,
    },
    /// Resolve and show the profile published for an address
    Profile {
        address: Address,
    },
    /// Replay a recorded provider session and print every published state
    Simulate {
        /// JSON session script
        script: PathBuf,
    },
}

pub async fn run_cli(args: Args) -> anyhow::Result<()> {
    let config = GridConfig::load_or_default(args.config.as_deref())
        .context("loading configuration")?;

    match args.command {
        Command::Validate { amount } => run_validate(&config, &amount),
        Command::Profile { address } => run_profile(&config, address).await,
        Command::Simulate { script } => run_simulate(&config, SessionScript::load(&script)?).await,
    }
}

fn run_validate(config: &GridConfig, amount: &str) -> anyhow::Result<()> {
    let bounds = config.amount_bounds()?;
    match bounds.parse(amount) {
        Ok(accepted) => println!("Accepted: {} {}", accepted, bounds.symbol()),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

async fn run_profile(config: &GridConfig, address: Address) -> anyhow::Result<()> {
    let registry = HttpMetadataRegistry::new(config.metadata_registry_url.clone());
    let mut fetcher = MetadataFetcher::new(
        registry,
        config.ipfs_gateway.clone(),
        config.profile_defaults.clone(),
    );
    let record = fetcher.on_address_change(Some(&address)).await;
    println!("{}", render_profile(record));
    Ok(())
}

/// Runs a scripted session.
///
/// Opens the store over an in-memory provider seeded from the script, prints
/// the state after initialisation and after every replayed event, applies the
/// optional selection and transfer, then closes the scope.
async fn run_simulate(config: &GridConfig, script: SessionScript) -> anyhow::Result<()> {
    let bounds = config.amount_bounds()?;
    let bridge = (!script.no_provider).then(|| {
        Arc::new(MemoryBridge::new(
            script.chain_id,
            script.accounts.clone(),
            script.context_accounts.clone(),
        ))
    });
    let client: Option<Client> = bridge.clone().map(|b| b as Client);

    let context = GridContext::new(ConnectionStore::open(client));
    let result = replay(&context, bridge.as_deref(), &bounds, script).await;
    // Close on every path, including a failed replay.
    context.close();
    info!("Session closed.");
    result
}

async fn replay(
    context: &GridContext,
    bridge: Option<&MemoryBridge>,
    bounds: &AmountBounds,
    script: SessionScript,
) -> anyhow::Result<()> {
    let grid = context.use_grid()?;
    grid.wait_initialized().await;
    println!("init    {}", render_state(&grid.state()));

    if let Some(bridge) = bridge {
        for event in script.events {
            let name = event.kind();
            bridge.emit(event);
            println!("{:<7} {}", "event", render_state(&grid.state()));
            info!("Replayed {}", name);
        }
    }

    if let Some(address) = script.select {
        grid.set_selected_address(Some(address));
        println!("select  {}", render_state(&grid.state()));
    }

    if let Some(input) = script.transfer {
        let amount = match bounds.parse(&input) {
            Ok(amount) => amount,
            Err(e) => {
                println!("transfer rejected: {}", e);
                return Ok(());
            }
        };
        match submit_transfer(grid.client().as_ref(), &grid.state(), &amount).await? {
            Some(tx_hash) => println!("sent {} {}: {}", amount, bounds.symbol(), tx_hash),
            None => println!("transfer skipped: not connected"),
        }
    }
    Ok(())
}
