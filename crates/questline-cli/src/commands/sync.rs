//! Snapshot synchronization commands for CLI.

use clap::Subcommand;
use questline_core::{Config, Domain, HttpRemoteStore, SyncEngine, SyncQueue};

use super::profile::parse_domain;

#[derive(Subcommand)]
pub enum SyncAction {
    /// Push local snapshots to the remote store
    Push {
        /// Limit to one domain: tasks or fitness
        #[arg(long)]
        domain: Option<String>,
    },
    /// Pull remote snapshots and reconcile against local state
    Pull {
        /// Limit to one domain: tasks or fitness
        #[arg(long)]
        domain: Option<String>,
        /// Take the server copy even if local state is current
        #[arg(long)]
        force: bool,
    },
    /// Show sync status
    Status,
}

fn domains(filter: Option<String>) -> Result<Vec<Domain>, String> {
    match filter {
        Some(value) => Ok(vec![parse_domain(&value)?]),
        None => Ok(vec![Domain::Tasks, Domain::Fitness]),
    }
}

pub fn run(action: SyncAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut store = super::open_store(&config)?;
    let remote = HttpRemoteStore::new(config.sync.remote_url.clone());
    let engine = SyncEngine::new(remote, config.sync.retry_seconds);

    match action {
        SyncAction::Push { domain } => {
            for domain in domains(domain)? {
                let server_ts = engine.push(&mut store, domain)?;
                println!("Pushed {}: server at {server_ts}", domain.as_str());
            }
            store.persist()?;
        }
        SyncAction::Pull { domain, force } => {
            for domain in domains(domain)? {
                let action = engine.pull(&mut store, domain, force)?;
                println!("Pulled {}: {action:?}", domain.as_str());
            }
            store.persist()?;
        }
        SyncAction::Status => {
            let queue = SyncQueue::new(config.sync.debounce_seconds);
            let status = engine.status(&store, &queue);
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}
