//! Per-invocation state: configuration, store location and ticket.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use warden_config::{Config, ResolvedConfig};
use warden_tickets::{Ticket, TicketAuthority, TicketEvaluator, ZoneRules};
use warden_vfs::Authority;

use crate::config_bridge;

pub(crate) struct Context {
    pub(crate) config: Config,
    /// Provenance, when loaded through the layered lookup.
    pub(crate) resolved: Option<ResolvedConfig>,
    pub(crate) store_path: PathBuf,
    pub(crate) ticket: Option<Ticket>,
}

impl Context {
    pub(crate) fn load(
        config_file: Option<&Path>,
        store: Option<PathBuf>,
        ticket: Option<&Path>,
    ) -> Result<Self> {
        let (config, resolved) = match config_file {
            Some(path) => (
                Config::load_file(path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None,
            ),
            None => {
                let workspace = std::env::current_dir().ok();
                let resolved =
                    Config::load(workspace.as_deref()).context("loading configuration")?;
                (resolved.config.clone(), Some(resolved))
            },
        };

        let ticket = ticket
            .map(|path| {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading ticket {}", path.display()))?;
                Ticket::from_json(&json)
                    .with_context(|| format!("parsing ticket {}", path.display()))
            })
            .transpose()?;

        let store_path = store.unwrap_or_else(|| PathBuf::from(&config.store.snapshot));
        Ok(Self {
            config,
            resolved,
            store_path,
            ticket,
        })
    }

    pub(crate) fn zones(&self) -> ZoneRules {
        config_bridge::to_zone_rules(&self.config)
    }

    pub(crate) fn evaluator(&self) -> TicketEvaluator {
        TicketEvaluator::new(self.zones())
    }

    /// The ticket authority, when a ticket was given.
    pub(crate) fn authority(&self) -> Option<Arc<dyn Authority>> {
        self.ticket.as_ref().map(|ticket| {
            Arc::new(TicketAuthority::new(ticket.clone(), self.evaluator())) as Arc<dyn Authority>
        })
    }

    pub(crate) fn require_ticket(&self) -> Result<&Ticket> {
        match &self.ticket {
            Some(ticket) => Ok(ticket),
            None => bail!("this command needs --ticket"),
        }
    }
}
