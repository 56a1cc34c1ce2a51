//! The enrichment pass: index, locate, expand, summarize.
//!
//! The index is built from the catalog before any whitelist changes, so
//! expansions never feed back into the caliber groups. Mutations happen in
//! place and are not rolled back if a later item fails.

use crate::catalog::{AmmoIndex, Catalog};
use crate::config::PassConfig;
use crate::whitelist::{self, Whitelist, WhitelistLocation, locate_whitelists};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, info_span};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Counters reported at the end of a pass.
pub struct PassSummary {
    /// Whitelists that received at least one new id.
    pub whitelists_touched: usize,
    pub identifiers_added: usize,
    pub known_ammo_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    Completed(PassSummary),
    /// The pass aborted; mutations made before the failure stay applied.
    Failed(String),
}

impl PassOutcome {
    pub fn summary(&self) -> Option<&PassSummary> {
        match self {
            PassOutcome::Completed(summary) => Some(summary),
            PassOutcome::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PassOutcome::Failed(_))
    }
}

/// Run the pass over `catalog`, mutating its whitelists in place.
///
/// Expected gaps (items without properties, non-ammo whitelists, empty
/// catalogs) are not errors. Errors here mean the catalog changed shape under
/// the pass or an id could not be written in the collection's representation.
pub fn run_pass(catalog: &mut Catalog, config: &PassConfig) -> Result<PassSummary> {
    let span = info_span!("caliber_pass", items = catalog.len(), dry_run = config.dry_run);
    let _entered = span.enter();

    let index = AmmoIndex::build(catalog, &config.fields);
    let mut summary = PassSummary {
        known_ammo_count: index.len(),
        ..PassSummary::default()
    };
    if index.is_empty() {
        info!("no ammunition found in catalog; skipping whitelist expansion");
        return Ok(summary);
    }

    for (item_id, record) in catalog.iter_mut() {
        let locations: Vec<WhitelistLocation> =
            locate_whitelists(record, &config.fields).collect();
        for location in locations {
            let elements = location.resolve_mut(record).with_context(|| {
                format!(
                    "whitelist {} on item {item_id} is no longer an array",
                    location.pointer()
                )
            })?;
            let mut list = Whitelist::new(elements, &config.fields.wrapped_id);
            let plan = whitelist::plan(&list, &index);
            let added = if config.dry_run {
                plan.missing.len()
            } else {
                whitelist::apply(&mut list, &plan, &config.default_id_repr).with_context(
                    || format!("expanding whitelist {} on item {item_id}", location.pointer()),
                )?
            };
            if added == 0 {
                continue;
            }
            summary.whitelists_touched += 1;
            summary.identifiers_added += added;
            debug!(
                item = %item_id,
                pointer = location.pointer(),
                calibers = ?plan.implied.iter().map(|c| c.display()).collect::<Vec<_>>(),
                added,
                "expanded whitelist"
            );
        }
    }

    info!(
        whitelists_touched = summary.whitelists_touched,
        identifiers_added = summary.identifiers_added,
        known_ammo = summary.known_ammo_count,
        "caliber pass complete"
    );
    Ok(summary)
}

/// Host-facing handle for a single pass.
///
/// Holds exclusive access to the catalog for the duration of [`execute`],
/// which consumes the runner so nothing keeps the catalog borrowed afterwards.
///
/// [`execute`]: PassRunner::execute
pub struct PassRunner<'a> {
    catalog: &'a mut Catalog,
    config: &'a PassConfig,
}

impl<'a> PassRunner<'a> {
    pub fn new(catalog: &'a mut Catalog, config: &'a PassConfig) -> Self {
        Self { catalog, config }
    }

    /// Run the pass, turning any error or panic into a single failure report.
    pub fn execute(self) -> PassOutcome {
        let PassRunner { catalog, config } = self;
        match panic::catch_unwind(AssertUnwindSafe(|| run_pass(catalog, config))) {
            Ok(Ok(summary)) => PassOutcome::Completed(summary),
            Ok(Err(err)) => {
                let message = format!("{err:#}");
                error!(error = %message, "caliber pass failed");
                PassOutcome::Failed(message)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(error = %message, "caliber pass panicked");
                PassOutcome::Failed(message)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown panic".to_string()
}
