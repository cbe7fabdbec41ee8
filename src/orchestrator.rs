//! # Fetch Orchestrator
//!
//! Runs one fetch worker per configured source and turns their outcomes into
//! the ordered list of addons that goes into the repository index.
//!
//! ## Rules
//!
//! - Every source gets its own worker thread; all workers run to completion
//!   before any result is looked at (a join barrier, not a race).
//! - Each worker stores its outcome in its own positional slot instead of
//!   raising it, so one failing addon cannot disturb the others mid-flight.
//! - Results are inspected in source-list order. The first failure by
//!   position aborts the build, wrapped in `Error::SourceFailed`; later
//!   results are discarded even if they succeeded.
//! - A slot left empty (the worker panicked) is a `WorkerContractViolation`.
//! - Two successful sources producing the same addon id abort the build with
//!   `DuplicateAddonId`.
//!
//! Nothing written by successful workers is rolled back on failure.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Mutex;

use log::{error, info};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::fetch;
use crate::git::GitOperations;
use crate::metadata::AddonMetadata;

/// Outcome of fetching one source.
pub type FetchResult = Result<AddonMetadata>;

/// Fetch every source concurrently into `output_root`.
///
/// `git` is only consulted for URL sources; pass `None` when there are none.
pub fn build<S: AsRef<str> + Sync>(
    sources: &[S],
    output_root: &Path,
    git: Option<&dyn GitOperations>,
) -> Result<Vec<AddonMetadata>> {
    let slots = run_workers(sources, output_root, git)?;
    let addons = collect_results(sources, slots)?;
    reject_duplicate_ids(&addons)?;
    Ok(addons)
}

/// Run one worker per source and return their positional slots.
fn run_workers<S: AsRef<str> + Sync>(
    sources: &[S],
    output_root: &Path,
    git: Option<&dyn GitOperations>,
) -> Result<Vec<Option<FetchResult>>> {
    if sources.is_empty() {
        return Ok(Vec::new());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(sources.len())
        .thread_name(|i| format!("addon-fetch-{}", i))
        .build()
        .map_err(|e| Error::WorkerContractViolation {
            message: format!("cannot start fetch workers: {}", e),
        })?;

    let slots: Vec<Mutex<Option<FetchResult>>> =
        sources.iter().map(|_| Mutex::new(None)).collect();

    pool.install(|| {
        sources
            .par_iter()
            .zip(slots.par_iter())
            .enumerate()
            .for_each(|(index, (source, slot))| {
                let location = source.as_ref();
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    fetch::fetch_source(location, output_root, git)
                }));
                match outcome {
                    Ok(result) => {
                        if let Ok(mut guard) = slot.lock() {
                            *guard = Some(result);
                        }
                    }
                    Err(_) => error!("Worker for source #{} ({}) panicked", index + 1, location),
                }
            });
    });

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.into_inner().map_err(|_| Error::WorkerContractViolation {
                message: format!("result slot of source #{} is poisoned", index + 1),
            })
        })
        .collect()
}

/// Turn the slots into addons, stopping at the first failure by position.
fn collect_results<S: AsRef<str>>(
    sources: &[S],
    slots: Vec<Option<FetchResult>>,
) -> Result<Vec<AddonMetadata>> {
    if slots.len() != sources.len() {
        return Err(Error::WorkerContractViolation {
            message: format!(
                "{} sources but {} worker results",
                sources.len(),
                slots.len()
            ),
        });
    }

    let mut addons = Vec::with_capacity(slots.len());
    for (index, (source, slot)) in sources.iter().zip(slots).enumerate() {
        let location = source.as_ref();
        match slot {
            None => {
                return Err(Error::WorkerContractViolation {
                    message: format!(
                        "worker for source #{} ({}) did not report a result",
                        index + 1,
                        location
                    ),
                })
            }
            Some(Err(e)) => {
                return Err(Error::SourceFailed {
                    index: index + 1,
                    location: location.to_string(),
                    source: Box::new(e),
                })
            }
            Some(Ok(metadata)) => {
                info!(
                    "Fetched {} {} from {}",
                    metadata.id, metadata.version, location
                );
                addons.push(metadata);
            }
        }
    }
    Ok(addons)
}

fn reject_duplicate_ids(addons: &[AddonMetadata]) -> Result<()> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, addon) in addons.iter().enumerate() {
        if let Some(first) = seen.insert(addon.id.as_str(), index) {
            return Err(Error::DuplicateAddonId {
                id: addon.id.clone(),
                first: first + 1,
                second: index + 1,
            });
        }
    }
    Ok(())
}
