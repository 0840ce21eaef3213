//! Batch ingestion of many law directories.
//!
//! Documents are independent: each is parsed with its own state on one of
//! a fixed number of scoped worker threads. A failing document produces an
//! error outcome and never affects any other document.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::error::{IngestError, Result};
use crate::slug::{find_slug_collisions, SlugCollision};
use crate::source::{law_directories, LawDirectory};
use crate::types::LawDocument;

/// Result of ingesting one law directory.
#[derive(Debug)]
pub struct BatchOutcome {
    pub dir: LawDirectory,
    pub result: Result<LawDocument>,
}

impl BatchOutcome {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    /// Successfully parsed laws.
    pub fn laws(&self) -> impl Iterator<Item = &LawDocument> + '_ {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
    }

    /// Failed directories with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&LawDirectory, &IngestError)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|e| (&outcome.dir, e)))
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.laws().count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Slugs shared by more than one successfully parsed law.
    #[must_use]
    pub fn slug_collisions(&self) -> Vec<SlugCollision> {
        find_slug_collisions(self.laws())
    }

    /// Successfully parsed laws with their output file stems.
    ///
    /// The stem is the slug, except for laws whose slug collides with
    /// another law's: those get `<slug>_<doknr>` so no export overwrites
    /// another.
    #[must_use]
    pub fn output_stems(&self) -> Vec<(&LawDocument, String)> {
        let collided: HashSet<String> = self
            .slug_collisions()
            .into_iter()
            .map(|collision| collision.slug)
            .collect();

        self.laws()
            .map(|law| {
                let slug = law.slug();
                let stem = if collided.contains(&slug) {
                    format!("{slug}_{}", law.doknr.to_lowercase())
                } else {
                    slug
                };
                (law, stem)
            })
            .collect()
    }
}

/// Number of workers used when none is requested.
#[must_use]
pub fn default_jobs() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn ingest_one(dir: LawDirectory) -> BatchOutcome {
    let result = dir.parse();

    match &result {
        Ok(law) => tracing::info!(
            dir = %dir.name(),
            doknr = %law.doknr,
            contents = law.contents.len(),
            "Ingested law"
        ),
        Err(e) => tracing::warn!(dir = %dir.name(), error = %e, "Failed to ingest law"),
    }

    BatchOutcome { dir, result }
}

/// Ingest law directories on `jobs` worker threads.
pub fn ingest_directories(dirs: Vec<LawDirectory>, jobs: usize) -> BatchReport {
    ingest_directories_with(dirs, jobs, |_| {})
}

/// Ingest law directories, calling `on_outcome` as each one finishes.
///
/// Outcomes in the report keep the input order regardless of completion
/// order.
pub fn ingest_directories_with<F>(dirs: Vec<LawDirectory>, jobs: usize, on_outcome: F) -> BatchReport
where
    F: Fn(&BatchOutcome) + Sync,
{
    let jobs = jobs.clamp(1, dirs.len().max(1));
    let next = AtomicUsize::new(0);
    let dirs = &dirs;
    let on_outcome = &on_outcome;
    let next = &next;

    let mut indexed: Vec<(usize, BatchOutcome)> = thread::scope(|scope| {
        let workers: Vec<_> = (0..jobs)
            .map(|_| {
                scope.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(dir) = dirs.get(index) else {
                            break;
                        };
                        let outcome = ingest_one(dir.clone());
                        on_outcome(&outcome);
                        done.push((index, outcome));
                    }
                    done
                })
            })
            .collect();

        workers
            .into_iter()
            .flat_map(|worker| match worker.join() {
                Ok(done) => done,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    });

    indexed.sort_by_key(|(index, _)| *index);
    BatchReport {
        outcomes: indexed.into_iter().map(|(_, outcome)| outcome).collect(),
    }
}

/// Ingest every law directory of a data directory.
pub fn ingest_data_dir(data_dir: &Path, jobs: usize) -> Result<BatchReport> {
    Ok(ingest_directories(law_directories(data_dir)?, jobs))
}
