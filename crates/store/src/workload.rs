use std::thread::{self, ScopedJoinHandle};

use tracing::{debug, info};

use crate::errors::StoreError;
use crate::store::{Lookup, SharedStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadConfig {
    pub workers: usize,
    pub key_base: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self { workers: 5, key_base: 1 }
    }
}

/// What one worker saved and read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: usize,
    pub key: u64,
    pub lookup: Lookup<u64>,
}

/// Spawn `config.workers` OS threads that each obtain the store through
/// `accessor`, save one entry under a worker-unique key and read it back.
/// Blocks until every worker finished; reports are ordered by worker index.
pub fn run_workers<'a, F>(config: WorkloadConfig, accessor: F) -> Result<Vec<WorkerReport>, StoreError>
where
    F: Fn() -> &'a SharedStore<u64> + Sync,
{
    if config.workers == 0 {
        return Err(StoreError::invalid_config("workers must be >= 1"));
    }
    if config.key_base.checked_add(config.workers as u64 - 1).is_none() {
        return Err(StoreError::invalid_config("key_base too large for worker count"));
    }
    info!(event = "workload_start", workers = config.workers, key_base = config.key_base, "starting workers");

    let accessor = &accessor;
    let reports = thread::scope(|s| {
        let mut handles = Vec::with_capacity(config.workers);
        let mut spawn_err = None;
        for worker in 0..config.workers {
            let key = config.key_base + worker as u64;
            let spawned = thread::Builder::new()
                .name(format!("store-worker-{worker}"))
                .spawn_scoped(s, move || {
                    let store = accessor();
                    store.save(key, format!("Data from worker {key}"));
                    let lookup = store.get(&key);
                    debug!(event = "worker_done", worker, %lookup);
                    WorkerReport { worker, key, lookup }
                });
            match spawned {
                Ok(handle) => handles.push((worker, handle)),
                Err(source) => {
                    spawn_err = Some(StoreError::Spawn { worker, source });
                    break;
                }
            }
        }

        join_workers(handles, spawn_err)
    })?;

    info!(event = "workload_done", workers = reports.len(), "all workers finished");
    Ok(reports)
}

/// Join every handle before reporting so no panicked thread is left for
/// `thread::scope` to re-raise. A spawn failure takes precedence over panics.
fn join_workers<'scope>(
    handles: Vec<(usize, ScopedJoinHandle<'scope, WorkerReport>)>,
    spawn_err: Option<StoreError>,
) -> Result<Vec<WorkerReport>, StoreError> {
    let joined: Vec<_> = handles
        .into_iter()
        .map(|(worker, handle)| handle.join().map_err(|_| StoreError::WorkerPanicked { worker }))
        .collect();
    match spawn_err {
        Some(err) => Err(err),
        None => joined.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_worker_reads_its_own_write() -> Result<(), anyhow::Error> {
        let store = SharedStore::<u64>::new();
        let reports = run_workers(WorkloadConfig { workers: 8, key_base: 100 }, || &store)?;

        assert_eq!(reports.len(), 8);
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(report.worker, i);
            assert_eq!(report.key, 100 + i as u64);
            assert_eq!(
                report.lookup.to_string(),
                format!("Data for Key {}: Data from worker {}", report.key, report.key)
            );
        }
        assert_eq!(store.len(), 8);
        Ok(())
    }

    #[test]
    fn zero_workers_is_rejected() {
        let store = SharedStore::<u64>::new();
        let err = run_workers(WorkloadConfig { workers: 0, key_base: 1 }, || &store).unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfig(_)));
    }

    #[test]
    fn key_range_overflow_is_rejected() {
        let store = SharedStore::<u64>::new();
        let err = run_workers(WorkloadConfig { workers: 2, key_base: u64::MAX }, || &store).unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfig(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn single_worker_may_use_the_last_key() -> Result<(), anyhow::Error> {
        let store = SharedStore::<u64>::new();
        let reports = run_workers(WorkloadConfig { workers: 1, key_base: u64::MAX }, || &store)?;
        assert_eq!(reports[0].key, u64::MAX);
        assert!(store.contains_key(&u64::MAX));
        Ok(())
    }

    #[test]
    fn panicking_worker_is_reported() {
        let err = run_workers(WorkloadConfig { workers: 1, key_base: 1 }, || -> &'static SharedStore<u64> {
            panic!("accessor failed")
        })
        .unwrap_err();
        assert!(matches!(err, StoreError::WorkerPanicked { worker: 0 }));
    }

    #[test]
    fn spawn_failure_is_returned_after_joining_started_workers() {
        let result = thread::scope(|s| {
            let panicked = s.spawn(|| -> WorkerReport { panic!("worker failed") });
            let spawn_err = StoreError::Spawn {
                worker: 1,
                source: std::io::Error::new(std::io::ErrorKind::WouldBlock, "no threads left"),
            };
            join_workers(vec![(0, panicked)], Some(spawn_err))
        });
        assert!(matches!(result, Err(StoreError::Spawn { worker: 1, .. })));
    }
}
