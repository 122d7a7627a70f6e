use crate::common::Map;
use crate::common::utils::fs::{has_temporary_suffix, modification_time};
use crate::watch::dispatch::{JobDispatcher, JobOutcome};
use crate::watch::event::{EventSource, FsEvent};
use crate::watch::registry::Registrations;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::pin;
use std::time::{Duration, SystemTime};
use tokio::time::{Instant, Interval, MissedTickBehavior};

pub const DEFAULT_TEMP_SUFFIX: &str = ".tmp";

#[derive(Clone, Debug)]
pub struct WatchOptions {
    pub input_dir: PathBuf,
    /// Files whose name ends with this suffix are never submitted.
    pub temp_suffix: String,
    /// Period of the reconciliation scan, if enabled.
    pub rescan_interval: Option<Duration>,
    /// Dispatch inputs that already exist when the watcher starts.
    pub scan_existing: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Dispatching,
    Terminated,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct WatcherStats {
    pub finished: usize,
    pub failed: usize,
    pub ignored: usize,
}

enum Wakeup {
    Events(Option<Vec<FsEvent>>),
    Rescan,
    Interrupted,
}

/// Watches directories for new input files and submits each of them as a job.
///
/// Everything runs on the task that calls [`FolderWatcher::run`]; a slow submission delays the
/// processing of all files created after it.
pub struct FolderWatcher<S> {
    source: S,
    registrations: Registrations,
    dispatcher: JobDispatcher,
    options: WatchOptions,
    state: WatcherState,
    stats: WatcherStats,
    /// Inputs dispatched by the last reconciliation scan, with their mtime at that point.
    /// A creation event that arrives late for one of them is dropped.
    scanned: Map<PathBuf, Option<SystemTime>>,
}

impl<S: EventSource> FolderWatcher<S> {
    pub fn new(
        mut source: S,
        dispatcher: JobDispatcher,
        options: WatchOptions,
    ) -> crate::Result<Self> {
        let mut registrations = Registrations::default();
        registrations.register(&mut source, &options.input_dir)?;
        Ok(Self {
            source,
            registrations,
            dispatcher,
            options,
            state: WatcherState::Idle,
            stats: WatcherStats::default(),
            scanned: Map::new(),
        })
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    pub fn registrations(&self) -> &Registrations {
        &self.registrations
    }

    /// Processes events until all watched directories disappear, the event source is closed
    /// or `interrupt` resolves. An interrupt never cancels a submission that is in flight.
    pub async fn run<F: Future<Output = ()>>(&mut self, interrupt: F) -> WatcherStats {
        let mut interrupt = pin!(interrupt);
        let mut rescan = self.options.rescan_interval.map(|period| {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        if self.options.scan_existing {
            self.reconcile().await;
        }

        while self.state != WatcherState::Terminated {
            self.state = WatcherState::Idle;
            let wakeup = tokio::select! {
                events = self.source.next_batch() => Wakeup::Events(events),
                _ = next_tick(&mut rescan) => Wakeup::Rescan,
                _ = &mut interrupt => Wakeup::Interrupted,
            };

            match wakeup {
                Wakeup::Events(Some(events)) => self.process_events(events).await,
                Wakeup::Events(None) => {
                    log::info!("Event source was closed");
                    self.state = WatcherState::Terminated;
                }
                Wakeup::Rescan => {
                    log::debug!("Periodic rescan");
                    self.reconcile().await;
                }
                Wakeup::Interrupted => {
                    log::info!("Interrupted, stopping the watcher");
                    self.state = WatcherState::Terminated;
                }
            }
            self.reset();
        }

        log::info!(
            "Watcher terminated: {} job(s) finished, {} failed, {} file(s) ignored",
            self.stats.finished,
            self.stats.failed,
            self.stats.ignored
        );
        self.stats.clone()
    }

    async fn process_events(&mut self, events: Vec<FsEvent>) {
        let mut overflow = false;
        for event in events {
            match event {
                FsEvent::Created(path) => {
                    if self.registrations.find_parent(&path).is_none() {
                        log::error!("Watch key not recognized for {}", path.display());
                        continue;
                    }
                    self.handle_new_file(&path, false).await;
                }
                FsEvent::Removed(path) => {
                    if let Some(key) = self.registrations.find(&path) {
                        log::warn!("Watched directory {} was removed", path.display());
                        self.registrations.remove(&mut self.source, key);
                    }
                }
                FsEvent::Overflow => overflow = true,
            }
        }
        if overflow {
            log::warn!("Directory events were lost, rescanning watched directories");
            self.reconcile().await;
        }
    }

    /// Dispatches every input of the watched directories that does not have an up to date output.
    async fn reconcile(&mut self) {
        self.scanned.clear();
        let directories: Vec<PathBuf> = self
            .registrations
            .directories()
            .map(|dir| dir.to_path_buf())
            .collect();
        for directory in directories {
            let mut entries = match read_directory(&directory) {
                Ok(entries) => entries,
                Err(error) => {
                    log::error!("Cannot scan {}: {error}", directory.display());
                    continue;
                }
            };
            entries.sort();
            for path in entries {
                self.handle_new_file(&path, true).await;
            }
        }
    }

    async fn handle_new_file(&mut self, path: &Path, from_scan: bool) {
        let Some(name) = path.file_name() else {
            return;
        };
        if has_temporary_suffix(name, &self.options.temp_suffix) {
            if !from_scan {
                log::debug!("Ignoring temporary file {}", path.display());
                self.stats.ignored += 1;
            }
            return;
        }
        if path.is_dir() {
            log::debug!("Ignoring directory {}", path.display());
            return;
        }
        if from_scan {
            if self.dispatcher.is_processed(path, name) {
                log::debug!("{} was already processed", path.display());
                return;
            }
            self.scanned.insert(path.to_path_buf(), modification_time(path));
        } else if let Some(scanned_mtime) = self.scanned.remove(path) {
            if scanned_mtime.is_some() && scanned_mtime == modification_time(path) {
                log::debug!("{} was already processed by a rescan", path.display());
                return;
            }
        }

        self.state = WatcherState::Dispatching;
        log::info!("Processing {}...", name.to_string_lossy());
        match self.dispatcher.process_job(path, name).await {
            JobOutcome::Finished => self.stats.finished += 1,
            JobOutcome::Failed | JobOutcome::NotWritten => self.stats.failed += 1,
        }
        self.state = WatcherState::Idle;
    }

    fn reset(&mut self) {
        for directory in self.registrations.reset(&mut self.source) {
            log::warn!("Directory {} is no longer accessible", directory.display());
        }
        if self.registrations.is_empty() {
            if self.state != WatcherState::Terminated {
                log::info!("All watched directories are inaccessible");
            }
            self.state = WatcherState::Terminated;
        }
    }
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn read_directory(directory: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    Ok(paths)
}
