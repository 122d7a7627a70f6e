use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FsEvent {
    /// A new entry appeared in a watched directory, either created there or renamed into it.
    Created(PathBuf),
    /// An entry (possibly a watched directory itself) was removed.
    Removed(PathBuf),
    /// The notification backend dropped events.
    Overflow,
}

/// Subscription to creation events of a set of directories.
pub trait EventSource {
    fn watch(&mut self, directory: &Path) -> crate::Result<()>;

    fn unwatch(&mut self, directory: &Path);

    /// Waits until at least one event is available and returns everything that is queued.
    /// Returns `None` when no more events will ever arrive.
    ///
    /// The returned future is cancel safe.
    fn next_batch(&mut self) -> Pin<Box<dyn Future<Output = Option<Vec<FsEvent>>> + '_>>;
}

/// [`EventSource`] backed by the native notification facility of the OS.
///
/// The backend invokes its callback on its own thread; events are only forwarded into a channel
/// there and consumed by the loop that owns this source.
pub struct NotifySource {
    watcher: RecommendedWatcher,
    receiver: UnboundedReceiver<notify::Result<Event>>,
}

impl NotifySource {
    pub fn new() -> crate::Result<Self> {
        let (sender, receiver) = unbounded_channel();
        let watcher = notify::recommended_watcher(move |event| {
            let _ = sender.send(event);
        })?;
        Ok(Self { watcher, receiver })
    }
}

impl EventSource for NotifySource {
    fn watch(&mut self, directory: &Path) -> crate::Result<()> {
        self.watcher.watch(directory, RecursiveMode::NonRecursive)?;
        Ok(())
    }

    fn unwatch(&mut self, directory: &Path) {
        if let Err(error) = self.watcher.unwatch(directory) {
            log::debug!("Cannot unwatch {}: {error}", directory.display());
        }
    }

    fn next_batch(&mut self) -> Pin<Box<dyn Future<Output = Option<Vec<FsEvent>>> + '_>> {
        Box::pin(async move {
            let first = self.receiver.recv().await?;
            let mut batch = Vec::new();
            translate_event(first, &mut batch);
            while let Ok(event) = self.receiver.try_recv() {
                translate_event(event, &mut batch);
            }
            Some(batch)
        })
    }
}

fn translate_event(event: notify::Result<Event>, batch: &mut Vec<FsEvent>) {
    let event = match event {
        Ok(event) => event,
        Err(error) => {
            log::warn!("Directory watch error: {error}");
            return;
        }
    };
    if event.need_rescan() {
        batch.push(FsEvent::Overflow);
        return;
    }
    match event.kind {
        EventKind::Create(CreateKind::Folder) => {}
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            batch.extend(event.paths.into_iter().map(FsEvent::Created));
        }
        EventKind::Remove(_) => {
            batch.extend(event.paths.into_iter().map(FsEvent::Removed));
        }
        _ => {}
    }
}
