pub mod dispatch;
pub mod event;
pub mod process;
pub mod registry;

pub use dispatch::{JOB_ERROR_MESSAGE, JobDispatcher, JobOutcome};
pub use event::{EventSource, FsEvent, NotifySource};
pub use process::{FolderWatcher, WatchOptions, WatcherState, WatcherStats};
