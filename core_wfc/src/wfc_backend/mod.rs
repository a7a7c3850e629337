use crate::wfc_task::WfcTask;
use anyhow::Result;

pub use multi_threaded::MultiThreaded;
pub use single_threaded::SingleThreaded;

pub mod multi_threaded;
pub mod single_threaded;

/// Runs queued tasks to completion off the calling thread.
pub trait Backend {
    fn queue_task(&mut self, task: WfcTask) -> Result<()>;
    /// Blocks until a task finishes. Errors if every worker has stopped.
    fn wait_for_output(&mut self) -> Result<(WfcTask, Result<()>)>;
}
