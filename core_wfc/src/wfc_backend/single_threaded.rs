use super::Backend;
use crate::wfc_task::{Status, WfcTask};
use anyhow::{anyhow, Result};
use crossbeam::channel::{self, Receiver, Sender};
use std::thread;
use tracing::debug;

pub struct SingleThreaded {
    queue: Sender<WfcTask>,
    output: Receiver<(WfcTask, Result<()>)>,
}

impl Backend for SingleThreaded {
    fn queue_task(&mut self, task: WfcTask) -> Result<()> {
        self.queue.send(task)?;

        Ok(())
    }

    fn wait_for_output(&mut self) -> Result<(WfcTask, Result<()>)> {
        Ok(self.output.recv()?)
    }
}

impl SingleThreaded {
    pub fn new() -> Result<Self> {
        let (tx, rx) = channel::unbounded::<WfcTask>();
        let (output_tx, output_rx) = channel::unbounded();

        thread::Builder::new()
            .name("WFC CPU backend".to_string())
            .spawn(move || {
                while let Ok(mut task) = rx.recv() {
                    let task_result = Self::execute(&mut task);
                    if output_tx.send((task, task_result)).is_err() {
                        // receiver dropped, nobody is waiting for results
                        return;
                    }
                }
            })?;

        Ok(Self {
            queue: tx,
            output: output_rx,
        })
    }

    /// Runs `task` until it completes or fails.
    pub fn execute(task: &mut WfcTask) -> Result<()> {
        debug!("Executing task with seed {:x}", task.seed);
        match task.run() {
            Status::Completed => Ok(()),
            _ => {
                let seed = task.seed;
                Err(anyhow!(
                    "Ran out of backtracking attempts on seed {seed:x}"
                ))
            }
        }
    }
}
