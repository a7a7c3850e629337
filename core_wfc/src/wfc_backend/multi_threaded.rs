use super::{Backend, SingleThreaded};
use crate::wfc_task::WfcTask;
use anyhow::Result;
use crossbeam::{
    channel::{self, Receiver, Sender},
    queue::SegQueue,
};
use std::{sync::Arc, thread};

/// Pool of workers sharing one task queue. Results arrive in completion order.
pub struct MultiThreaded {
    queue: Arc<SegQueue<WfcTask>>,
    update_channel: Sender<()>,
    output: Receiver<(WfcTask, Result<()>)>,
}

impl Backend for MultiThreaded {
    fn queue_task(&mut self, task: WfcTask) -> Result<()> {
        self.queue.push(task);
        self.update_channel.send(())?;

        Ok(())
    }

    fn wait_for_output(&mut self) -> Result<(WfcTask, Result<()>)> {
        Ok(self.output.recv()?)
    }
}

impl MultiThreaded {
    pub fn new(num_threads: usize) -> Result<Self> {
        let queue = Arc::new(SegQueue::new());
        let (tx, rx) = channel::unbounded();
        let (output_tx, output_rx) = channel::unbounded();

        for index in 0..num_threads.max(1) {
            let queue: Arc<SegQueue<WfcTask>> = queue.clone();
            let rx: Receiver<()> = rx.clone();
            let output_tx = output_tx.clone();

            thread::Builder::new()
                .name(format!("WFC multi threaded CPU backend {index}"))
                .spawn(move || {
                    while let Ok(()) = rx.recv() {
                        if let Some(mut task) = queue.pop() {
                            let task_result = SingleThreaded::execute(&mut task);
                            if output_tx.send((task, task_result)).is_err() {
                                // channel is closed, stop execution
                                return;
                            }
                        }
                    }
                })?;
        }

        Ok(Self {
            queue,
            update_channel: tx,
            output: output_rx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        tileset::{BaseTile, TileSet},
        wfc_task::{Status, WfcSettings},
    };

    #[test]
    fn runs_every_queued_task() {
        let tileset = Arc::new(
            TileSet::new(&[
                BaseTile::new("Water", ["w", "w", "w", "w"], 1.0),
                BaseTile::new("Coast", ["w", "c", "l", "c"], 1.0),
                BaseTile::new("Land", ["l", "l", "l", "l"], 1.0),
            ])
            .unwrap(),
        );
        let mut backend = MultiThreaded::new(3).unwrap();
        for seed in 0..6 {
            let settings = WfcSettings {
                seed: Some(seed),
                ..Default::default()
            };
            backend
                .queue_task(WfcTask::new(5, tileset.clone(), settings).unwrap())
                .unwrap();
        }

        let mut seeds = Vec::new();
        for _ in 0..6 {
            let (task, result) = backend.wait_for_output().unwrap();
            result.unwrap();
            assert_eq!(task.status(), Status::Completed);
            assert!(task.validate().is_ok());
            seeds.push(task.seed);
        }
        seeds.sort();
        assert_eq!(seeds, (0..6).collect::<Vec<_>>());
    }
}
