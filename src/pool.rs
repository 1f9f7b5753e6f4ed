//! A pool of worker threads, each fed through its own channel.
//!
//! Workers are spawned inside a crossbeam scope and live until their
//! task channel is closed, which happens when the pool is dropped.
//! Every worker replies on one shared channel, tagging each row with
//! its own id so the coordinator knows whom to reassign.  A channel
//! preserves order, so each worker's replies arrive in the order it
//! produced them.

extern crate crossbeam;

use crossbeam::channel::{self, Receiver, Sender};
use crossbeam::thread::Scope;

use coordinator::{Dispatcher, WorkerId};
use row::{compute_row, RowResult, RowTask};

/// A finished row, and the worker that produced it.
pub type Reply = (WorkerId, RowResult);

/// The sending half of every worker's task channel.
pub struct WorkerPool {
    workers: Vec<Sender<RowTask>>,
}

impl WorkerPool {
    /// Spawns `size` workers into `scope`.  Each one computes the rows
    /// it is sent and posts the results to `replies`.  The pool takes
    /// `replies` by value so that, once every worker has exited, the
    /// receiving end sees the channel disconnect.
    pub fn spawn<'env>(scope: &Scope<'env>, size: usize, replies: Sender<Reply>) -> WorkerPool {
        let workers = (0..size)
            .map(|id| {
                let (tasks, inbox): (Sender<RowTask>, Receiver<RowTask>) = channel::unbounded();
                let replies = replies.clone();
                scope.spawn(move |_| {
                    for task in inbox.iter() {
                        let result = compute_row(&task);
                        if replies.send((id, result)).is_err() {
                            // Nobody is listening any more.
                            break;
                        }
                    }
                    trace!("worker {} exiting", id);
                });
                tasks
            })
            .collect();

        WorkerPool { workers }
    }

    /// Number of workers in the pool.
    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl Dispatcher for WorkerPool {
    fn dispatch(&mut self, worker: WorkerId, task: RowTask) {
        if self.workers[worker].send(task).is_err() {
            error!("worker {} is gone; row {} was not sent", worker, task.row);
        }
    }
}
