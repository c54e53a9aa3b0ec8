//! Background execution.
//!
//! [`submit`] moves a value (normally a [`VbaApi`](crate::api::VbaApi)) into a
//! worker thread and runs one operation there. Events stream back over a
//! channel while the operation runs; [`TaskHandle::join`] hands the value back
//! together with the operation's output. There is no cancellation.

use crate::error::{Result, SyncError};
use crate::listener::{ChannelListener, Event, Listener};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

pub struct TaskHandle<A, T> {
    events: Receiver<Event>,
    worker: JoinHandle<(A, T)>,
}

impl<A, T> TaskHandle<A, T> {
    /// Events in the order the operation emitted them. Iteration ends once
    /// the operation has returned.
    pub fn events(&self) -> &Receiver<Event> {
        &self.events
    }

    pub fn join(self) -> Result<(A, T)> {
        self.worker
            .join()
            .map_err(|_| SyncError::Api("worker thread panicked".to_string()))
    }
}

pub fn submit<A, T, F>(mut target: A, operation: F) -> Result<TaskHandle<A, T>>
where
    A: Send + 'static,
    T: Send + 'static,
    F: FnOnce(&mut A, &mut dyn Listener) -> T + Send + 'static,
{
    let (sender, events) = mpsc::channel();
    let worker = thread::Builder::new()
        .name("vbasync-worker".to_string())
        .spawn(move || {
            let mut listener = ChannelListener::new(sender);
            let output = operation(&mut target, &mut listener);
            (target, output)
        })
        .map_err(SyncError::Io)?;
    log::debug!("submitted operation to worker thread");
    Ok(TaskHandle { events, worker })
}
