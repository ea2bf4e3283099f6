//! Priority queue of deferred play requests
//!
//! Requests that arrive while a priority sound is audible and ask to be
//! queued wait here. Strict FIFO: one entry is released per completed
//! priority sound.

use super::options::PlayOptions;
use crate::playable::SoundHandle;
use std::collections::VecDeque;

/// Deferred play request
pub struct QueuedRequest {
    pub handle: SoundHandle,
    pub options: PlayOptions,
}

impl QueuedRequest {
    pub fn new(handle: SoundHandle, options: PlayOptions) -> Self {
        Self { handle, options }
    }
}

/// FIFO of deferred requests with an optional capacity
pub struct PriorityQueue {
    entries: VecDeque<QueuedRequest>,
    capacity: Option<usize>,
}

impl PriorityQueue {
    /// Create new empty queue; `None` capacity means unbounded
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Append to the back of the queue
    ///
    /// Hands the request back if the queue is full.
    pub fn enqueue(&mut self, request: QueuedRequest) -> Result<(), QueuedRequest> {
        if self.is_full() {
            return Err(request);
        }
        self.entries.push_back(request);
        Ok(())
    }

    /// Take the oldest request
    pub fn pop(&mut self) -> Option<QueuedRequest> {
        self.entries.pop_front()
    }

    pub fn is_full(&self) -> bool {
        self.capacity
            .map(|cap| self.entries.len() >= cap)
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Remove all entries, returning them oldest first
    pub fn drain(&mut self) -> Vec<QueuedRequest> {
        self.entries.drain(..).collect()
    }
}

impl Default for PriorityQueue {
    fn default() -> Self {
        Self::new(None)
    }
}
