// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Crawl Frontier
 * Pending-URL queue and the authoritative scanned-set, one serialization point
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<String>,
    scanned: HashSet<String>,
}

/// Owns both the pending queue and the scanned record behind a single lock.
/// Workers feed discovered links back in concurrently, so every mutation
/// goes through this one component; critical sections are a membership test,
/// an insert, or a drain, nothing longer.
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace queue and scanned set wholesale from a checkpoint.
    pub fn restore(&self, queue: Vec<String>, scanned: Vec<String>) {
        let mut state = self.state.lock();
        state.queue = queue.into();
        state.scanned = scanned.into_iter().collect();
    }

    /// Queue a URL unless it was already scanned or is already pending.
    /// Suppression here is best-effort; `mark_scanned` is the hard dedup
    /// guarantee. Returns true when the URL was actually queued.
    pub fn enqueue(&self, url: impl Into<String>) -> bool {
        let url = url.into();
        let mut state = self.state.lock();
        if state.scanned.contains(&url) || state.queue.contains(&url) {
            return false;
        }
        state.queue.push_back(url);
        true
    }

    /// Remove and return up to `n` currently pending URLs. Never blocks;
    /// returns an empty vec when nothing is queued.
    pub fn dequeue_batch(&self, n: usize) -> Vec<String> {
        let mut state = self.state.lock();
        let take = n.min(state.queue.len());
        state.queue.drain(..take).collect()
    }

    /// Atomic test-and-set into the scanned set. Returns true iff this call
    /// inserted the URL, i.e. the caller owns the only fetch of it this run.
    pub fn mark_scanned(&self, url: &str) -> bool {
        self.state.lock().scanned.insert(url.to_string())
    }

    pub fn is_scanned(&self, url: &str) -> bool {
        self.state.lock().scanned.contains(url)
    }

    pub fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }

    /// (queue, scanned) as lists, for checkpointing.
    pub fn snapshot(&self) -> (Vec<String>, Vec<String>) {
        let state = self.state.lock();
        (
            state.queue.iter().cloned().collect(),
            state.scanned.iter().cloned().collect(),
        )
    }
}
