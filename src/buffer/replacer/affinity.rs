//! Two-class affinity replacement policy.
//!
//! Candidates are split by the caller's reuse hint:
//! - disfavored pages are evicted first, most recently disfavored first (LIFO)
//! - favored pages are evicted last, least recently favored first (FIFO)

use std::collections::{HashMap, VecDeque};

use crate::common::FrameId;

/// Caller-supplied hint about how soon an unpinned page will be reused.
///
/// The default is [`Affinity::Favored`]: callers that have no opinion keep
/// their pages in the cache longer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    /// Likely to be reused soon; evicted last, in FIFO order.
    #[default]
    Favored,
    /// Unlikely to be reused soon; evicted first, in LIFO order.
    Disfavored,
}

/// Eviction candidate bookkeeping for the pool.
///
/// A frame enters a list the instant its pin count reaches zero and leaves
/// the instant it is re-pinned or freed, so every enqueued frame is free to
/// evict: `victim()` never needs to inspect pin counts.
///
/// Removal by id is O(1): the membership map is the truth, and list
/// entries it no longer vouches for are skipped lazily during `victim()`.
/// Every enqueue gets a fresh stamp from a monotonic counter, recorded in
/// both the list entry and the membership record; only the entry whose
/// stamp matches is live, so a re-enqueued frame takes its new position
/// and never resurrects an old one.
pub struct AffinityReplacer {
    /// Stack of disfavored candidates (top = most recently disfavored).
    disfavored: Vec<(FrameId, u64)>,

    /// Queue of favored candidates (front = least recently favored).
    favored: VecDeque<(FrameId, u64)>,

    /// Which list each enqueued frame currently belongs to, and the stamp
    /// of its live entry.
    members: HashMap<FrameId, (Affinity, u64)>,

    /// Stamp handed to the next enqueue.
    next_stamp: u64,
}

impl AffinityReplacer {
    /// Create an empty replacer.
    pub fn new() -> Self {
        Self {
            disfavored: Vec::new(),
            favored: VecDeque::new(),
            members: HashMap::new(),
            next_stamp: 0,
        }
    }

    /// Enqueue a frame whose pin count just dropped to zero.
    ///
    /// If the frame is somehow already enqueued, its previous entry is
    /// superseded (the stale list entry is skipped at eviction time).
    pub fn enqueue(&mut self, frame_id: FrameId, affinity: Affinity) {
        debug_assert!(
            !self.members.contains_key(&frame_id),
            "frame enqueued while already a candidate"
        );
        let stamp = self.next_stamp;
        self.next_stamp += 1;

        self.members.insert(frame_id, (affinity, stamp));
        match affinity {
            Affinity::Disfavored => self.disfavored.push((frame_id, stamp)),
            Affinity::Favored => self.favored.push_back((frame_id, stamp)),
        }
    }

    /// Remove a frame from whichever list holds it (re-pin or free).
    ///
    /// Returns whether the frame was actually enqueued, so the pool can
    /// detect bookkeeping defects. The list entry itself is left behind
    /// and skipped lazily (removing it eagerly would be O(n)).
    pub fn remove(&mut self, frame_id: FrameId) -> bool {
        self.members.remove(&frame_id).is_some()
    }

    /// Pick a victim frame, removing it from the candidate set.
    ///
    /// Disfavored candidates always win over favored ones; within
    /// disfavored the most recent wins, within favored the oldest.
    /// Returns None when no candidate exists (all frames pinned).
    pub fn victim(&mut self) -> Option<FrameId> {
        while let Some((frame_id, stamp)) = self.disfavored.pop() {
            if self.members.get(&frame_id) == Some(&(Affinity::Disfavored, stamp)) {
                self.members.remove(&frame_id);
                return Some(frame_id);
            }
            // Stale entry: frame was re-pinned, freed, or re-enqueued
        }

        while let Some((frame_id, stamp)) = self.favored.pop_front() {
            if self.members.get(&frame_id) == Some(&(Affinity::Favored, stamp)) {
                self.members.remove(&frame_id);
                return Some(frame_id);
            }
        }

        None
    }

    /// Number of eviction candidates.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether no candidate exists.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Default for AffinityReplacer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disfavored_preferred_over_favored() {
        let mut replacer = AffinityReplacer::new();

        replacer.enqueue(FrameId::new(0), Affinity::Favored);
        replacer.enqueue(FrameId::new(1), Affinity::Disfavored);

        assert_eq!(replacer.victim(), Some(FrameId::new(1)));
        assert_eq!(replacer.victim(), Some(FrameId::new(0)));
        assert_eq!(replacer.victim(), None);
    }

    #[test]
    fn test_disfavored_is_lifo() {
        let mut replacer = AffinityReplacer::new();

        replacer.enqueue(FrameId::new(0), Affinity::Disfavored);
        replacer.enqueue(FrameId::new(1), Affinity::Disfavored);
        replacer.enqueue(FrameId::new(2), Affinity::Disfavored);

        // Most recently disfavored first
        assert_eq!(replacer.victim(), Some(FrameId::new(2)));
        assert_eq!(replacer.victim(), Some(FrameId::new(1)));
        assert_eq!(replacer.victim(), Some(FrameId::new(0)));
    }

    #[test]
    fn test_favored_is_fifo() {
        let mut replacer = AffinityReplacer::new();

        replacer.enqueue(FrameId::new(0), Affinity::Favored);
        replacer.enqueue(FrameId::new(1), Affinity::Favored);
        replacer.enqueue(FrameId::new(2), Affinity::Favored);

        // Least recently favored first
        assert_eq!(replacer.victim(), Some(FrameId::new(0)));
        assert_eq!(replacer.victim(), Some(FrameId::new(1)));
        assert_eq!(replacer.victim(), Some(FrameId::new(2)));
    }

    #[test]
    fn test_remove_reports_membership() {
        let mut replacer = AffinityReplacer::new();

        replacer.enqueue(FrameId::new(0), Affinity::Favored);
        assert!(replacer.remove(FrameId::new(0)));
        assert!(!replacer.remove(FrameId::new(0)));
        assert!(!replacer.remove(FrameId::new(7)));
    }

    #[test]
    fn test_removed_frame_never_victim() {
        let mut replacer = AffinityReplacer::new();

        replacer.enqueue(FrameId::new(0), Affinity::Disfavored);
        replacer.enqueue(FrameId::new(1), Affinity::Disfavored);
        replacer.remove(FrameId::new(1));

        assert_eq!(replacer.victim(), Some(FrameId::new(0)));
        assert_eq!(replacer.victim(), None);
    }

    #[test]
    fn test_refavored_frame_moves_to_back() {
        let mut replacer = AffinityReplacer::new();

        replacer.enqueue(FrameId::new(0), Affinity::Favored);
        replacer.enqueue(FrameId::new(1), Affinity::Favored);

        // Frame 0 is re-pinned and favored again: it is now the most
        // recently favored and must give up its old front position.
        replacer.remove(FrameId::new(0));
        replacer.enqueue(FrameId::new(0), Affinity::Favored);

        assert_eq!(replacer.victim(), Some(FrameId::new(1)));
        assert_eq!(replacer.victim(), Some(FrameId::new(0)));
        assert_eq!(replacer.victim(), None);
    }

    #[test]
    fn test_redisfavored_frame_moves_to_top() {
        let mut replacer = AffinityReplacer::new();

        replacer.enqueue(FrameId::new(0), Affinity::Disfavored);
        replacer.enqueue(FrameId::new(1), Affinity::Disfavored);

        replacer.remove(FrameId::new(0));
        replacer.enqueue(FrameId::new(0), Affinity::Disfavored);

        // Frame 0 is now the most recently disfavored
        assert_eq!(replacer.victim(), Some(FrameId::new(0)));
        assert_eq!(replacer.victim(), Some(FrameId::new(1)));
        assert_eq!(replacer.victim(), None);
    }

    #[test]
    fn test_re_enqueue_with_other_class() {
        let mut replacer = AffinityReplacer::new();

        // Unpinned disfavored, re-pinned, unpinned favored: the stale
        // disfavored entry must not resurrect the old class.
        replacer.enqueue(FrameId::new(0), Affinity::Disfavored);
        replacer.remove(FrameId::new(0));
        replacer.enqueue(FrameId::new(0), Affinity::Favored);

        replacer.enqueue(FrameId::new(1), Affinity::Favored);

        assert_eq!(replacer.victim(), Some(FrameId::new(0)));
        assert_eq!(replacer.victim(), Some(FrameId::new(1)));
        assert_eq!(replacer.victim(), None);
    }

    #[test]
    fn test_len_tracks_members() {
        let mut replacer = AffinityReplacer::new();
        assert!(replacer.is_empty());

        replacer.enqueue(FrameId::new(0), Affinity::Favored);
        replacer.enqueue(FrameId::new(1), Affinity::Disfavored);
        assert_eq!(replacer.len(), 2);

        replacer.remove(FrameId::new(0));
        assert_eq!(replacer.len(), 1);

        replacer.victim();
        assert!(replacer.is_empty());
    }
}
