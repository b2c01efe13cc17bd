// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transient notification queue and fix-message slots.

use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::notification::{Notification, NotificationId};

/// Carried by a removal timer; names the notification that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpiryTicket {
    /// Notification whose report scheduled the timer.
    pub id: NotificationId,
}

/// What a fired removal timer evicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Pop the current head, whichever ticket fired. With mixed display
    /// durations a short-lived later entry can outlive an earlier one.
    #[default]
    Front,
    /// Remove the notification named by the ticket, if it is still queued.
    Keyed,
}

/// FIFO of transient notifications.
#[derive(Debug, Default)]
pub struct TransientQueue {
    entries: VecDeque<Notification>,
    policy: EvictionPolicy,
}

impl TransientQueue {
    /// Empty queue using `policy` for timer evictions.
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            entries: VecDeque::new(),
            policy,
        }
    }

    /// Current eviction policy.
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Switch eviction policy; takes effect on the next fired timer.
    pub fn set_policy(&mut self, policy: EvictionPolicy) {
        self.policy = policy;
    }

    /// Append at the tail.
    pub fn push(&mut self, notification: Notification) {
        self.entries.push_back(notification);
    }

    /// Remove and return the head. `None` on an empty queue.
    pub fn pop_front(&mut self) -> Option<Notification> {
        self.entries.pop_front()
    }

    /// Handle a fired timer according to the policy.
    pub fn evict(&mut self, ticket: ExpiryTicket) -> Option<Notification> {
        match self.policy {
            EvictionPolicy::Front => self.pop_front(),
            EvictionPolicy::Keyed => {
                let pos = self.entries.iter().position(|n| n.id() == ticket.id)?;
                self.entries.remove(pos)
            }
        }
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Number of queued notifications.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Persistent messages keyed by slot, iterated in first-insertion order.
#[derive(Debug, Default)]
pub struct FixSlots {
    slots: IndexMap<u32, Notification>,
}

impl FixSlots {
    /// Empty slot map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store at `slot`. An occupied slot is overwritten in place and keeps
    /// its position; the previous occupant is returned.
    pub fn insert(&mut self, slot: u32, notification: Notification) -> Option<Notification> {
        self.slots.insert(slot, notification)
    }

    /// Occupant of `slot`.
    pub fn get(&self, slot: u32) -> Option<&Notification> {
        self.slots.get(&slot)
    }

    /// Whether `slot` holds a message.
    pub fn contains(&self, slot: u32) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Remove `slot`, preserving the order of the rest.
    pub fn remove(&mut self, slot: u32) -> Option<Notification> {
        self.slots.shift_remove(&slot)
    }

    /// `(slot, notification)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Notification)> {
        self.slots.iter().map(|(slot, n)| (*slot, n))
    }

    /// Notifications in display order.
    pub fn values(&self) -> impl Iterator<Item = &Notification> {
        self.slots.values()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every slot.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::notification::Severity;

    fn note(id: u64, text: &str) -> Notification {
        Notification::new(NotificationId(id), text, Severity::Info)
    }

    fn texts(q: &TransientQueue) -> Vec<&str> {
        q.iter().map(Notification::raw_text).collect()
    }

    #[test]
    fn front_policy_ignores_ticket() {
        let mut q = TransientQueue::default();
        q.push(note(1, "a"));
        q.push(note(2, "b"));
        let evicted = q.evict(ExpiryTicket { id: NotificationId(2) }).unwrap();
        assert_eq!(evicted.raw_text(), "a");
        assert_eq!(texts(&q), vec!["b"]);
    }

    #[test]
    fn keyed_policy_removes_ticket_owner() {
        let mut q = TransientQueue::new(EvictionPolicy::Keyed);
        q.push(note(1, "a"));
        q.push(note(2, "b"));
        q.push(note(3, "c"));
        let evicted = q.evict(ExpiryTicket { id: NotificationId(2) }).unwrap();
        assert_eq!(evicted.raw_text(), "b");
        assert_eq!(texts(&q), vec!["a", "c"]);
        assert!(q.evict(ExpiryTicket { id: NotificationId(2) }).is_none());
    }

    #[test]
    fn evict_on_empty_queue_is_noop() {
        let mut q = TransientQueue::default();
        assert!(q.evict(ExpiryTicket { id: NotificationId(9) }).is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn switching_policy_changes_next_eviction() {
        let mut q = TransientQueue::default();
        q.push(note(1, "a"));
        q.push(note(2, "b"));
        q.set_policy(EvictionPolicy::Keyed);
        assert_eq!(q.policy(), EvictionPolicy::Keyed);
        q.evict(ExpiryTicket { id: NotificationId(2) });
        assert_eq!(texts(&q), vec!["a"]);
    }

    #[test]
    fn fix_slot_overwrite_keeps_position() {
        let mut slots = FixSlots::new();
        slots.insert(5, note(1, "five"));
        slots.insert(0, note(2, "zero"));
        let prev = slots.insert(5, note(3, "five again"));
        assert_eq!(prev.map(|n| n.raw_text().to_owned()), Some("five".into()));
        let order: Vec<(u32, &str)> = slots.iter().map(|(s, n)| (s, n.raw_text())).collect();
        assert_eq!(order, vec![(5, "five again"), (0, "zero")]);
    }

    #[test]
    fn fix_slot_remove_preserves_order() {
        let mut slots = FixSlots::new();
        for (slot, id) in [(3, 1), (1, 2), (7, 3)] {
            slots.insert(slot, note(id, "x"));
        }
        assert!(slots.remove(1).is_some());
        assert!(slots.remove(1).is_none());
        let order: Vec<u32> = slots.iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec![3, 7]);
    }
}
