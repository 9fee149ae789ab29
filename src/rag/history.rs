//! Bounded conversation history

use std::collections::VecDeque;

use chrono::Utc;

use crate::models::ConversationTurn;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Most recent user inputs, oldest evicted first.
///
/// Sequence numbers keep increasing across evictions, so a turn's number
/// tells how many inputs came before it in the session.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: VecDeque<ConversationTurn>,
    capacity: usize,
    next_sequence: u64,
}

impl ConversationHistory {
    /// A capacity of zero is raised to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
            next_sequence: 0,
        }
    }

    /// Record a raw input, evicting the oldest turn when full
    pub fn push(&mut self, input: impl Into<String>) -> &ConversationTurn {
        if self.turns.len() == self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(ConversationTurn {
            sequence: self.next_sequence,
            input: input.into(),
            at: Utc::now(),
        });
        self.next_sequence += 1;
        &self.turns[self.turns.len() - 1]
    }

    /// Oldest first
    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.turns.iter().cloned().collect()
    }

    /// The last `n` turns, oldest first
    pub fn recent(&self, n: usize) -> Vec<ConversationTurn> {
        let skip = self.turns.len().saturating_sub(n);
        self.turns.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
