//! Ordered, append-only record of the turns shown to the user.

use crate::core::message::{Role, Turn};

#[derive(Debug, Default, Clone)]
pub struct Transcript {
    turns: Vec<Turn>,
    next_seq: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return the sequence number it was given.
    pub fn push(&mut self, role: Role, content: impl Into<String>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.turns.push(Turn {
            role,
            content: content.into(),
            seq,
        });
        seq
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> u64 {
        self.push(Role::User, content)
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> u64 {
        self.push(Role::Assistant, content)
    }

    /// Drop every turn. Sequence numbers start over.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.next_seq = 0;
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
