//! Index-addressed result slots with in-order draining.

use std::collections::BTreeMap;

use crate::types::MtcError;

/// Results for a fixed range of chunk indices, handed back strictly in order.
///
/// Results may be placed in any order. [`take_ready`](Self::take_ready) only
/// returns the next index, which lets the writer emit the contiguous prefix as
/// soon as it is complete. Only results waiting behind a gap are held, so
/// memory follows the in-flight window rather than the chunk count.
#[derive(Debug)]
pub struct ChunkSlots<T> {
    pending: BTreeMap<usize, T>,
    next: usize,
    len: usize,
}

impl<T> ChunkSlots<T> {
    pub fn with_len(len: usize) -> Self {
        Self { pending: BTreeMap::new(), next: 0, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the next item `take_ready` will return.
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Results placed but not yet taken.
    pub fn held(&self) -> usize {
        self.pending.len()
    }

    pub fn place(&mut self, index: usize, item: T) -> Result<(), MtcError> {
        let total = self.len;
        if index >= total {
            return Err(MtcError::Pipeline(format!("chunk {index} outside plan of {total} chunks")));
        }
        if index < self.next || self.pending.contains_key(&index) {
            return Err(MtcError::Pipeline(format!("chunk {index} delivered twice")));
        }
        self.pending.insert(index, item);
        Ok(())
    }

    pub fn take_ready(&mut self) -> Option<T> {
        let item = self.pending.remove(&self.next)?;
        self.next += 1;
        Some(item)
    }

    /// True once every index has been taken.
    pub fn is_drained(&self) -> bool {
        self.next == self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_back_until_gap_filled() {
        let mut slots = ChunkSlots::with_len(3);
        slots.place(2, 'c').unwrap();
        slots.place(1, 'b').unwrap();
        assert_eq!(slots.take_ready(), None);

        assert_eq!(slots.held(), 2);
        slots.place(0, 'a').unwrap();
        let got: Vec<_> = std::iter::from_fn(|| slots.take_ready()).collect();
        assert_eq!(got, vec!['a', 'b', 'c']);
        assert!(slots.is_drained());
    }

    #[test]
    fn rejects_duplicates_and_out_of_range() {
        let mut slots = ChunkSlots::with_len(2);
        slots.place(0, 1u8).unwrap();
        assert!(matches!(slots.place(0, 2), Err(MtcError::Pipeline(_))));
        assert!(matches!(slots.place(5, 2), Err(MtcError::Pipeline(_))));
        assert_eq!(slots.take_ready(), Some(1));
        assert!(matches!(slots.place(0, 3), Err(MtcError::Pipeline(_))));
    }

    #[test]
    fn huge_plan_allocates_nothing_up_front() {
        let mut slots = ChunkSlots::with_len(usize::MAX);
        assert_eq!(slots.held(), 0);
        slots.place(0, 0u8).unwrap();
        assert_eq!(slots.take_ready(), Some(0));
        assert_eq!(slots.held(), 0);
        assert!(!slots.is_drained());
    }
}
