use crate::types::Span;
use smallvec::{smallvec, SmallVec};

const BLOCK_BITS: usize = u64::BITS as usize;

/// Set of translated source positions. Values are never mutated once built;
/// extending a coverage produces a new one.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct Coverage {
    blocks: SmallVec<[u64; 2]>,
    len: usize,
    count: usize,
}

impl Coverage {
    pub(crate) fn empty(len: usize) -> Self {
        Self {
            blocks: smallvec![0; len.div_ceil(BLOCK_BITS)],
            len,
            count: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn contains(&self, position: usize) -> bool {
        position < self.len
            && self.blocks[position / BLOCK_BITS] & (1u64 << (position % BLOCK_BITS)) != 0
    }

    pub(crate) fn overlaps(&self, (start, end): Span) -> bool {
        (start..end).any(|position| self.contains(position))
    }

    /// Union with `span`, or `None` if the span is out of range or touches a
    /// position that is already covered.
    pub(crate) fn with_span(&self, span: Span) -> Option<Self> {
        let (start, end) = span;
        if start >= end || end > self.len || self.overlaps(span) {
            return None;
        }

        let mut blocks = self.blocks.clone();
        for position in start..end {
            blocks[position / BLOCK_BITS] |= 1u64 << (position % BLOCK_BITS);
        }
        Some(Self {
            blocks,
            len: self.len,
            count: self.count + (end - start),
        })
    }

    pub(crate) fn uncovered(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|position| !self.contains(*position))
    }
}
