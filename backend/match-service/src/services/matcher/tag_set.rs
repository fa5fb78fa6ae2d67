use crate::vocabulary::TagCode;

/// Fixed-width bitset over the full tag code space (256 bits).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TagSet([u64; 4]);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: TagCode) {
        let (word, bit) = Self::position(code);
        self.0[word] |= bit;
    }

    pub fn remove(&mut self, code: TagCode) {
        let (word, bit) = Self::position(code);
        self.0[word] &= !bit;
    }

    pub fn contains(&self, code: TagCode) -> bool {
        let (word, bit) = Self::position(code);
        self.0[word] & bit != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|w| *w == 0)
    }

    pub fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Codes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = TagCode> + '_ {
        (0..=u8::MAX).filter(move |&code| self.contains(code))
    }

    fn position(code: TagCode) -> (usize, u64) {
        ((code as usize) / 64, 1u64 << (code % 64))
    }
}

impl FromIterator<TagCode> for TagSet {
    fn from_iter<I: IntoIterator<Item = TagCode>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for code in iter {
            set.insert(code);
        }
        set
    }
}
