//! Global tile ids as Tiled stores them in layer data.

/// Set on cells mirrored left to right.
pub const FLIP_H: u32 = 1 << 31;
/// Set on cells mirrored top to bottom.
pub const FLIP_V: u32 = 1 << 30;
/// Set on cells mirrored across the top-left/bottom-right diagonal.
pub const FLIP_D: u32 = 1 << 29;
/// Bits that remain once the flip flags are cleared.
pub const GID_MASK: u32 = !(FLIP_H | FLIP_V | FLIP_D);

/// Raw global tile id as stored in layer data, flip flags included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Gid(pub u32);

impl Gid {
    /// The empty cell.
    pub const EMPTY: Gid = Gid(0);

    pub fn raw(self) -> u32 {
        self.0
    }

    /// The id used for tileset lookup, flip flags cleared.
    pub fn clean(self) -> u32 {
        self.0 & GID_MASK
    }

    pub fn is_empty(self) -> bool {
        self.clean() == 0
    }

    pub fn flip_h(self) -> bool {
        self.0 & FLIP_H != 0
    }

    pub fn flip_v(self) -> bool {
        self.0 & FLIP_V != 0
    }

    /// Decoded for completeness. Drawing ignores diagonal flips.
    pub fn flip_d(self) -> bool {
        self.0 & FLIP_D != 0
    }
}

impl From<u32> for Gid {
    fn from(raw: u32) -> Self {
        Gid(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_every_flip_bit() {
        let g = Gid(7 | FLIP_H | FLIP_V | FLIP_D);
        assert_eq!(g.clean(), 7);
        assert!(g.flip_h() && g.flip_v() && g.flip_d());
        assert!(!Gid(7).flip_h());
    }

    #[test]
    fn flipped_zero_is_still_empty() {
        assert!(Gid(FLIP_H).is_empty());
        assert!(!Gid(1).is_empty());
    }
}
