use crate::tile::{Suit, Tile};
use smallvec::SmallVec;

/// 杠类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum QuadKind {
    /// 明杠（别人打出的牌，手里有三张）
    Open,
    /// 补杠（已经碰了三张，摸到第四张）
    Supplement,
    /// 暗杠（手牌中有四张相同的牌）
    Concealed,
}

/// 已亮出的牌组（吃、碰、杠）
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Meld {
    /// 吃（顺子）
    Sequence { tiles: [Tile; 3] },
    /// 碰（刻子）
    Triplet { tile: Tile },
    /// 杠
    Quad { tile: Tile, kind: QuadKind },
}

impl Meld {
    /// 组成这一组的全部牌
    pub fn tiles(&self) -> SmallVec<[Tile; 4]> {
        match *self {
            Meld::Sequence { tiles } => SmallVec::from_slice(&tiles),
            Meld::Triplet { tile } => SmallVec::from_elem(tile, 3),
            Meld::Quad { tile, .. } => SmallVec::from_elem(tile, 4),
        }
    }

    pub fn first_tile(&self) -> Tile {
        match *self {
            Meld::Sequence { tiles } => tiles[0],
            Meld::Triplet { tile } | Meld::Quad { tile, .. } => tile,
        }
    }

    pub fn suit(&self) -> Suit {
        self.first_tile().suit()
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Meld::Sequence { .. })
    }
}
