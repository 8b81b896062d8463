use crate::tile::win_check::{Decomposition, Group};
use crate::tile::Tile;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// 听牌集合的键
///
/// 除了具体的牌，还有三种哨兵：
/// - `AnyTile`：腾空，摸到任何牌都能和
/// - `PairTile`：飘将（或将一色），任何可以做将的牌都能和
/// - `HonorTile`：风一色，任何字牌都能和
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum WaitKey {
    AnyTile,
    PairTile,
    HonorTile,
    Tile(Tile),
}

/// 单张听牌的描述
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ting {
    /// 听的牌（哨兵没有具体牌）
    pub tile: Option<Tile>,
    /// 和这张牌时还需要的混牌数
    pub need: u8,
    /// 拆牌记录
    pub groups: SmallVec<[Group; 6]>,
    /// 碰碰胡
    pub all_triplets: bool,
    /// 清一色
    pub single_suit: bool,
    /// 将一色
    pub all_pair_tiles: bool,
    /// 风一色
    pub all_honors: bool,
    /// 腾空
    pub win_any: bool,
    /// 飘将
    pub floating_pair: bool,
    /// 飘门
    pub floating_door: bool,
}

impl Ting {
    pub fn for_tile(tile: Tile, need: u8) -> Self {
        Self { tile: Some(tile), need, ..Self::default() }
    }

    /// 由拆牌结果生成，并判断是否飘门
    pub fn from_decomposition(tile: Tile, found: Decomposition, pair_ok: impl Fn(Tile) -> bool) -> Self {
        let floating_door = is_floating_door(tile, &found.groups, pair_ok);
        Self { tile: Some(tile), need: found.need, groups: found.groups, floating_door, ..Self::default() }
    }

    pub fn win_any() -> Self {
        Self { win_any: true, ..Self::default() }
    }

    pub fn floating_pair() -> Self {
        Self { floating_pair: true, ..Self::default() }
    }

    /// 按所需混牌数比较
    pub fn cmp_need(&self, other: &Ting) -> Ordering {
        self.need.cmp(&other.need)
    }
}

/// 飘门：和的这张牌要靠混牌才能成铺
///
/// 判定依据是拆牌记录：
/// - 这张牌所在的一铺仍然差一张混牌
/// - 这张牌和单吊的将牌在同一铺
/// - 否则要求同时存在纯混牌的将，以及包含这张牌、且含可做将牌的一铺
pub fn is_floating_door(tile: Tile, groups: &[Group], pair_ok: impl Fn(Tile) -> bool) -> bool {
    let single_eye = groups
        .iter()
        .find(|g| g.eye && g.need == 1)
        .and_then(|g| g.tiles.first().copied());

    let mut wildcard_eye = false;
    let mut pair_group = false;
    for group in groups {
        if !group.contains(tile) {
            wildcard_eye |= group.eye && group.need == 2;
            continue;
        }
        if !group.eye && group.need == 1 {
            return true;
        }
        if let Some(eye_tile) = single_eye {
            if group.contains(eye_tile) {
                return true;
            }
        }
        if !group.eye && group.tiles.iter().any(|&t| pair_ok(t)) {
            pair_group = true;
        }
    }
    wildcard_eye && pair_group
}

/// 听牌集合，由玩家持有，每次重算后整体替换
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrewinSet {
    waits: BTreeMap<WaitKey, Ting>,
}

impl PrewinSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(key: WaitKey, ting: Ting) -> Self {
        let mut set = Self::new();
        set.insert(key, ting);
        set
    }

    pub fn insert(&mut self, key: WaitKey, ting: Ting) {
        self.waits.insert(key, ting);
    }

    pub fn get(&self, key: WaitKey) -> Option<&Ting> {
        self.waits.get(&key)
    }

    pub fn get_mut(&mut self, key: WaitKey) -> Option<&mut Ting> {
        self.waits.get_mut(&key)
    }

    pub fn contains(&self, key: WaitKey) -> bool {
        self.waits.contains_key(&key)
    }

    pub fn contains_tile(&self, tile: Tile) -> bool {
        self.contains(WaitKey::Tile(tile))
    }

    pub fn is_empty(&self) -> bool {
        self.waits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.waits.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = WaitKey> + '_ {
        self.waits.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WaitKey, &Ting)> {
        self.waits.iter()
    }

    /// 具体听的牌（不含哨兵）
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.waits.keys().filter_map(|key| match key {
            WaitKey::Tile(tile) => Some(*tile),
            _ => None,
        })
    }

    /// 这张牌能否和
    ///
    /// `pair_ok` 用于飘将哨兵的判断。
    pub fn accepts(&self, tile: Tile, pair_ok: impl Fn(Tile) -> bool) -> bool {
        self.contains(WaitKey::AnyTile)
            || (self.contains(WaitKey::PairTile) && pair_ok(tile))
            || (self.contains(WaitKey::HonorTile) && tile.is_honor())
            || self.contains_tile(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(code: u16) -> Tile {
        Tile::from_code(code).unwrap()
    }

    fn group(need: u8, codes: &[u16], eye: bool) -> Group {
        Group { need, tiles: codes.iter().map(|&c| t(c)).collect(), eye }
    }

    fn two_five_eight(tile: Tile) -> bool {
        !tile.is_honor() && matches!(tile.rank(), 2 | 5 | 8)
    }

    #[test]
    fn test_accepts_sentinels() {
        let pair = PrewinSet::single(WaitKey::PairTile, Ting::floating_pair());
        assert!(pair.accepts(t(205), two_five_eight));
        assert!(!pair.accepts(t(204), two_five_eight));

        let honors = PrewinSet::single(WaitKey::HonorTile, Ting::default());
        assert!(honors.accepts(t(403), two_five_eight));
        assert!(!honors.accepts(t(103), two_five_eight));

        let any = PrewinSet::single(WaitKey::AnyTile, Ting::win_any());
        assert!(any.accepts(t(309), two_five_eight));
    }

    #[test]
    fn test_tiles_skip_sentinels() {
        let mut set = PrewinSet::new();
        set.insert(WaitKey::PairTile, Ting::floating_pair());
        set.insert(WaitKey::Tile(t(105)), Ting::for_tile(t(105), 0));
        assert_eq!(set.tiles().collect::<Vec<_>>(), vec![t(105)]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_floating_door_when_group_still_needs_wildcard() {
        let groups = [group(1, &[103, 105], false), group(0, &[202, 202], true)];
        assert!(is_floating_door(t(105), &groups, two_five_eight));
        assert!(!is_floating_door(t(202), &groups, two_five_eight));
    }

    #[test]
    fn test_floating_door_with_wildcard_eye() {
        let groups = [group(0, &[104, 105, 106], false), group(2, &[], true)];
        assert!(is_floating_door(t(105), &groups, two_five_eight));
        let groups = [group(0, &[104, 105, 106], false), group(0, &[208, 208], true)];
        assert!(!is_floating_door(t(105), &groups, two_five_eight));
    }

    #[test]
    fn test_cmp_need() {
        let a = Ting::for_tile(t(101), 0);
        let b = Ting::for_tile(t(102), 2);
        assert_eq!(a.cmp_need(&b), Ordering::Less);
    }
}
