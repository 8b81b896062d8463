//! 牌组工具函数
//!
//! 所有出牌、吃碰杠路径共用的纯函数，按牌编码比较。

use super::tile::{Suit, Tile};

/// 统计某张牌的数量
pub fn count(tiles: &[Tile], tile: Tile) -> usize {
    tiles.iter().filter(|&&t| t == tile).count()
}

/// 第一次出现的位置
pub fn index_of(tiles: &[Tile], tile: Tile) -> Option<usize> {
    tiles.iter().position(|&t| t == tile)
}

/// 每个目标值最多移除一张，`None` 表示跳过
///
/// 目标牌不在牌组中时静默忽略。
pub fn remove_up_to_three(tiles: &mut Vec<Tile>, targets: [Option<Tile>; 3]) {
    for target in targets.into_iter().flatten() {
        if let Some(index) = index_of(tiles, target) {
            tiles.remove(index);
        }
    }
}

/// 排序：混牌在前，其余按编码升序
pub fn sort(tiles: &mut [Tile], wildcard: Option<Tile>) {
    tiles.sort_by_key(|&t| (Some(t) != wildcard, t));
}

/// 分桶后的手牌
///
/// 0 号桶是混牌，1-4 号桶按花色（万、筒、条、字）。每个桶内升序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeparatedHand {
    buckets: [Vec<Tile>; 5],
}

impl SeparatedHand {
    pub fn wildcards(&self) -> &[Tile] {
        &self.buckets[0]
    }

    pub fn held_wildcards(&self) -> usize {
        self.buckets[0].len()
    }

    pub fn suit(&self, suit: Suit) -> &[Tile] {
        &self.buckets[suit.index() as usize]
    }

    /// 按桶号取（0 为混牌）
    pub fn bucket(&self, index: usize) -> &[Tile] {
        &self.buckets[index]
    }

    /// 花色桶（不含混牌）及其花色
    pub fn suits(&self) -> impl Iterator<Item = (Suit, &[Tile])> {
        Suit::all().into_iter().map(move |suit| (suit, self.suit(suit)))
    }

    pub fn is_all_wildcards(&self) -> bool {
        self.suits().all(|(_, bucket)| bucket.is_empty())
    }
}

/// 按混牌和花色分桶
pub fn separate(tiles: &[Tile], wildcard: Option<Tile>) -> SeparatedHand {
    let mut separated = SeparatedHand::default();
    for &tile in tiles {
        let index = if Some(tile) == wildcard { 0 } else { tile.suit().index() as usize };
        separated.buckets[index].push(tile);
    }
    for bucket in separated.buckets.iter_mut() {
        bucket.sort();
    }
    separated
}

/// 候选听牌的搜索范围（闭区间）
///
/// - 恰好两张相同的牌：只返回这一张
/// - 字牌：桶内最小到最大，不扩展
/// - 数牌：最小减 2 到最大加 2，截断到 1-9
pub fn search_range(bucket: &[Tile]) -> Option<(Tile, Tile)> {
    let (&first, &last) = (bucket.iter().min()?, bucket.iter().max()?);
    if bucket.len() == 2 && first == last {
        return Some((first, first));
    }
    if first.is_honor() {
        return Some((first, last));
    }
    let suit = first.suit();
    let low = first.rank().saturating_sub(2).max(Tile::MIN_RANK);
    let high = (last.rank() + 2).min(Tile::MAX_RANK);
    Some((Tile::new(suit, low)?, Tile::new(suit, high)?))
}

/// 遍历闭区间内的每一种牌
pub fn range_tiles(low: Tile, high: Tile) -> impl Iterator<Item = Tile> {
    (low.code()..=high.code()).filter_map(Tile::from_code)
}
