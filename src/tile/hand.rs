use super::tile::Tile;
use super::tiles::{self, SeparatedHand};

/// 手牌（Hand）
///
/// 有序的牌组：混牌在前，其余按编码升序。每次增删后保持有序。
///
/// 静止状态下张数满足 `len % 3 == 1`；摸牌或吃碰后、出牌前为 `len % 3 == 2`。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    tiles: Vec<Tile>,
    wildcard: Option<Tile>,
}

impl Hand {
    /// 创建空手牌
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置本局混牌并重新排序
    pub fn set_wildcard(&mut self, wildcard: Option<Tile>) {
        self.wildcard = wildcard;
        tiles::sort(&mut self.tiles, wildcard);
    }

    pub fn wildcard(&self) -> Option<Tile> {
        self.wildcard
    }

    /// 添加一张牌
    pub fn add_tile(&mut self, tile: Tile) {
        self.tiles.push(tile);
        tiles::sort(&mut self.tiles, self.wildcard);
    }

    /// 批量添加
    pub fn extend(&mut self, new_tiles: &[Tile]) {
        self.tiles.extend_from_slice(new_tiles);
        tiles::sort(&mut self.tiles, self.wildcard);
    }

    /// 移除一张牌
    ///
    /// # 返回
    ///
    /// - `true`：成功移除
    /// - `false`：手牌中没有该牌
    pub fn remove_tile(&mut self, tile: Tile) -> bool {
        match tiles::index_of(&self.tiles, tile) {
            Some(index) => {
                self.tiles.remove(index);
                true
            }
            None => false,
        }
    }

    /// 连续移除同一张牌 `n` 次，不足时不做任何修改
    pub fn remove_n(&mut self, tile: Tile, n: usize) -> bool {
        if self.tile_count(tile) < n {
            return false;
        }
        for _ in 0..n {
            self.remove_tile(tile);
        }
        true
    }

    /// 每个目标值最多移除一张
    pub fn remove_up_to_three(&mut self, targets: [Option<Tile>; 3]) {
        tiles::remove_up_to_three(&mut self.tiles, targets);
    }

    pub fn has_tile(&self, tile: Tile) -> bool {
        tiles::index_of(&self.tiles, tile).is_some()
    }

    pub fn tile_count(&self, tile: Tile) -> usize {
        tiles::count(&self.tiles, tile)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// 排序后的最后一张（出牌兜底用）
    pub fn last(&self) -> Option<Tile> {
        self.tiles.last().copied()
    }

    pub fn as_slice(&self) -> &[Tile] {
        &self.tiles
    }

    /// 手牌中的不同牌种（保持顺序）
    pub fn distinct(&self) -> Vec<Tile> {
        let mut kinds = self.tiles.clone();
        kinds.dedup();
        kinds
    }

    pub fn separate(&self) -> SeparatedHand {
        tiles::separate(&self.tiles, self.wildcard)
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
        self.wildcard = None;
    }
}
