use super::tile::Tile;
use rand::Rng;

/// 牌墙（Wall）
///
/// 从前往后抽牌。牌的组成由规则决定（是否含字牌、红中赖子等）。
#[derive(Debug, Clone)]
pub struct Wall {
    tiles: Vec<Tile>,
    /// 已抽取的牌数
    drawn_count: usize,
}

impl Wall {
    /// 由牌种生成整副牌，每种 4 张，未洗牌
    pub fn from_kinds(kinds: impl IntoIterator<Item = Tile>) -> Self {
        let tiles = kinds
            .into_iter()
            .flat_map(|tile| std::iter::repeat(tile).take(Tile::COPIES))
            .collect();
        Self::from_tiles(tiles)
    }

    /// 按给定顺序构造牌墙（测试或复盘用）
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles, drawn_count: 0 }
    }

    /// 洗牌
    ///
    /// 每次从剩余的牌中随机取一张放到新牌墙末尾，直到取完。
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut remaining = std::mem::take(&mut self.tiles);
        let mut shuffled = Vec::with_capacity(remaining.len());
        while !remaining.is_empty() {
            let index = rng.gen_range(0..remaining.len());
            shuffled.push(remaining.remove(index));
        }
        self.tiles = shuffled;
        self.drawn_count = 0;
    }

    /// 抽取一张牌（从牌墙前端）
    ///
    /// # Returns
    ///
    /// - `Some(Tile)`：成功抽取一张牌
    /// - `None`：牌墙已空
    pub fn draw(&mut self) -> Option<Tile> {
        let tile = self.tiles.get(self.drawn_count).copied()?;
        self.drawn_count += 1;
        Some(tile)
    }

    /// 查询剩余牌数
    pub fn remaining_count(&self) -> usize {
        self.tiles.len().saturating_sub(self.drawn_count)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_count() == 0
    }

    pub fn drawn_count(&self) -> usize {
        self.drawn_count
    }

    pub fn total_count(&self) -> usize {
        self.tiles.len()
    }
}
