use super::tile::Tile;
use super::tiles::{self, SeparatedHand};
use smallvec::SmallVec;

/// 单个花色桶所需混牌数的上限
///
/// 一局最多持有 4 张混牌，超过 `4 + 1` 的需求已经不可能听牌，
/// 封顶后剪枝更早生效，结果仍然精确。
pub const MAX_NEED: u8 = 8;

/// 凑成 3n（无将）或 3n+2（有将）至少还差的张数
///
/// 空牌组返回 0。
pub fn mod_need(len: usize, eye: bool) -> u8 {
    if len == 0 {
        return 0;
    }
    let table = if eye { [2, 1, 0] } else { [0, 2, 1] };
    table[len % 3]
}

/// 拆牌中的一铺
///
/// `need` 是这一铺还差几张混牌，`eye` 表示它是将（对子）。
/// 纯混牌组成的将 `tiles` 为空。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub need: u8,
    pub tiles: SmallVec<[Tile; 3]>,
    pub eye: bool,
}

impl Group {
    fn meld(need: u8, tiles: &[Tile]) -> Self {
        Self { need, tiles: SmallVec::from_slice(tiles), eye: false }
    }

    fn eye(need: u8, tiles: &[Tile]) -> Self {
        Self { need, tiles: SmallVec::from_slice(tiles), eye: true }
    }

    pub fn contains(&self, tile: Tile) -> bool {
        self.tiles.contains(&tile)
    }
}

/// 一种拆法：总共需要的混牌数以及每一铺
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decomposition {
    pub need: u8,
    pub groups: SmallVec<[Group; 6]>,
}

/// 三张牌是否能直接成铺（刻子或顺子，字牌只能成刻）
pub fn is_meld(a: Tile, b: Tile, c: Tile) -> bool {
    if a.suit() != b.suit() || a.suit() != c.suit() {
        return false;
    }
    if a.rank() == b.rank() && b.rank() == c.rank() {
        return true;
    }
    !a.is_honor() && a.rank() + 1 == b.rank() && a.rank() + 2 == c.rank()
}

/// 两张牌加一张混牌能否成铺
fn is_partial_meld(a: Tile, b: Tile) -> bool {
    if a.suit() != b.suit() {
        return false;
    }
    if a.is_honor() {
        a.rank() == b.rank()
    } else {
        a.rank().abs_diff(b.rank()) < 3
    }
}

/// 无将拆牌的回溯搜索
///
/// 始终只处理桶里的第一张牌：要么和后面两张直接成铺，要么和另一张
/// 加一张混牌成铺，要么单独加两张混牌成铺。`limit` 随着找到更优解收紧。
struct NoEyeSearch {
    path: Vec<Group>,
    best: Option<Decomposition>,
    limit: u8,
}

impl NoEyeSearch {
    fn new(limit: u8) -> Self {
        Self { path: Vec::with_capacity(8), best: None, limit }
    }

    fn record(&mut self, need: u8) {
        if need < self.limit {
            self.limit = need;
            self.best = Some(Decomposition { need, groups: self.path.iter().cloned().collect() });
        }
    }

    fn descend(&mut self, group: Group, rest: &[Tile], used: u8) {
        self.path.push(group);
        self.run(rest, used);
        self.path.pop();
    }

    fn run(&mut self, tiles: &[Tile], used: u8) {
        let len = tiles.len();
        if used.saturating_add(mod_need(len, false)) >= self.limit {
            return;
        }
        match len {
            0 => self.record(used),
            1 => {
                self.path.push(Group::meld(2, tiles));
                self.record(used.saturating_add(2));
                self.path.pop();
            }
            2 => {
                let (a, b) = (tiles[0], tiles[1]);
                if is_partial_meld(a, b) {
                    self.path.push(Group::meld(1, tiles));
                    self.record(used.saturating_add(1));
                    self.path.pop();
                } else {
                    self.path.push(Group::meld(2, &[a]));
                    self.path.push(Group::meld(2, &[b]));
                    self.record(used.saturating_add(4));
                    self.path.truncate(self.path.len() - 2);
                }
            }
            _ => self.run_many(tiles, used),
        }
    }

    fn run_many(&mut self, tiles: &[Tile], used: u8) {
        let len = tiles.len();
        let first = tiles[0];
        let first_rank = first.rank() as i8;

        // 第一张和后面两张直接成铺
        for i in 1..len {
            if used.saturating_add(mod_need(len - 3, false)) >= self.limit {
                break;
            }
            let rank = tiles[i].rank() as i8;
            if rank - first_rank > 1 {
                break;
            }
            if i + 2 < len && tiles[i + 2].rank() as i8 == rank {
                continue;
            }
            if i + 1 < len && is_meld(first, tiles[i], tiles[i + 1]) {
                let group = [first, tiles[i], tiles[i + 1]];
                let mut rest = tiles.to_vec();
                tiles::remove_up_to_three(&mut rest, group.map(Some));
                self.descend(Group::meld(0, &group), &rest, used);
            }
        }

        // 第一张和另一张加一张混牌
        if used.saturating_add(mod_need(len - 2, false) + 1) < self.limit {
            if first.is_honor() {
                if tiles[1].rank() == first.rank() {
                    self.descend(Group::meld(1, &tiles[..2]), &tiles[2..], used + 1);
                }
            } else {
                for i in 1..len {
                    if used.saturating_add(mod_need(len - 2, false) + 1) >= self.limit {
                        break;
                    }
                    let rank = tiles[i].rank() as i8;
                    if i + 1 != len && tiles[i + 1].rank() as i8 == rank {
                        continue;
                    }
                    let gap = rank - first_rank;
                    if gap >= 3 {
                        break;
                    }
                    let mut rest = tiles.to_vec();
                    tiles::remove_up_to_three(&mut rest, [Some(first), Some(tiles[i]), None]);
                    self.descend(Group::meld(1, &[first, tiles[i]]), &rest, used + 1);
                    if gap >= 1 {
                        break;
                    }
                }
            }
        }

        // 第一张单独加两张混牌
        if used.saturating_add(mod_need(len - 1, false) + 2) < self.limit {
            self.descend(Group::meld(2, &[first]), &tiles[1..], used + 2);
        }
    }
}

/// 混牌需求计算器
///
/// `pair_ok` 决定哪些牌可以做将，由规则提供（例如只允许 2、5、8）。
pub struct WinChecker<F: Fn(Tile) -> bool> {
    pair_ok: F,
}

impl<F: Fn(Tile) -> bool> WinChecker<F> {
    pub fn new(pair_ok: F) -> Self {
        Self { pair_ok }
    }

    pub fn is_pair_ok(&self, tile: Tile) -> bool {
        (self.pair_ok)(tile)
    }

    /// 无将拆法，要求总需求严格小于 `limit`
    ///
    /// `tiles` 必须是同一花色桶、升序。
    pub fn search_no_eye(&self, tiles: &[Tile], used: u8, limit: u8) -> Option<Decomposition> {
        let mut search = NoEyeSearch::new(limit);
        search.run(tiles, used);
        search.best
    }

    /// 有将拆法（恰好一个将），要求总需求严格小于 `limit`
    ///
    /// 将的来源：
    /// - 两张相同且可做将的牌：0 张混牌
    /// - 一张可做将的牌加一张混牌：1 张
    /// - 两张混牌：2 张
    pub fn search_with_eye(&self, tiles: &[Tile], limit: u8) -> Option<Decomposition> {
        let len = tiles.len();
        if len == 0 {
            return (2 < limit).then(|| Decomposition { need: 2, groups: SmallVec::from_elem(Group::eye(2, &[]), 1) });
        }
        if limit <= mod_need(len, true) {
            return None;
        }

        let mut best: Option<Decomposition> = None;
        let mut limit = limit;
        let mut try_eye = |eye: Group, rest: &[Tile], extra: u8| {
            if extra >= limit {
                return;
            }
            if let Some(mut found) = self.search_no_eye(rest, 0, limit - extra) {
                found.need += extra;
                found.groups.push(eye);
                limit = found.need;
                best = Some(found);
            }
        };

        // 两张混牌做将
        try_eye(Group::eye(2, &[]), tiles, 2);

        for i in 0..len {
            let tile = tiles[i];
            if i == len - 1 {
                if self.is_pair_ok(tile) {
                    let rest = without(tiles, &[i]);
                    try_eye(Group::eye(1, &[tile]), &rest, 1);
                }
                continue;
            }
            let next = tiles[i + 1];
            if (i + 2 == len || tile.rank() != tiles[i + 2].rank()) && tile == next && self.is_pair_ok(tile) {
                let rest = without(tiles, &[i, i + 1]);
                try_eye(Group::eye(0, &[tile, next]), &rest, 0);
            }
            if tile.rank() != next.rank() {
                if self.is_pair_ok(tile) {
                    let rest = without(tiles, &[i]);
                    try_eye(Group::eye(1, &[tile]), &rest, 1);
                } else if self.is_pair_ok(next) {
                    let rest = without(tiles, &[i + 1]);
                    try_eye(Group::eye(1, &[next]), &rest, 1);
                }
            }
        }
        best
    }

    /// 无将最少混牌数，结果不超过 `budget`
    pub fn min_wildcards_no_eye(&self, tiles: &[Tile], used: u8, budget: u8) -> u8 {
        self.search_no_eye(tiles, used, budget).map_or(budget, |found| found.need)
    }

    /// 有将最少混牌数，结果不超过 `budget`
    pub fn min_wildcards_with_eye(&self, tiles: &[Tile], budget: u8) -> u8 {
        self.search_with_eye(tiles, budget).map_or(budget, |found| found.need)
    }

    /// 每个花色桶的无将、有将需求（空桶为 0 / 2）
    pub fn bucket_needs(&self, separated: &SeparatedHand) -> ([u8; 4], [u8; 4]) {
        let mut no_eye = [0u8; 4];
        let mut with_eye = [0u8; 4];
        for (index, (_, bucket)) in separated.suits().enumerate() {
            no_eye[index] = self.min_wildcards_no_eye(bucket, 0, MAX_NEED);
            with_eye[index] = self.min_wildcards_with_eye(bucket, MAX_NEED);
        }
        (no_eye, with_eye)
    }

    /// 是否已经和牌（手上的混牌足够补齐所有缺口）
    ///
    /// 只判断标准牌型：一个将加若干铺。
    pub fn is_complete(&self, separated: &SeparatedHand) -> bool {
        let held = separated.held_wildcards() as u8;
        if separated.is_all_wildcards() {
            return held >= 2;
        }
        let (no_eye, with_eye) = self.bucket_needs(separated);
        let total: u8 = no_eye.iter().sum();
        separated
            .suits()
            .enumerate()
            .filter(|(_, (_, bucket))| !bucket.is_empty())
            .any(|(i, _)| total - no_eye[i] + with_eye[i] <= held)
    }
}

fn without(tiles: &[Tile], skip: &[usize]) -> Vec<Tile> {
    tiles
        .iter()
        .enumerate()
        .filter(|(i, _)| !skip.contains(i))
        .map(|(_, &t)| t)
        .collect()
}
