use crate::game::meld::Meld;
use crate::game::rules::Rule;
use crate::game::ting::{PrewinSet, Ting, WaitKey};
use crate::tile::tiles::{self, SeparatedHand};
use crate::tile::win_check::{Decomposition, WinChecker, MAX_NEED};
use crate::tile::{Suit, Tile};
use log::debug;
use smallvec::SmallVec;

/// 听牌判定器
///
/// 绑定一套规则和本局混牌，计算手牌的听牌集合。
pub struct ReadyChecker<'r> {
    rule: &'r dyn Rule,
    wildcard: Option<Tile>,
}

impl<'r> ReadyChecker<'r> {
    pub fn new(rule: &'r dyn Rule, wildcard: Option<Tile>) -> Self {
        Self { rule, wildcard }
    }

    pub fn wildcard(&self) -> Option<Tile> {
        self.wildcard
    }

    fn checker(&self) -> WinChecker<impl Fn(Tile) -> bool + '_> {
        WinChecker::new(move |tile| self.rule.is_pair_eligible(tile))
    }

    /// 无将最少混牌数（同一花色桶，升序）
    pub fn min_wildcards_no_eye(&self, sub_hand: &[Tile], already_used: u8, budget: u8) -> u8 {
        self.checker().min_wildcards_no_eye(sub_hand, already_used, budget)
    }

    /// 有将最少混牌数（同一花色桶，升序）
    pub fn min_wildcards_with_eye(&self, sub_hand: &[Tile], budget: u8) -> u8 {
        self.checker().min_wildcards_with_eye(sub_hand, budget)
    }

    /// 手牌（含摸到的牌）是否已经和牌
    pub fn is_complete(&self, hand: &[Tile]) -> bool {
        self.checker().is_complete(&tiles::separate(hand, self.wildcard))
    }

    /// 是否听牌
    pub fn is_ready(&self, hand: &[Tile], melds: &[Meld]) -> bool {
        !self.compute_waiting_tiles(hand, melds).is_empty()
    }

    /// 计算听牌集合
    ///
    /// # 参数
    ///
    /// - `hand`: 静止状态的手牌（`len % 3 == 1`）
    /// - `melds`: 已亮出的牌组
    ///
    /// # 返回
    ///
    /// 听牌集合，可能包含腾空、飘将、风一色哨兵
    ///
    /// # 流程
    ///
    /// 1. 将一色、风一色直接返回哨兵
    /// 2. 清一色、碰碰胡的听牌先放进结果
    /// 3. 按花色桶计算无将/有将需求，找出最优的将所在桶
    /// 4. 混牌富余时返回腾空或飘将
    /// 5. 在搜索范围内逐张尝试：将桶用有将判定，其余桶用无将判定
    pub fn compute_waiting_tiles(&self, hand: &[Tile], melds: &[Meld]) -> PrewinSet {
        let separated = tiles::separate(hand, self.wildcard);
        let held = separated.held_wildcards();

        if let Some(waits) = self.all_pair_tiles(&separated, melds) {
            return waits;
        }
        if let Some(waits) = self.all_honors(&separated, melds) {
            return waits;
        }

        let mut waits = self.single_suit(&separated, melds, held);
        if self.all_triplets(&separated, melds, held, &mut waits) {
            return waits;
        }

        let checker = self.checker();
        let (no_eye, with_eye) = checker.bucket_needs(&separated);
        let total: u8 = no_eye.iter().sum();
        let (best, best_buckets) = best_combination(&separated, &no_eye, &with_eye);
        debug!(
            "ready check: held={} no_eye={:?} with_eye={:?} best={} buckets={:?}",
            held, no_eye, with_eye, best, best_buckets
        );

        let held = held as i16;
        if held - best as i16 >= 2 {
            return PrewinSet::single(WaitKey::AnyTile, Ting::win_any());
        }
        if held - total as i16 > 0 {
            waits.insert(WaitKey::PairTile, Ting::floating_pair());
            // 限 2、5、8 做将时，其他牌仍可能借这张混牌拆成和牌
            if !self.rule.is_pair_restricted() {
                return waits;
            }
        }
        if best as i16 > held + 1 {
            return waits;
        }

        let suits = Suit::all();
        let mut scanned_no_eye: SmallVec<[usize; 4]> = SmallVec::new();
        for &i in &best_buckets {
            let bucket = separated.suit(suits[i]);
            self.scan(bucket, &mut waits, |trial| checker.search_with_eye(trial, with_eye[i]));

            for j in 0..suits.len() {
                let other = separated.suit(suits[j]);
                if j == i || other.is_empty() || scanned_no_eye.contains(&j) {
                    continue;
                }
                scanned_no_eye.push(j);
                self.scan(other, &mut waits, |trial| checker.search_no_eye(trial, 0, no_eye[j]));
            }
        }
        waits
    }

    /// 在桶的搜索范围内逐张尝试，`test` 返回拆法即记为听牌
    fn scan<T>(&self, bucket: &[Tile], waits: &mut PrewinSet, test: T)
    where
        T: Fn(&[Tile]) -> Option<Decomposition>,
    {
        let Some((low, high)) = tiles::search_range(bucket) else {
            return;
        };
        for candidate in tiles::range_tiles(low, high) {
            if Some(candidate) == self.wildcard || waits.contains_tile(candidate) {
                continue;
            }
            let mut trial = bucket.to_vec();
            trial.push(candidate);
            trial.sort();
            if let Some(found) = test(&trial) {
                let ting = Ting::from_decomposition(candidate, found, |t| self.rule.is_pair_eligible(t));
                waits.insert(WaitKey::Tile(candidate), ting);
            }
        }
    }

    /// 将一色：所有牌都是 2、5、8，和任何 2、5、8
    fn all_pair_tiles(&self, separated: &SeparatedHand, melds: &[Meld]) -> Option<PrewinSet> {
        if !self.rule.is_pair_restricted() || melds.iter().any(Meld::is_sequence) {
            return None;
        }
        let mut tiles = visible_tiles(separated, melds).peekable();
        tiles.peek()?;
        if !tiles.all(|tile| self.rule.is_pair_eligible(tile)) {
            return None;
        }
        let ting = Ting { all_pair_tiles: true, ..Ting::default() };
        Some(PrewinSet::single(WaitKey::PairTile, ting))
    }

    /// 风一色：所有牌都是字牌，和任何字牌
    fn all_honors(&self, separated: &SeparatedHand, melds: &[Meld]) -> Option<PrewinSet> {
        if !self.rule.has_honor_suit() || melds.iter().any(Meld::is_sequence) {
            return None;
        }
        let mut tiles = visible_tiles(separated, melds).peekable();
        tiles.peek()?;
        if !tiles.all(Tile::is_honor) {
            return None;
        }
        let ting = Ting { all_honors: true, ..Ting::default() };
        Some(PrewinSet::single(WaitKey::HonorTile, ting))
    }

    /// 清一色：手牌和牌组都是同一种数牌，任何牌都可以做将
    fn single_suit(&self, separated: &SeparatedHand, melds: &[Meld], held: usize) -> PrewinSet {
        let mut waits = PrewinSet::new();
        let mut suit = None;
        let suits = melds
            .iter()
            .map(Meld::suit)
            .chain(separated.suits().filter(|(_, b)| !b.is_empty()).map(|(s, _)| s));
        for s in suits {
            if suit.is_some_and(|known| known != s) {
                return waits;
            }
            suit = Some(s);
        }
        let Some(suit) = suit.filter(|s| *s != Suit::Honor) else {
            return waits;
        };

        let bucket = separated.suit(suit);
        let any_pair = WinChecker::new(|_| true);
        if (any_pair.min_wildcards_no_eye(bucket, 0, MAX_NEED) as usize) < held {
            let ting = Ting { single_suit: true, ..Ting::floating_pair() };
            waits.insert(WaitKey::PairTile, ting);
            return waits;
        }

        let limit = held as u8 + 1;
        for rank in Tile::MIN_RANK..=suit.max_rank() {
            let Some(candidate) = Tile::new(suit, rank) else {
                continue;
            };
            if Some(candidate) == self.wildcard {
                continue;
            }
            let mut trial = bucket.to_vec();
            trial.push(candidate);
            trial.sort();
            if let Some(found) = any_pair.search_with_eye(&trial, limit) {
                let mut ting = Ting::from_decomposition(candidate, found, |t| self.rule.is_pair_eligible(t));
                ting.single_suit = true;
                waits.insert(WaitKey::Tile(candidate), ting);
            }
        }
        waits
    }

    /// 碰碰胡：全是刻子加一个将
    ///
    /// 按每种牌的张数计算缺口，第一张不成刻的牌当将。返回 `true` 表示腾空。
    fn all_triplets(&self, separated: &SeparatedHand, melds: &[Meld], held: usize, waits: &mut PrewinSet) -> bool {
        if melds.iter().any(Meld::is_sequence) {
            return false;
        }
        let mut need = 0usize;
        let mut eye = false;
        let mut waiting: Vec<Tile> = Vec::new();
        for (_, bucket) in separated.suits() {
            let mut kinds = bucket.to_vec();
            kinds.dedup();
            for tile in kinds {
                match tiles::count(bucket, tile) {
                    1 => {
                        need += if eye { 2 } else { 1 };
                        eye = true;
                        waiting.push(tile);
                    }
                    2 => {
                        need += if eye { 1 } else { 0 };
                        eye = true;
                        waiting.push(tile);
                    }
                    3 => {}
                    _ => {
                        need += if eye { 2 } else { 1 };
                        eye = true;
                        waiting.push(tile);
                    }
                }
                if held + 1 < need {
                    return false;
                }
            }
        }

        if (eye && held > need + 1) || (!eye && held > need) {
            let ting = Ting { all_triplets: true, ..Ting::win_any() };
            *waits = PrewinSet::single(WaitKey::AnyTile, ting);
            return true;
        }
        for tile in waiting {
            let key = WaitKey::Tile(tile);
            match waits.get_mut(key) {
                Some(ting) => ting.all_triplets = true,
                None => waits.insert(key, Ting { all_triplets: true, ..Ting::for_tile(tile, need as u8) }),
            }
        }
        false
    }
}

/// 非混牌的手牌加上所有亮出的牌
fn visible_tiles<'a>(separated: &'a SeparatedHand, melds: &'a [Meld]) -> impl Iterator<Item = Tile> + 'a {
    separated
        .suits()
        .flat_map(|(_, bucket)| bucket.iter().copied())
        .chain(melds.iter().flat_map(|meld| meld.tiles()))
}

/// 选择将所在的桶：总需求 = 其他桶无将需求之和 + 本桶有将需求
///
/// 只考虑非空的桶，需求相同的桶全部保留。
fn best_combination(separated: &SeparatedHand, no_eye: &[u8; 4], with_eye: &[u8; 4]) -> (u8, SmallVec<[usize; 4]>) {
    let total: u8 = no_eye.iter().sum();
    let mut best = u8::MAX;
    let mut indices = SmallVec::new();
    for (i, (_, bucket)) in separated.suits().enumerate() {
        if bucket.is_empty() {
            continue;
        }
        let need = total - no_eye[i] + with_eye[i];
        if need < best {
            best = need;
            indices.clear();
            indices.push(i);
        } else if need == best {
            indices.push(i);
        }
    }
    (best, indices)
}
