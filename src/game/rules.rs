use crate::game::action::{OperatKinds, OperatRequest, WinKind, WinOffer};
use crate::game::kong::QuadHandler;
use crate::game::pong::{ChowHandler, PongHandler};
use crate::game::state::{Discard, DiscardKind, PlayerView};
use crate::tile::Tile;
use std::fmt;
use std::sync::Arc;

/// 玩法规则
///
/// 所有 `can_*` 判定只读取玩家投影，合法时把选项写进请求并返回 `true`。
/// 默认实现是各玩法共用的判定，玩法只需覆盖不同的部分。
pub trait Rule: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// 本玩法是否有混牌
    fn has_wildcard(&self) -> bool;

    /// 牌墙是否包含全部字牌
    fn has_honor_suit(&self) -> bool;

    /// 是否限制只有 2、5、8 能做将
    fn is_pair_restricted(&self) -> bool;

    /// 这张牌能否做将
    fn is_pair_eligible(&self, tile: Tile) -> bool {
        !self.is_pair_restricted() || (!tile.is_honor() && matches!(tile.rank(), 2 | 5 | 8))
    }

    /// 固定的混牌（不翻牌）
    fn fixed_wildcard(&self) -> Option<Tile> {
        None
    }

    /// 一副牌的所有牌种（每种 4 张）
    fn wall_kinds(&self) -> Vec<Tile> {
        Tile::all_kinds(self.has_honor_suit()).collect()
    }

    /// 和牌判定
    ///
    /// 可以和的情况：
    /// 1. 腾空
    /// 2. 飘将且这张牌能做将
    /// 3. 风一色且这张是字牌
    /// 4. 这张牌在听牌集合中
    /// 5. 自摸到混牌，且已经听牌
    ///
    /// 过胡的玩家在下次操作前不能和。
    fn can_win(&self, discard: &Discard, view: &PlayerView<'_>, request: &mut OperatRequest) -> bool {
        if view.declined_win {
            return false;
        }
        let self_draw = discard.from == view.seat;
        let wildcard_draw = self_draw && Some(discard.tile) == view.wildcard && !view.prewin.is_empty();
        if !wildcard_draw && !view.prewin.accepts(discard.tile, |t| self.is_pair_eligible(t)) {
            return false;
        }

        let (kind, loser) = if self_draw {
            let kind = match discard.kind {
                DiscardKind::AfterQuad => WinKind::AfterQuad,
                DiscardKind::LastTile => WinKind::LastTile,
                _ => WinKind::SelfDraw,
            };
            (kind, None)
        } else {
            let kind = match discard.kind {
                DiscardKind::SupplementQuad => WinKind::RobQuad,
                _ => WinKind::Discard,
            };
            (kind, Some(discard.from))
        };
        request.kinds.insert(OperatKinds::WIN);
        request.win = Some(WinOffer { tile: discard.tile, kind, loser });
        true
    }

    /// 吃
    fn can_claim_sequence(&self, discard: &Discard, view: &PlayerView<'_>, request: &mut OperatRequest) -> bool {
        let options = ChowHandler::options(view, discard);
        if options.is_empty() {
            return false;
        }
        request.kinds.insert(OperatKinds::SEQUENCE);
        request.sequences.extend(options);
        true
    }

    /// 暗杠
    fn can_claim_concealed_quad(&self, view: &PlayerView<'_>, request: &mut OperatRequest) -> bool {
        let options = QuadHandler::concealed_options(view);
        if options.is_empty() {
            return false;
        }
        request.kinds.insert(OperatKinds::QUAD);
        request.quads.extend(options);
        true
    }

    /// 补杠
    fn can_claim_supplement_quad(&self, view: &PlayerView<'_>, request: &mut OperatRequest) -> bool {
        let options = QuadHandler::supplement_options(view);
        if options.is_empty() {
            return false;
        }
        request.kinds.insert(OperatKinds::QUAD);
        request.quads.extend(options);
        true
    }

    /// 明杠
    fn can_claim_open_quad(&self, discard: &Discard, view: &PlayerView<'_>, request: &mut OperatRequest) -> bool {
        let Some(option) = QuadHandler::open_option(view, discard) else {
            return false;
        };
        request.kinds.insert(OperatKinds::QUAD);
        request.quads.push(option);
        true
    }

    /// 碰
    fn can_claim_triplet(&self, discard: &Discard, view: &PlayerView<'_>, request: &mut OperatRequest) -> bool {
        if !PongHandler::can_pong(view, discard) {
            return false;
        }
        request.kinds.insert(OperatKinds::TRIPLET);
        request.triplet = Some(discard.tile);
        true
    }
}

/// 默认玩法：翻牌定混，有字牌，2、5、8 做将
#[derive(Debug, Clone)]
pub struct DefaultRule {
    pub wildcard: bool,
    pub honors: bool,
    pub pair_258: bool,
}

impl Default for DefaultRule {
    fn default() -> Self {
        Self { wildcard: true, honors: true, pair_258: true }
    }
}

impl Rule for DefaultRule {
    fn name(&self) -> &'static str {
        "default"
    }

    fn has_wildcard(&self) -> bool {
        self.wildcard
    }

    fn has_honor_suit(&self) -> bool {
        self.honors
    }

    fn is_pair_restricted(&self) -> bool {
        self.pair_258
    }
}

/// 红中赖子：红中固定为混牌，牌墙只有数牌加四张红中，任何牌都可以做将
#[derive(Debug, Clone, Default)]
pub struct WildcardHeavyRule;

impl Rule for WildcardHeavyRule {
    fn name(&self) -> &'static str {
        "wildcard-heavy"
    }

    fn has_wildcard(&self) -> bool {
        true
    }

    fn has_honor_suit(&self) -> bool {
        false
    }

    fn is_pair_restricted(&self) -> bool {
        false
    }

    fn fixed_wildcard(&self) -> Option<Tile> {
        Some(Tile::RED_DRAGON)
    }

    fn wall_kinds(&self) -> Vec<Tile> {
        let mut kinds: Vec<Tile> = Tile::all_kinds(false).collect();
        kinds.push(Tile::RED_DRAGON);
        kinds
    }
}

/// 玩法选择
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    #[default]
    Default,
    WildcardHeavy,
}

impl RuleKind {
    /// 按玩法编号选择，未知编号返回 None
    pub fn from_id(id: u16) -> Option<RuleKind> {
        match id {
            1 => Some(RuleKind::Default),
            2 => Some(RuleKind::WildcardHeavy),
            _ => None,
        }
    }

    pub fn build(self) -> Arc<dyn Rule> {
        match self {
            RuleKind::Default => Arc::new(DefaultRule::default()),
            RuleKind::WildcardHeavy => Arc::new(WildcardHeavyRule),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::meld::Meld;
    use crate::game::ting::{PrewinSet, Ting, WaitKey};

    fn t(code: u16) -> Tile {
        Tile::from_code(code).unwrap()
    }

    fn view<'a>(seat: usize, hand: &'a [Tile], melds: &'a [Meld], prewin: &'a PrewinSet, wildcard: Option<Tile>) -> PlayerView<'a> {
        PlayerView { seat, seat_count: 4, hand, melds, prewin, wildcard, declined_win: false }
    }

    #[test]
    fn test_pair_eligibility() {
        let rule = DefaultRule::default();
        assert!(rule.is_pair_eligible(t(102)));
        assert!(rule.is_pair_eligible(t(305)));
        assert!(!rule.is_pair_eligible(t(101)));
        assert!(!rule.is_pair_eligible(t(402)));
        assert!(WildcardHeavyRule.is_pair_eligible(t(101)));
    }

    #[test]
    fn test_win_on_discard_sets_loser() {
        let rule = DefaultRule::default();
        let prewin = PrewinSet::single(WaitKey::Tile(t(105)), Ting::for_tile(t(105), 0));
        let mut request = OperatRequest::default();
        let won = rule.can_win(&Discard::new(t(105), 2, DiscardKind::Normal), &view(0, &[], &[], &prewin, None), &mut request);
        assert!(won);
        assert!(request.kinds.contains(OperatKinds::WIN));
        assert_eq!(request.win, Some(WinOffer { tile: t(105), kind: WinKind::Discard, loser: Some(2) }));
    }

    #[test]
    fn test_win_kinds() {
        let rule = DefaultRule::default();
        let prewin = PrewinSet::single(WaitKey::AnyTile, Ting::win_any());
        let v = view(1, &[], &[], &prewin, None);
        let cases = [
            (Discard::new(t(201), 1, DiscardKind::SelfDraw), WinKind::SelfDraw),
            (Discard::new(t(201), 1, DiscardKind::AfterQuad), WinKind::AfterQuad),
            (Discard::new(t(201), 1, DiscardKind::LastTile), WinKind::LastTile),
            (Discard::new(t(201), 3, DiscardKind::SupplementQuad), WinKind::RobQuad),
        ];
        for (discard, kind) in cases {
            let mut request = OperatRequest::default();
            assert!(rule.can_win(&discard, &v, &mut request));
            assert_eq!(request.win.map(|w| w.kind), Some(kind));
        }
    }

    #[test]
    fn test_declined_win_blocks() {
        let rule = DefaultRule::default();
        let prewin = PrewinSet::single(WaitKey::AnyTile, Ting::win_any());
        let mut v = view(1, &[], &[], &prewin, None);
        v.declined_win = true;
        let mut request = OperatRequest::default();
        assert!(!rule.can_win(&Discard::new(t(201), 0, DiscardKind::Normal), &v, &mut request));
        assert!(request.kinds.is_empty());
    }

    #[test]
    fn test_wildcard_self_draw_needs_a_wait() {
        let rule = DefaultRule::default();
        let wildcard = Some(t(309));
        let draw = Discard::new(t(309), 0, DiscardKind::SelfDraw);

        let empty = PrewinSet::new();
        let mut request = OperatRequest::default();
        assert!(!rule.can_win(&draw, &view(0, &[], &[], &empty, wildcard), &mut request));

        let waiting = PrewinSet::single(WaitKey::Tile(t(101)), Ting::for_tile(t(101), 0));
        assert!(rule.can_win(&draw, &view(0, &[], &[], &waiting, wildcard), &mut request));

        // 别人打出的混牌不算
        let mut request = OperatRequest::default();
        let discard = Discard::new(t(309), 3, DiscardKind::Normal);
        assert!(!rule.can_win(&discard, &view(0, &[], &[], &waiting, wildcard), &mut request));
    }

    #[test]
    fn test_floating_pair_only_accepts_pair_tiles() {
        let rule = DefaultRule::default();
        let prewin = PrewinSet::single(WaitKey::PairTile, Ting::floating_pair());
        let v = view(0, &[], &[], &prewin, None);
        let mut request = OperatRequest::default();
        assert!(rule.can_win(&Discard::new(t(208), 1, DiscardKind::Normal), &v, &mut request));
        let mut request = OperatRequest::default();
        assert!(!rule.can_win(&Discard::new(t(207), 1, DiscardKind::Normal), &v, &mut request));
        // 红中赖子任何牌都能做将
        let mut request = OperatRequest::default();
        assert!(WildcardHeavyRule.can_win(&Discard::new(t(207), 1, DiscardKind::Normal), &v, &mut request));
    }

    #[test]
    fn test_claims_accumulate() {
        let rule = DefaultRule::default();
        let hand = [t(104), t(104), t(104), t(106), t(107)];
        let prewin = PrewinSet::new();
        let v = view(1, &hand, &[], &prewin, None);
        let discard = Discard::new(t(104), 0, DiscardKind::Normal);
        let mut request = OperatRequest::default();
        assert!(rule.can_claim_open_quad(&discard, &v, &mut request));
        assert!(rule.can_claim_triplet(&discard, &v, &mut request));
        assert!(!rule.can_claim_sequence(&discard, &v, &mut request));
        assert!(request.kinds.contains(OperatKinds::QUAD | OperatKinds::TRIPLET));
        assert_eq!(request.triplet, Some(t(104)));
        assert_eq!(request.quads.len(), 1);
    }

    #[test]
    fn test_wildcard_heavy_wall() {
        let kinds = WildcardHeavyRule.wall_kinds();
        assert_eq!(kinds.len(), 28);
        assert!(kinds.contains(&Tile::RED_DRAGON));
        assert_eq!(DefaultRule::default().wall_kinds().len(), 34);
    }

    #[test]
    fn test_rule_kind_selector() {
        assert_eq!(RuleKind::from_id(2), Some(RuleKind::WildcardHeavy));
        assert_eq!(RuleKind::from_id(9), None);
        assert_eq!(RuleKind::WildcardHeavy.build().name(), "wildcard-heavy");
    }
}
