use crate::game::action::SequenceClaim;
use crate::game::state::{Discard, PlayerView};
use crate::tile::{tiles, Tile};

/// 碰判定器
pub struct PongHandler;

impl PongHandler {
    /// 别人打出的牌，手牌中至少两张
    pub fn can_pong(view: &PlayerView<'_>, discard: &Discard) -> bool {
        discard.from != view.seat && tiles::count(view.hand, discard.tile) >= 2
    }
}

/// 吃判定器
pub struct ChowHandler;

impl ChowHandler {
    /// 吃的选项
    ///
    /// 条件：
    /// 1. 只有下家可以吃
    /// 2. 字牌和混牌不能吃
    /// 3. 组成的顺子覆盖的编码范围内不能有混牌
    ///
    /// 三种形状：(c-2, c-1)、(c-1, c+1)、(c+1, c+2)
    pub fn options(view: &PlayerView<'_>, discard: &Discard) -> Vec<SequenceClaim> {
        let tile = discard.tile;
        if tile.is_honor() || Some(tile) == view.wildcard {
            return Vec::new();
        }
        if (discard.from + 1) % view.seat_count != view.seat {
            return Vec::new();
        }

        let has = |delta: i8| tile.offset(delta).filter(|&t| tiles::index_of(view.hand, t).is_some());
        let clear_of_wildcard = |low: Tile, high: Tile| match view.wildcard {
            Some(wildcard) => wildcard < low || wildcard > high,
            None => true,
        };

        let mut options = Vec::new();
        for (a, b) in [(-2, -1), (-1, 1), (1, 2)] {
            let (Some(first), Some(second)) = (has(a), has(b)) else {
                continue;
            };
            let mut meld = [first, second, tile];
            meld.sort();
            if clear_of_wildcard(meld[0], meld[2]) {
                options.push(SequenceClaim { hand: [first, second], meld });
            }
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::DiscardKind;
    use crate::game::ting::PrewinSet;

    fn t(code: u16) -> Tile {
        Tile::from_code(code).unwrap()
    }

    fn tiles_of(codes: &[u16]) -> Vec<Tile> {
        codes.iter().map(|&c| t(c)).collect()
    }

    fn view<'a>(seat: usize, hand: &'a [Tile], prewin: &'a PrewinSet, wildcard: Option<Tile>) -> PlayerView<'a> {
        PlayerView { seat, seat_count: 4, hand, melds: &[], prewin, wildcard, declined_win: false }
    }

    #[test]
    fn test_pong() {
        let hand = tiles_of(&[203, 203, 401]);
        let prewin = PrewinSet::new();
        assert!(PongHandler::can_pong(&view(2, &hand, &prewin, None), &Discard::new(t(203), 0, DiscardKind::Normal)));
        assert!(!PongHandler::can_pong(&view(2, &hand, &prewin, None), &Discard::new(t(401), 0, DiscardKind::Normal)));
    }

    #[test]
    fn test_chow_all_shapes() {
        let hand = tiles_of(&[103, 104, 106, 107]);
        let prewin = PrewinSet::new();
        let options = ChowHandler::options(&view(1, &hand, &prewin, None), &Discard::new(t(105), 0, DiscardKind::Normal));
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].meld, [t(103), t(104), t(105)]);
        assert_eq!(options[1].hand, [t(104), t(106)]);
        assert_eq!(options[2].meld, [t(105), t(106), t(107)]);
    }

    #[test]
    fn test_chow_only_next_seat() {
        let hand = tiles_of(&[103, 104]);
        let prewin = PrewinSet::new();
        let discard = Discard::new(t(105), 0, DiscardKind::Normal);
        assert!(ChowHandler::options(&view(2, &hand, &prewin, None), &discard).is_empty());
        assert!(ChowHandler::options(&view(3, &hand, &prewin, None), &discard).is_empty());
        assert_eq!(ChowHandler::options(&view(1, &hand, &prewin, None), &discard).len(), 1);
    }

    #[test]
    fn test_chow_rejects_honor_and_wildcard() {
        let prewin = PrewinSet::new();
        let honors = tiles_of(&[401, 402]);
        let discard = Discard::new(t(403), 0, DiscardKind::Normal);
        assert!(ChowHandler::options(&view(1, &honors, &prewin, None), &discard).is_empty());

        let hand = tiles_of(&[103, 104]);
        let discard = Discard::new(t(105), 0, DiscardKind::Normal);
        assert!(ChowHandler::options(&view(1, &hand, &prewin, Some(t(105))), &discard).is_empty());
        // 混牌落在顺子范围内
        assert!(ChowHandler::options(&view(1, &hand, &prewin, Some(t(104))), &discard).is_empty());
        assert_eq!(ChowHandler::options(&view(1, &hand, &prewin, Some(t(106))), &discard).len(), 1);
    }
}
