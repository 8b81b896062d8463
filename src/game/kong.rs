use crate::game::action::QuadClaim;
use crate::game::meld::{Meld, QuadKind};
use crate::game::state::{Discard, PlayerView};
use crate::tile::tiles;

/// 杠判定器
pub struct QuadHandler;

impl QuadHandler {
    /// 暗杠选项
    ///
    /// 手牌中每种有四张的牌各一个选项（混牌也可以暗杠）。
    pub fn concealed_options(view: &PlayerView<'_>) -> Vec<QuadClaim> {
        let mut options: Vec<QuadClaim> = Vec::new();
        for &tile in view.hand {
            if tiles::count(view.hand, tile) == 4 && !options.iter().any(|o| o.tile == tile) {
                options.push(QuadClaim { tile, kind: QuadKind::Concealed });
            }
        }
        options
    }

    /// 补杠选项
    ///
    /// 条件：
    /// 1. 已经碰了三张（`Meld::Triplet`）
    /// 2. 手牌中有第四张
    pub fn supplement_options(view: &PlayerView<'_>) -> Vec<QuadClaim> {
        view.melds
            .iter()
            .filter_map(|meld| match *meld {
                Meld::Triplet { tile } if tiles::index_of(view.hand, tile).is_some() => {
                    Some(QuadClaim { tile, kind: QuadKind::Supplement })
                }
                _ => None,
            })
            .collect()
    }

    /// 明杠选项
    ///
    /// 别人打出的牌，手牌中已有三张。
    pub fn open_option(view: &PlayerView<'_>, discard: &Discard) -> Option<QuadClaim> {
        if discard.from == view.seat || tiles::count(view.hand, discard.tile) < 3 {
            return None;
        }
        Some(QuadClaim { tile: discard.tile, kind: QuadKind::Open })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::DiscardKind;
    use crate::game::ting::PrewinSet;
    use crate::tile::Tile;

    fn tiles_of(codes: &[u16]) -> Vec<Tile> {
        codes.iter().map(|&c| Tile::from_code(c).unwrap()).collect()
    }

    fn view<'a>(hand: &'a [Tile], melds: &'a [Meld], prewin: &'a PrewinSet) -> PlayerView<'a> {
        PlayerView { seat: 1, seat_count: 4, hand, melds, prewin, wildcard: None, declined_win: false }
    }

    #[test]
    fn test_concealed_options_deduplicated() {
        let hand = tiles_of(&[101, 101, 101, 101, 205, 205, 205, 205, 309]);
        let prewin = PrewinSet::new();
        let options = QuadHandler::concealed_options(&view(&hand, &[], &prewin));
        assert_eq!(options.len(), 2);
        assert!(options.iter().all(|o| o.kind == QuadKind::Concealed));
    }

    #[test]
    fn test_supplement_needs_triplet_and_tile() {
        let hand = tiles_of(&[105, 301]);
        let t105 = Tile::from_code(105).unwrap();
        let melds = [Meld::Triplet { tile: t105 }, Meld::Triplet { tile: Tile::from_code(209).unwrap() }];
        let prewin = PrewinSet::new();
        let options = QuadHandler::supplement_options(&view(&hand, &melds, &prewin));
        assert_eq!(options, vec![QuadClaim { tile: t105, kind: QuadKind::Supplement }]);
    }

    #[test]
    fn test_open_option_rejects_own_discard() {
        let hand = tiles_of(&[307, 307, 307, 101]);
        let prewin = PrewinSet::new();
        let v = view(&hand, &[], &prewin);
        let t307 = Tile::from_code(307).unwrap();
        assert!(QuadHandler::open_option(&v, &Discard::new(t307, 0, DiscardKind::Normal)).is_some());
        assert!(QuadHandler::open_option(&v, &Discard::new(t307, 1, DiscardKind::Normal)).is_none());
    }
}
