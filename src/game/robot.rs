use crate::error::ActorError;
use crate::game::action::{Notice, OperatKinds, OperatRequest, OperatResponse, Request, Response, TableOperat};
use crate::game::actor::Actor;
use crate::tile::tiles::{self, SeparatedHand};
use crate::tile::{Suit, Tile};
use async_trait::async_trait;
use rand::Rng;

/// 机器人
///
/// 离线玩家和机器人座位的决策者，立即回复：
/// - 能和就和，能杠就杠（第一个选项），能碰就碰，能吃就吃（第一个选项）
/// - 出牌优先打孤张，没有孤张就随机打一张非混牌
/// - 同意开局，不同意续局
#[derive(Debug, Clone, Copy, Default)]
pub struct Robot;

impl Robot {
    pub fn respond(&self, request: &Request) -> Response {
        match request {
            Request::Table(op) => Response::Table { op: *op, ok: *op == TableOperat::Start },
            Request::Operat(request) => Response::Operat(self.decide(request)),
        }
    }

    fn decide(&self, request: &OperatRequest) -> OperatResponse {
        let kinds = request.kinds;
        if kinds.contains(OperatKinds::DEAL) {
            return OperatResponse::Ack;
        }
        if let (true, Some(offer)) = (kinds.contains(OperatKinds::WIN), request.win) {
            return OperatResponse::Win(offer);
        }
        if kinds.contains(OperatKinds::DRAW) {
            return OperatResponse::Ack;
        }
        if let (true, Some(&claim)) = (kinds.contains(OperatKinds::QUAD), request.quads.first()) {
            return OperatResponse::Quad(claim);
        }
        if let (true, Some(tile)) = (kinds.contains(OperatKinds::TRIPLET), request.triplet) {
            return OperatResponse::Triplet(tile);
        }
        if let (true, Some(&claim)) = (kinds.contains(OperatKinds::SEQUENCE), request.sequences.first()) {
            return OperatResponse::Sequence(claim);
        }
        if kinds.contains(OperatKinds::DROP) {
            let separated = tiles::separate(&request.hand, request.wildcard);
            let tile = drop_single(&separated)
                .or_else(|| drop_rand(&request.hand, request.wildcard, &mut rand::thread_rng()));
            if let Some(tile) = tile {
                return OperatResponse::Drop(tile);
            }
        }
        OperatResponse::Pass
    }
}

#[async_trait]
impl Actor for Robot {
    async fn notify(&self, request: Request) -> Result<Response, ActorError> {
        Ok(self.respond(&request))
    }

    fn send(&self, _notice: Notice) {}
}

/// 找一张孤张
///
/// 顺序：
/// 1. 字牌只有一张就打它，否则打第一张单个的字牌
/// 2. 边张：单个的 1 且没有 2、3，单个的 9 且没有 8、7
/// 3. 前后都不挨着的单张数牌
pub fn drop_single(separated: &SeparatedHand) -> Option<Tile> {
    let honors = separated.suit(Suit::Honor);
    if honors.len() == 1 {
        return Some(honors[0]);
    }
    if let Some(&tile) = honors.iter().find(|&&t| tiles::count(honors, t) == 1) {
        return Some(tile);
    }

    let number_suits = [Suit::Wan, Suit::Tong, Suit::Tiao];
    let absent = |bucket: &[Tile], tile: Option<Tile>| tile.map_or(true, |t| tiles::count(bucket, t) == 0);

    for suit in number_suits {
        let bucket = separated.suit(suit);
        for (edge, step) in [(Tile::MIN_RANK, 1i8), (Tile::MAX_RANK, -1i8)] {
            let Some(tile) = Tile::new(suit, edge) else {
                continue;
            };
            if tiles::count(bucket, tile) == 1 && absent(bucket, tile.offset(step)) && absent(bucket, tile.offset(2 * step)) {
                return Some(tile);
            }
        }
    }

    for suit in number_suits {
        let bucket = separated.suit(suit);
        for &tile in bucket {
            if tiles::count(bucket, tile) == 1 && absent(bucket, tile.offset(1)) && absent(bucket, tile.offset(-1)) {
                return Some(tile);
            }
        }
    }
    None
}

/// 随机打一张非混牌；全是混牌时随便打一张
pub fn drop_rand<R: Rng + ?Sized>(hand: &[Tile], wildcard: Option<Tile>, rng: &mut R) -> Option<Tile> {
    let candidates: Vec<Tile> = hand.iter().copied().filter(|&t| Some(t) != wildcard).collect();
    let pool = if candidates.is_empty() { hand } else { &candidates[..] };
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.gen_range(0..pool.len())])
}
