use crate::game::meld::Meld;
use crate::game::ting::PrewinSet;
use crate::tile::Tile;
use std::fmt;

/// 一张牌的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DiscardKind {
    /// 普通打出
    Normal,
    /// 自己摸到
    SelfDraw,
    /// 补杠亮出的牌（可以被抢杠）
    SupplementQuad,
    /// 牌墙最后一张可摸的牌
    LastTile,
    /// 杠后补的牌（也叫杠上牌，ConcealedQuad / SelfGang），明杠、暗杠、补杠都算
    AfterQuad,
}

/// 在牌桌上流转的一张牌
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discard {
    pub tile: Tile,
    /// 来源座位
    pub from: usize,
    pub kind: DiscardKind,
}

impl Discard {
    pub fn new(tile: Tile, from: usize, kind: DiscardKind) -> Self {
        Self { tile, from, kind }
    }
}

/// 规则判定时看到的玩家投影
#[derive(Debug, Clone, Copy)]
pub struct PlayerView<'a> {
    pub seat: usize,
    pub seat_count: usize,
    pub hand: &'a [Tile],
    pub melds: &'a [Meld],
    pub prewin: &'a PrewinSet,
    pub wildcard: Option<Tile>,
    /// 过胡：放弃过和牌，直到自己下一次操作前不能再和
    pub declined_win: bool,
}

/// 一次摸牌出牌的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Discard(Discard),
    Won,
    Exhausted,
}

/// 牌桌阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WaitingForSeats,
    Shuffling,
    Dealing,
    Playing,
    RoundOver,
    Closed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::WaitingForSeats => "waiting for seats",
            Phase::Shuffling => "shuffling",
            Phase::Dealing => "dealing",
            Phase::Playing => "playing",
            Phase::RoundOver => "round over",
            Phase::Closed => "closed",
        };
        write!(f, "{s}")
    }
}

/// 牌桌类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TableKind {
    /// 四个真人
    Normal,
    /// 一个真人加三个机器人
    Robot,
}
