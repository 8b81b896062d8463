use crate::game::meld::{Meld, QuadKind};
use crate::game::ting::WaitKey;
use crate::tile::Tile;
use std::fmt;

/// 操作类型位掩码
///
/// 一次请求里可以同时提供多种操作（例如出牌时可以选择暗杠或自摸）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct OperatKinds(u8);

impl OperatKinds {
    pub const NONE: OperatKinds = OperatKinds(0);
    /// 发牌
    pub const DEAL: OperatKinds = OperatKinds(1);
    /// 和牌
    pub const WIN: OperatKinds = OperatKinds(1 << 1);
    /// 摸牌
    pub const DRAW: OperatKinds = OperatKinds(1 << 2);
    /// 碰
    pub const TRIPLET: OperatKinds = OperatKinds(1 << 3);
    /// 杠
    pub const QUAD: OperatKinds = OperatKinds(1 << 4);
    /// 吃
    pub const SEQUENCE: OperatKinds = OperatKinds(1 << 5);
    /// 出牌
    pub const DROP: OperatKinds = OperatKinds(1 << 6);

    const NAMES: [(OperatKinds, &'static str); 7] = [
        (Self::DEAL, "deal"),
        (Self::WIN, "win"),
        (Self::DRAW, "draw"),
        (Self::TRIPLET, "triplet"),
        (Self::QUAD, "quad"),
        (Self::SEQUENCE, "sequence"),
        (Self::DROP, "drop"),
    ];

    pub fn contains(self, other: OperatKinds) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: OperatKinds) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: OperatKinds) {
        self.0 |= other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for OperatKinds {
    type Output = OperatKinds;

    fn bitor(self, rhs: OperatKinds) -> OperatKinds {
        OperatKinds(self.0 | rhs.0)
    }
}

impl fmt::Display for OperatKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(kind, _)| self.contains(*kind))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", names.join("|"))
    }
}

/// 和牌方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum WinKind {
    /// 点炮
    Discard,
    /// 自摸
    SelfDraw,
    /// 杠上开花
    AfterQuad,
    /// 海底捞月
    LastTile,
    /// 抢杠胡
    RobQuad,
}

/// 和牌邀请
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WinOffer {
    pub tile: Tile,
    pub kind: WinKind,
    /// 放炮的座位（自摸为 None）
    pub loser: Option<usize>,
}

/// 可选的杠
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct QuadClaim {
    pub tile: Tile,
    pub kind: QuadKind,
}

/// 可选的吃：手里出两张，和打出的牌组成顺子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SequenceClaim {
    pub hand: [Tile; 2],
    pub meld: [Tile; 3],
}

/// 发牌信息
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DealInfo {
    pub seat: usize,
    pub fan: Option<Tile>,
    pub wildcard: Option<Tile>,
}

/// 一次决策请求
///
/// `kinds` 列出所有合法的操作，其余字段是对应操作的具体选项。
/// `hand` 是当时手牌的快照，供客户端或机器人决策使用。
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OperatRequest {
    pub kinds: OperatKinds,
    pub deal: Option<DealInfo>,
    pub draw: Option<Tile>,
    pub win: Option<WinOffer>,
    pub quads: Vec<QuadClaim>,
    pub triplet: Option<Tile>,
    pub sequences: Vec<SequenceClaim>,
    pub hand: Vec<Tile>,
    pub wildcard: Option<Tile>,
}

impl OperatRequest {
    pub fn new(hand: &[Tile], wildcard: Option<Tile>) -> Self {
        Self { hand: hand.to_vec(), wildcard, ..Self::default() }
    }

    pub fn with_kinds(mut self, kinds: OperatKinds) -> Self {
        self.kinds.insert(kinds);
        self
    }
}

/// 对决策请求的回复：选择一项操作，或者放弃
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OperatResponse {
    /// 确认发牌、摸牌通知
    Ack,
    Win(WinOffer),
    Quad(QuadClaim),
    Triplet(Tile),
    Sequence(SequenceClaim),
    Drop(Tile),
    Pass,
}

impl OperatResponse {
    pub fn name(&self) -> &'static str {
        match self {
            OperatResponse::Ack => "ack",
            OperatResponse::Win(_) => "win",
            OperatResponse::Quad(_) => "quad",
            OperatResponse::Triplet(_) => "triplet",
            OperatResponse::Sequence(_) => "sequence",
            OperatResponse::Drop(_) => "drop",
            OperatResponse::Pass => "pass",
        }
    }
}

/// 牌桌操作（开局、续局）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TableOperat {
    Start,
    Continue,
}

/// 发给玩家代理的请求
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Request {
    Operat(OperatRequest),
    Table(TableOperat),
}

/// 玩家代理的回复
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Response {
    Operat(OperatResponse),
    Table { op: TableOperat, ok: bool },
}

/// 断线重连后下发的当前状态
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlayerSnapshot {
    pub seat: usize,
    pub hand: Vec<Tile>,
    pub melds: Vec<Meld>,
    pub waits: Vec<WaitKey>,
    pub wildcard: Option<Tile>,
}

/// 广播消息，不需要回复
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Notice {
    Joined { uid: u64, seat: usize },
    Dealt { fan: Option<Tile>, wildcard: Option<Tile> },
    Drew { seat: usize },
    Discarded { seat: usize, tile: Tile },
    Claimed { seat: usize, meld: Meld },
    Won { seat: usize, offer: WinOffer },
    RoundOver { winner: Option<usize>, turns: u32 },
    TableOperat { seat: usize, op: TableOperat, ok: bool },
    Resume(PlayerSnapshot),
}
