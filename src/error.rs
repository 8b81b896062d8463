use crate::game::action::{OperatKinds, TableOperat};
use crate::tile::Tile;
use thiserror::Error;

/// 牌桌登记相关错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table is full")]
    TableFull,

    #[error("table {0} does not exist")]
    TableNotFound(u32),

    #[error("player {0} is not seated at any table")]
    PlayerNotFound(u64),

    #[error("player {0} already joined a table")]
    AlreadyJoined(u64),

    #[error("table {0} has already started")]
    AlreadyStarted(u32),

    #[error("no free table id left")]
    NoTableIdLeft,

    #[error("no free robot uid left")]
    NoRobotUidLeft,
}

/// 玩家回复与请求不匹配
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("response `{response}` was not offered (offered: {offered})")]
    NotOffered { response: &'static str, offered: OperatKinds },

    #[error("tile {0} is not in hand")]
    TileNotInHand(Tile),

    #[error("expected answer to table operation {expected:?}, got {got:?}")]
    TableOperatMismatch { expected: TableOperat, got: Option<TableOperat> },
}

/// 玩家代理通信错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActorError {
    #[error("actor disconnected")]
    Disconnected,

    #[error("actor dropped the reply channel")]
    ReplyDropped,
}

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// 牌局流程错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("wall ran out while dealing")]
    WallExhausted,

    #[error("table needs {expected} seats, has {seated}")]
    SeatsMissing { expected: usize, seated: usize },
}
