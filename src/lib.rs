/// 带混牌的四人麻将牌桌引擎
///
/// 混牌听牌分析、可替换的玩法规则、异步玩家协议、牌桌状态机和托管机器人

pub mod tile;
pub mod game;
pub mod engine;
pub mod config;
pub mod error;

// 重新导出常用类型
pub use tile::{Tile, Suit, Wall, Hand};
pub use game::meld::{Meld, QuadKind};
pub use game::ting::{PrewinSet, Ting, WaitKey};
pub use game::action::{Notice, OperatKinds, OperatRequest, OperatResponse, Request, Response, TableOperat, WinKind, WinOffer};
pub use game::rules::{DefaultRule, Rule, RuleKind, WildcardHeavyRule};
pub use game::ready::ReadyChecker;
pub use game::actor::{Actor, FnActor};
pub use game::robot::Robot;
pub use game::player::{Player, PlayerLink, Uid};
pub use game::state::{Phase, TableKind};
pub use game::table::{RoundResult, Table};
pub use engine::{Lobby, RemoteActor, Seated, TableId};
pub use config::Config;
pub use error::{ActorError, ConfigError, GameError, ResponseError, TableError};
