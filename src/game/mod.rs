/// 牌局逻辑模块
///
/// 包含规则、听牌分析、玩家协议、牌桌状态机和机器人

pub mod constants;
pub mod meld;
pub mod ting;
pub mod state;
pub mod action;
pub mod rules;
pub mod kong;
pub mod pong;
pub mod ready;
pub mod actor;
pub mod robot;
pub mod player;
pub mod table;
