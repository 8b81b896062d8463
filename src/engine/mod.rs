/// 服务层
///
/// 大厅登记牌桌和玩家，远程代理把牌桌请求转发给连接任务

pub mod lobby;
pub mod remote;

pub use lobby::{Lobby, Seated, TableId};
pub use remote::{Outbound, RemoteActor};
