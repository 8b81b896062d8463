/// 牌相关模块
///
/// 包含牌（Tile）、牌墙（Wall）、手牌（Hand）和拆牌搜索的实现

pub mod tile;
pub mod tiles;
pub mod wall;
pub mod hand;
pub mod win_check;

// 重新导出常用类型
pub use tile::{Tile, Suit};
pub use tiles::SeparatedHand;
pub use wall::Wall;
pub use hand::Hand;
pub use win_check::{WinChecker, Decomposition, Group, MAX_NEED};
