/// 牌桌常量

/// 座位数
pub const NUM_PLAYERS: usize = 4;

/// 起手张数
pub const HAND_SIZE: usize = 13;
