use std::fmt;

/// 麻将牌
///
/// 编码方式：`花色 * 100 + 点数`
/// - 万、筒、条：101-109、201-209、301-309
/// - 字牌：401-407（东南西北中发白）
///
/// 混牌（赖子）本身也是一张普通的牌，只是在某一局里被当作任意牌使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Tile(u16);

impl Tile {
    /// 数牌点数范围：1-9
    pub const MIN_RANK: u8 = 1;
    pub const MAX_RANK: u8 = 9;
    /// 字牌点数范围：1-7
    pub const HONOR_MAX_RANK: u8 = 7;
    /// 每种牌 4 张
    pub const COPIES: usize = 4;

    /// 红中（红中赖子玩法的固定混牌）
    pub const RED_DRAGON: Tile = Tile(405);

    /// 创建一张牌，验证输入有效性
    pub fn new(suit: Suit, rank: u8) -> Option<Self> {
        if rank < Self::MIN_RANK || rank > suit.max_rank() {
            return None;
        }
        Some(Tile(suit.index() as u16 * 100 + rank as u16))
    }

    /// 从编码创建牌
    pub fn from_code(code: u16) -> Option<Self> {
        let suit = Suit::from_index((code / 100) as u8)?;
        Self::new(suit, (code % 100) as u8)
    }

    pub fn code(self) -> u16 {
        self.0
    }

    /// 获取花色
    pub fn suit(self) -> Suit {
        match self.0 / 100 {
            1 => Suit::Wan,
            2 => Suit::Tong,
            3 => Suit::Tiao,
            _ => Suit::Honor,
        }
    }

    /// 获取点数（数牌 1-9，字牌 1-7）
    pub fn rank(self) -> u8 {
        (self.0 % 100) as u8
    }

    pub fn is_honor(self) -> bool {
        self.suit() == Suit::Honor
    }

    /// 同花色内偏移 `delta` 个点数，越界返回 None
    pub fn offset(self, delta: i8) -> Option<Tile> {
        let rank = self.rank() as i8 + delta;
        if rank < Self::MIN_RANK as i8 {
            return None;
        }
        Tile::new(self.suit(), rank as u8)
    }

    /// 由翻牌推出本局的混牌
    ///
    /// 同花色循环取下一张：数牌 9 之后是 1，字牌 7 之后是 1。
    pub fn successor(self) -> Tile {
        let max = self.suit().max_rank();
        let rank = if self.rank() >= max { Self::MIN_RANK } else { self.rank() + 1 };
        Tile(self.suit().index() as u16 * 100 + rank as u16)
    }

    /// 所有牌种（每种一张），用于生成牌墙
    pub fn all_kinds(with_honors: bool) -> impl Iterator<Item = Tile> {
        Suit::all()
            .into_iter()
            .filter(move |suit| with_honors || *suit != Suit::Honor)
            .flat_map(|suit| (Self::MIN_RANK..=suit.max_rank()).map(move |rank| Tile(suit.index() as u16 * 100 + rank as u16)))
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suit() {
            Suit::Honor => {
                const NAMES: [&str; 7] = ["东", "南", "西", "北", "中", "发", "白"];
                let name = NAMES.get(self.rank() as usize - 1).copied().unwrap_or("?");
                write!(f, "{}", name)
            }
            suit => write!(f, "{}{}", self.rank(), suit.name()),
        }
    }
}

/// 花色枚举
///
/// 数值与牌编码的百位一致，同时也是分桶后的桶号（0 号桶留给混牌）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Suit {
    Wan = 1,
    Tong = 2,
    Tiao = 3,
    Honor = 4,
}

impl Suit {
    pub fn all() -> [Suit; 4] {
        [Suit::Wan, Suit::Tong, Suit::Tiao, Suit::Honor]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Suit> {
        match index {
            1 => Some(Suit::Wan),
            2 => Some(Suit::Tong),
            3 => Some(Suit::Tiao),
            4 => Some(Suit::Honor),
            _ => None,
        }
    }

    pub fn max_rank(self) -> u8 {
        match self {
            Suit::Honor => Tile::HONOR_MAX_RANK,
            _ => Tile::MAX_RANK,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Suit::Wan => "万",
            Suit::Tong => "筒",
            Suit::Tiao => "条",
            Suit::Honor => "字",
        }
    }
}
