//! 服务配置

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 引擎配置
///
/// 所有字段都有默认值，JSON 中只需写要覆盖的字段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 在线玩家的应答超时（毫秒）
    pub online_timeout_ms: u64,
    /// 牌墙保留张数，剩余不多于此数即流局
    pub wall_reserve: usize,
    /// 普通牌桌的局数
    pub normal_rounds: u32,
    /// 机器人牌桌的局数
    pub robot_rounds: u32,
    /// 洗牌随机种子（不设则每桌随机）
    pub seed: Option<u64>,
    /// 牌桌号范围 [first_table_id, max_table_id)
    pub first_table_id: u32,
    pub max_table_id: u32,
    /// 机器人 uid 范围 [first_robot_uid, max_robot_uid)
    pub first_robot_uid: u64,
    pub max_robot_uid: u64,
    /// 大厅最多保留多少张已结束牌桌的结果
    pub retained_results: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            online_timeout_ms: 10_000,
            wall_reserve: 10,
            normal_rounds: 10,
            robot_rounds: 1,
            seed: None,
            first_table_id: 10_000,
            max_table_id: 100_000,
            first_robot_uid: 100_000,
            max_robot_uid: 1_000_000,
            retained_results: 64,
        }
    }
}

impl Config {
    pub fn online_timeout(&self) -> Duration {
        Duration::from_millis(self.online_timeout_ms)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
