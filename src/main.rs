//! 可执行文件入口：用机器人跑若干张牌桌（用于测试和调试）

use clap::Parser;
use hun_mahjong::{Config, Lobby, Robot, RuleKind, TableKind};
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Runs robot-only mahjong tables")]
struct Cli {
    /// 玩法
    #[arg(long, value_enum, default_value_t = RuleKind::Default)]
    rule: RuleKind,

    /// 同时开的牌桌数
    #[arg(long, default_value_t = 1)]
    tables: u32,

    /// 每桌局数（机器人不同意续局，超过 1 时只打 1 局）
    #[arg(long)]
    rounds: Option<u32>,

    /// 洗牌随机种子
    #[arg(long)]
    seed: Option<u64>,

    /// 在线玩家应答超时（毫秒）
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// JSON 配置文件
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!("{}: {}", path.display(), err);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    if let Some(rounds) = cli.rounds {
        config.robot_rounds = rounds;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.online_timeout_ms = timeout_ms;
    }

    let lobby = Lobby::new(config);
    let mut tables = Vec::new();
    for uid in 1..=u64::from(cli.tables) {
        match lobby.create_table(uid, Arc::new(Robot), TableKind::Robot, cli.rule).await {
            Ok(seated) => tables.push(seated.tid),
            Err(err) => error!("uid {}: {}", uid, err),
        }
    }

    let mut wins = 0;
    let mut draws = 0;
    for tid in tables {
        let Some(results) = lobby.wait(tid).await else {
            continue;
        };
        for result in results {
            match (result.winner, result.offer) {
                (Some(seat), Some(offer)) => {
                    wins += 1;
                    info!("table {} round {}: seat {} {:?} on {}", tid, result.round, seat, offer.kind, offer.tile);
                }
                _ => draws += 1,
            }
        }
    }
    info!("{} rounds won, {} drawn", wins, draws);
}
