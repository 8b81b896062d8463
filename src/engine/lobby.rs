use crate::config::Config;
use crate::error::TableError;
use crate::game::action::Notice;
use crate::game::actor::Actor;
use crate::game::constants::NUM_PLAYERS;
use crate::game::player::{PlayerLink, Uid};
use crate::game::rules::RuleKind;
use crate::game::state::TableKind;
use crate::game::table::{RoundResult, Table};
use log::{info, warn};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub type TableId = u32;

/// 入座结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seated {
    pub tid: TableId,
    pub seat: usize,
}

/// 大厅：牌桌和玩家的登记处
///
/// 坐满四人时为牌桌启动一个任务，牌桌结束后自动注销。
#[derive(Clone)]
pub struct Lobby {
    shared: Arc<Mutex<LobbyState>>,
    config: Arc<Config>,
}

struct TableEntry {
    kind: TableKind,
    rule: RuleKind,
    seats: Vec<Arc<PlayerLink>>,
    started: bool,
}

struct LobbyState {
    tables: HashMap<TableId, TableEntry>,
    players: HashMap<Uid, TableId>,
    tasks: HashMap<TableId, JoinHandle<Vec<RoundResult>>>,
    /// 已结束、结果还没被取走的牌桌，按结束先后
    finished: VecDeque<TableId>,
    next_table_id: TableId,
    next_robot_uid: Uid,
}

impl LobbyState {
    /// 结果还没被取走的牌桌号不会被重新分配
    fn allocate_table_id(&mut self, config: &Config) -> Result<TableId, TableError> {
        let span = config.max_table_id.saturating_sub(config.first_table_id);
        for _ in 0..span {
            let tid = self.next_table_id;
            self.next_table_id = if tid + 1 >= config.max_table_id { config.first_table_id } else { tid + 1 };
            if !self.tables.contains_key(&tid) && !self.tasks.contains_key(&tid) {
                return Ok(tid);
            }
        }
        Err(TableError::NoTableIdLeft)
    }

    /// `reserved` 是本次已经选定、还没登记的 uid
    fn allocate_robot_uid(&mut self, config: &Config, reserved: &[Uid]) -> Result<Uid, TableError> {
        let span = config.max_robot_uid.saturating_sub(config.first_robot_uid);
        for _ in 0..span {
            let uid = self.next_robot_uid;
            self.next_robot_uid = if uid + 1 >= config.max_robot_uid { config.first_robot_uid } else { uid + 1 };
            if !self.players.contains_key(&uid) && !reserved.contains(&uid) {
                return Ok(uid);
            }
        }
        Err(TableError::NoRobotUidLeft)
    }

    /// 玩家所在的牌桌和连接
    fn link_of(&self, uid: Uid) -> Result<(TableId, usize, Arc<PlayerLink>), TableError> {
        let tid = *self.players.get(&uid).ok_or(TableError::PlayerNotFound(uid))?;
        let entry = self.tables.get(&tid).ok_or(TableError::TableNotFound(tid))?;
        entry
            .seats
            .iter()
            .enumerate()
            .find(|(_, link)| link.uid() == uid)
            .map(|(seat, link)| (tid, seat, link.clone()))
            .ok_or(TableError::PlayerNotFound(uid))
    }
}

impl Lobby {
    pub fn new(config: Config) -> Self {
        let state = LobbyState {
            tables: HashMap::new(),
            players: HashMap::new(),
            tasks: HashMap::new(),
            finished: VecDeque::new(),
            next_table_id: config.first_table_id,
            next_robot_uid: config.first_robot_uid,
        };
        Self { shared: Arc::new(Mutex::new(state)), config: Arc::new(config) }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 开桌，创建者坐 0 号位
    ///
    /// 机器人牌桌另外三个座位由机器人占据，立即开局。
    pub async fn create_table(
        &self,
        uid: Uid,
        actor: Arc<dyn Actor>,
        kind: TableKind,
        rule: RuleKind,
    ) -> Result<Seated, TableError> {
        let mut guard = self.shared.lock().await;
        let state = &mut *guard;
        if state.players.contains_key(&uid) {
            return Err(TableError::AlreadyJoined(uid));
        }
        let tid = state.allocate_table_id(&self.config)?;

        // 先选齐机器人再登记，分配失败时不留下任何记录
        let mut reserved = vec![uid];
        if kind == TableKind::Robot {
            for _ in 1..NUM_PLAYERS {
                let robot = state.allocate_robot_uid(&self.config, &reserved)?;
                reserved.push(robot);
            }
        }
        let mut seats = vec![PlayerLink::human(uid, actor)];
        for &robot in &reserved[1..] {
            state.players.insert(robot, tid);
            seats.push(PlayerLink::robot(robot));
        }
        state.players.insert(uid, tid);
        state.tables.insert(tid, TableEntry { kind, rule, seats, started: false });
        info!("uid {} created table {} ({:?}, {:?})", uid, tid, kind, rule);

        self.start_if_full(state, tid);
        Ok(Seated { tid, seat: 0 })
    }

    /// 加入已有的牌桌
    pub async fn join_table(&self, uid: Uid, actor: Arc<dyn Actor>, tid: TableId) -> Result<Seated, TableError> {
        let mut guard = self.shared.lock().await;
        let state = &mut *guard;
        if state.players.contains_key(&uid) {
            return Err(TableError::AlreadyJoined(uid));
        }
        let entry = state.tables.get_mut(&tid).ok_or(TableError::TableNotFound(tid))?;
        if entry.started {
            return Err(TableError::AlreadyStarted(tid));
        }
        if entry.seats.len() >= NUM_PLAYERS {
            return Err(TableError::TableFull);
        }

        let seat = entry.seats.len();
        entry.seats.push(PlayerLink::human(uid, actor));
        for link in &entry.seats {
            link.send(Notice::Joined { uid, seat });
        }
        state.players.insert(uid, tid);
        info!("uid {} joined table {} at seat {}", uid, tid, seat);

        self.start_if_full(state, tid);
        Ok(Seated { tid, seat })
    }

    /// 离开牌桌
    ///
    /// 开局前直接让出座位，空桌随即注销；开局后座位交给机器人，玩家不能再重连。
    pub async fn leave(&self, uid: Uid) -> Result<(), TableError> {
        let mut guard = self.shared.lock().await;
        let state = &mut *guard;
        let (tid, _, link) = state.link_of(uid)?;
        state.players.remove(&uid);

        let entry = state.tables.get_mut(&tid).ok_or(TableError::TableNotFound(tid))?;
        if entry.started {
            link.set_offline();
            info!("uid {} left running table {}, robot keeps the seat", uid, tid);
            return Ok(());
        }
        entry.seats.retain(|seat| seat.uid() != uid);
        info!("uid {} left table {}", uid, tid);
        if entry.seats.is_empty() {
            state.tables.remove(&tid);
            info!("table {} removed", tid);
        }
        Ok(())
    }

    /// 断线：开局前等同于离开，开局后由机器人代打
    pub async fn disconnect(&self, uid: Uid) -> Result<(), TableError> {
        let started = {
            let state = self.shared.lock().await;
            let (tid, _, link) = state.link_of(uid)?;
            let started = state.tables.get(&tid).is_some_and(|entry| entry.started);
            if started {
                link.set_offline();
                info!("uid {} disconnected from table {}", uid, tid);
            }
            started
        };
        if started {
            Ok(())
        } else {
            self.leave(uid).await
        }
    }

    /// 重连：换上新的代理，并下发当前手牌、牌组和听牌
    pub async fn reconnect(&self, uid: Uid, actor: Arc<dyn Actor>) -> Result<Seated, TableError> {
        let state = self.shared.lock().await;
        let (tid, seat, link) = state.link_of(uid)?;
        link.set_agent(actor.clone());
        actor.send(Notice::Resume(link.snapshot()));
        info!("uid {} reconnected to table {} seat {}", uid, tid, seat);
        Ok(Seated { tid, seat })
    }

    pub async fn table_of(&self, uid: Uid) -> Option<TableId> {
        self.shared.lock().await.players.get(&uid).copied()
    }

    pub async fn table_count(&self) -> usize {
        self.shared.lock().await.tables.len()
    }

    /// 牌桌上的玩家，按座位顺序
    pub async fn seats(&self, tid: TableId) -> Option<Vec<Uid>> {
        let state = self.shared.lock().await;
        state.tables.get(&tid).map(|entry| entry.seats.iter().map(|link| link.uid()).collect())
    }

    pub async fn is_started(&self, tid: TableId) -> Option<bool> {
        self.shared.lock().await.tables.get(&tid).map(|entry| entry.started)
    }

    /// 等待牌桌结束，返回各局结果
    ///
    /// 结果保留到被取走为止，最多保留 `retained_results` 张牌桌，超出时丢弃
    /// 最早结束的。牌桌还没开局，或者结果已被取走、丢弃时返回 None。
    pub async fn wait(&self, tid: TableId) -> Option<Vec<RoundResult>> {
        let handle = {
            let mut state = self.shared.lock().await;
            state.finished.retain(|&finished| finished != tid);
            state.tasks.remove(&tid)?
        };
        match handle.await {
            Ok(results) => Some(results),
            Err(err) => {
                warn!("table {} task failed: {}", tid, err);
                None
            }
        }
    }

    fn start_if_full(&self, state: &mut LobbyState, tid: TableId) {
        let Some(entry) = state.tables.get_mut(&tid) else {
            return;
        };
        if entry.started || entry.seats.len() < NUM_PLAYERS {
            return;
        }
        entry.started = true;

        let mut table = Table::new(tid, entry.kind, entry.rule.build(), entry.seats.clone(), self.config.clone());
        let lobby = self.clone();
        let handle = tokio::spawn(async move {
            let results = table.run().await;
            lobby.release(tid).await;
            results
        });
        state.tasks.insert(tid, handle);
        info!("table {} started", tid);
    }

    /// 牌桌结束后注销牌桌和座位上的玩家
    async fn release(&self, tid: TableId) {
        let mut guard = self.shared.lock().await;
        let state = &mut *guard;
        if let Some(entry) = state.tables.remove(&tid) {
            for link in &entry.seats {
                if state.players.get(&link.uid()) == Some(&tid) {
                    state.players.remove(&link.uid());
                }
            }
        }
        if state.tasks.contains_key(&tid) {
            state.finished.push_back(tid);
        }
        while state.finished.len() > self.config.retained_results {
            let Some(oldest) = state.finished.pop_front() else {
                break;
            };
            if state.tasks.remove(&oldest).is_some() {
                warn!("table {} results discarded unread", oldest);
            }
        }
        info!("table {} released", tid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::robot::Robot;

    fn lobby() -> Lobby {
        Lobby::new(Config { first_table_id: 1, max_table_id: 3, seed: Some(3), ..Config::default() })
    }

    #[tokio::test]
    async fn test_table_ids_cycle_and_run_out() {
        let lobby = lobby();
        let first = lobby.create_table(1, Arc::new(Robot), TableKind::Normal, RuleKind::Default).await.unwrap();
        let second = lobby.create_table(2, Arc::new(Robot), TableKind::Normal, RuleKind::Default).await.unwrap();
        assert_eq!((first.tid, second.tid), (1, 2));
        assert_eq!(
            lobby.create_table(3, Arc::new(Robot), TableKind::Normal, RuleKind::Default).await,
            Err(TableError::NoTableIdLeft)
        );

        lobby.leave(1).await.unwrap();
        let reused = lobby.create_table(3, Arc::new(Robot), TableKind::Normal, RuleKind::Default).await.unwrap();
        assert_eq!(reused.tid, 1);
    }

    #[tokio::test]
    async fn test_robot_uids_run_out_without_leaking() {
        let lobby = Lobby::new(Config { first_robot_uid: 500, max_robot_uid: 502, ..Config::default() });
        assert_eq!(
            lobby.create_table(1, Arc::new(Robot), TableKind::Robot, RuleKind::Default).await,
            Err(TableError::NoRobotUidLeft)
        );
        assert_eq!(lobby.table_of(500).await, None);
        assert_eq!(lobby.table_of(501).await, None);
        assert_eq!(lobby.table_count().await, 0);

        let seated = lobby.create_table(500, Arc::new(Robot), TableKind::Normal, RuleKind::Default).await;
        assert_eq!(seated.map(|seated| seated.seat), Ok(0));
    }

    #[tokio::test]
    async fn test_join_errors() {
        let lobby = lobby();
        let seated = lobby.create_table(1, Arc::new(Robot), TableKind::Normal, RuleKind::Default).await.unwrap();
        assert_eq!(lobby.join_table(9, Arc::new(Robot), 77).await, Err(TableError::TableNotFound(77)));
        assert_eq!(lobby.join_table(1, Arc::new(Robot), seated.tid).await, Err(TableError::AlreadyJoined(1)));
        assert_eq!(lobby.join_table(2, Arc::new(Robot), seated.tid).await, Ok(Seated { tid: seated.tid, seat: 1 }));
        assert_eq!(lobby.seats(seated.tid).await, Some(vec![1, 2]));
        assert_eq!(lobby.is_started(seated.tid).await, Some(false));
    }
}
