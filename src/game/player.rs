use crate::error::ResponseError;
use crate::game::action::{
    Notice, OperatKinds, OperatRequest, OperatResponse, PlayerSnapshot, QuadClaim, Request, Response, SequenceClaim,
    TableOperat,
};
use crate::game::actor::Actor;
use crate::game::meld::{Meld, QuadKind};
use crate::game::ready::ReadyChecker;
use crate::game::robot::Robot;
use crate::game::state::PlayerView;
use crate::game::ting::PrewinSet;
use crate::tile::{Hand, Tile};
use log::{debug, warn};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

pub type Uid = u64;

/// 玩家连接
///
/// 大厅和牌桌共享：大厅负责断线、重连时切换代理，牌桌每次决策时读取。
/// 锁只在同步代码里持有，不跨 await。
pub struct PlayerLink {
    uid: Uid,
    robot: bool,
    online: AtomicBool,
    actor: RwLock<Option<Arc<dyn Actor>>>,
    snapshot: RwLock<PlayerSnapshot>,
}

impl PlayerLink {
    /// 真人玩家，初始在线
    pub fn human(uid: Uid, actor: Arc<dyn Actor>) -> Arc<Self> {
        Arc::new(Self {
            uid,
            robot: false,
            online: AtomicBool::new(true),
            actor: RwLock::new(Some(actor)),
            snapshot: RwLock::new(PlayerSnapshot::default()),
        })
    }

    /// 机器人座位，始终由机器人决策
    pub fn robot(uid: Uid) -> Arc<Self> {
        Arc::new(Self {
            uid,
            robot: true,
            online: AtomicBool::new(false),
            actor: RwLock::new(None),
            snapshot: RwLock::new(PlayerSnapshot::default()),
        })
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    pub fn is_robot(&self) -> bool {
        self.robot
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// 在线时的代理
    fn online_actor(&self) -> Option<Arc<dyn Actor>> {
        if self.robot || !self.is_online() {
            return None;
        }
        self.actor.read().clone()
    }

    /// 设置新的代理（重连），并置为在线
    pub fn set_agent(&self, actor: Arc<dyn Actor>) {
        *self.actor.write() = Some(actor);
        self.online.store(true, Ordering::Release);
    }

    /// 断线：丢弃代理
    pub fn set_offline(&self) {
        self.online.store(false, Ordering::Release);
        *self.actor.write() = None;
    }

    /// 超时：之后的决策交给机器人，代理保留以继续接收广播
    fn mark_offline(&self) {
        self.online.store(false, Ordering::Release);
    }

    pub fn send(&self, notice: Notice) {
        let actor = self.actor.read().clone();
        if let Some(actor) = actor {
            actor.send(notice);
        }
    }

    /// 最近一次的手牌、牌组、听牌
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshot.read().clone()
    }

    fn publish(&self, snapshot: PlayerSnapshot) {
        *self.snapshot.write() = snapshot;
    }
}

/// 玩家状态
pub struct Player {
    pub seat: usize,
    hand: Hand,
    melds: Vec<Meld>,
    prewin: PrewinSet,
    win_tile: Option<Tile>,
    /// 过胡锁定：放弃和牌后，直到自己下一次操作前不能再和
    declined_win: bool,
    link: Arc<PlayerLink>,
    robot: Robot,
    /// 在线时的应答超时
    timeout: Duration,
}

impl Player {
    pub fn new(seat: usize, link: Arc<PlayerLink>, timeout: Duration) -> Self {
        Self {
            seat,
            hand: Hand::new(),
            melds: Vec::new(),
            prewin: PrewinSet::new(),
            win_tile: None,
            declined_win: false,
            link,
            robot: Robot,
            timeout,
        }
    }

    pub fn uid(&self) -> Uid {
        self.link.uid()
    }

    pub fn link(&self) -> &Arc<PlayerLink> {
        &self.link
    }

    pub fn hand(&self) -> &[Tile] {
        self.hand.as_slice()
    }

    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    pub fn prewin(&self) -> &PrewinSet {
        &self.prewin
    }

    pub fn win_tile(&self) -> Option<Tile> {
        self.win_tile
    }

    pub fn has_declined_win(&self) -> bool {
        self.declined_win
    }

    /// 手牌加牌组的总张数
    pub fn tile_count(&self) -> usize {
        self.hand.len() + self.melds.iter().map(|meld| meld.tiles().len()).sum::<usize>()
    }

    /// 规则判定用的投影
    pub fn view(&self, seat_count: usize) -> PlayerView<'_> {
        PlayerView {
            seat: self.seat,
            seat_count,
            hand: self.hand.as_slice(),
            melds: &self.melds,
            prewin: &self.prewin,
            wildcard: self.hand.wildcard(),
            declined_win: self.declined_win,
        }
    }

    /// 带手牌快照的空请求
    pub fn request(&self) -> OperatRequest {
        OperatRequest::new(self.hand.as_slice(), self.hand.wildcard())
    }

    pub fn clear(&mut self) {
        self.hand.clear();
        self.melds.clear();
        self.prewin = PrewinSet::new();
        self.win_tile = None;
        self.declined_win = false;
        self.publish();
    }

    /// 发牌
    pub fn deal(&mut self, tiles: &[Tile]) {
        self.hand.extend(tiles);
    }

    /// 确定本局混牌后重新排序并计算听牌
    pub fn set_wildcard(&mut self, wildcard: Option<Tile>, checker: &ReadyChecker<'_>) {
        self.hand.set_wildcard(wildcard);
        self.refresh_waits(checker);
    }

    /// 摸牌
    pub fn receive(&mut self, tile: Tile) {
        self.hand.add_tile(tile);
        self.declined_win = false;
        self.publish();
    }

    /// 出牌
    pub fn discard(&mut self, tile: Tile, checker: &ReadyChecker<'_>) -> bool {
        if !self.hand.remove_tile(tile) {
            return false;
        }
        self.refresh_waits(checker);
        true
    }

    /// 碰：手里出两张
    pub fn pong(&mut self, tile: Tile) -> bool {
        if !self.hand.remove_n(tile, 2) {
            return false;
        }
        self.melds.push(Meld::Triplet { tile });
        self.declined_win = false;
        self.publish();
        true
    }

    /// 吃：手里出两张
    pub fn chow(&mut self, claim: &SequenceClaim) -> bool {
        let [a, b] = claim.hand;
        if !self.hand.has_tile(a) || !self.hand.has_tile(b) {
            return false;
        }
        self.hand.remove_up_to_three([Some(a), Some(b), None]);
        self.melds.push(Meld::Sequence { tiles: claim.meld });
        self.declined_win = false;
        self.publish();
        true
    }

    /// 杠
    ///
    /// 明杠出三张，暗杠出四张，补杠出一张并把对应的碰升级为杠。
    pub fn quad(&mut self, claim: &QuadClaim, checker: &ReadyChecker<'_>) -> bool {
        let tile = claim.tile;
        let applied = match claim.kind {
            QuadKind::Open => self.hand.remove_n(tile, 3),
            QuadKind::Concealed => self.hand.remove_n(tile, 4),
            QuadKind::Supplement => {
                let position = self.melds.iter().position(|m| *m == Meld::Triplet { tile });
                match position {
                    Some(index) if self.hand.remove_tile(tile) => {
                        self.melds.remove(index);
                        true
                    }
                    _ => false,
                }
            }
        };
        if !applied {
            return false;
        }
        self.melds.push(Meld::Quad { tile, kind: claim.kind });
        self.declined_win = false;
        self.refresh_waits(checker);
        true
    }

    /// 被抢杠时交出补杠的那张牌
    pub fn surrender(&mut self, tile: Tile) -> bool {
        let removed = self.hand.remove_tile(tile);
        self.publish();
        removed
    }

    /// 和牌，`claimed` 表示这张牌来自别人（点炮、抢杠）
    pub fn win(&mut self, tile: Tile, claimed: bool) {
        if claimed {
            self.hand.add_tile(tile);
        }
        self.win_tile = Some(tile);
        self.publish();
    }

    pub fn decline_win(&mut self) {
        self.declined_win = true;
    }

    /// 出牌兜底：手牌最后一张
    pub fn fallback_drop(&self) -> Option<Tile> {
        self.hand.last()
    }

    /// 重新计算听牌集合，整体替换
    pub fn refresh_waits(&mut self, checker: &ReadyChecker<'_>) {
        self.prewin = checker.compute_waiting_tiles(self.hand.as_slice(), &self.melds);
        self.publish();
    }

    fn publish(&self) {
        self.link.publish(PlayerSnapshot {
            seat: self.seat,
            hand: self.hand.as_slice().to_vec(),
            melds: self.melds.clone(),
            waits: self.prewin.keys().collect(),
            wildcard: self.hand.wildcard(),
        });
    }

    pub fn send(&self, notice: Notice) {
        self.link.send(notice);
    }

    /// 发送请求并等待回复
    ///
    /// 离线或机器人座位直接由机器人回复；在线玩家超时或出错时置为离线，
    /// 本次决策同样由机器人回复。
    pub async fn notify(&self, request: Request) -> Response {
        let Some(actor) = self.link.online_actor() else {
            return self.robot.respond(&request);
        };
        match time::timeout(self.timeout, actor.notify(request.clone())).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                warn!("uid {} seat {}: {}, robot takes over", self.uid(), self.seat, err);
                self.link.mark_offline();
                self.robot.respond(&request)
            }
            Err(_) => {
                warn!("uid {} seat {}: no answer within {:?}, robot takes over", self.uid(), self.seat, self.timeout);
                self.link.mark_offline();
                self.robot.respond(&request)
            }
        }
    }

    /// 发送决策请求并校验回复
    pub async fn decide(&self, request: OperatRequest) -> Result<OperatResponse, ResponseError> {
        debug!("uid {} seat {} offered {}", self.uid(), self.seat, request.kinds);
        match self.notify(Request::Operat(request.clone())).await {
            Response::Operat(response) => self.validate(&request, response),
            Response::Table { .. } => Err(ResponseError::NotOffered { response: "table", offered: request.kinds }),
        }
    }

    /// 回复必须是请求中提供的选项之一
    ///
    /// 出牌必须是手里有的牌；放弃只能用于没有出牌要求的请求。
    pub fn validate(&self, request: &OperatRequest, response: OperatResponse) -> Result<OperatResponse, ResponseError> {
        let kinds = request.kinds;
        let valid = match &response {
            OperatResponse::Ack => kinds.intersects(OperatKinds::DEAL | OperatKinds::DRAW),
            OperatResponse::Pass => !kinds.contains(OperatKinds::DROP),
            OperatResponse::Win(offer) => kinds.contains(OperatKinds::WIN) && request.win.as_ref() == Some(offer),
            OperatResponse::Quad(claim) => kinds.contains(OperatKinds::QUAD) && request.quads.contains(claim),
            OperatResponse::Triplet(tile) => kinds.contains(OperatKinds::TRIPLET) && request.triplet == Some(*tile),
            OperatResponse::Sequence(claim) => {
                kinds.contains(OperatKinds::SEQUENCE) && request.sequences.contains(claim)
            }
            OperatResponse::Drop(tile) => {
                if kinds.contains(OperatKinds::DROP) && !self.hand.has_tile(*tile) {
                    return Err(ResponseError::TileNotInHand(*tile));
                }
                kinds.contains(OperatKinds::DROP)
            }
        };
        if valid {
            Ok(response)
        } else {
            Err(ResponseError::NotOffered { response: response.name(), offered: kinds })
        }
    }

    /// 牌桌操作确认（开局、续局）
    pub async fn confirm(&self, op: TableOperat) -> bool {
        match self.notify(Request::Table(op)).await {
            Response::Table { op: got, ok } if got == op => ok,
            Response::Table { op: got, .. } => {
                let err = ResponseError::TableOperatMismatch { expected: op, got: Some(got) };
                warn!("uid {}: {}", self.uid(), err);
                false
            }
            Response::Operat(_) => {
                let err = ResponseError::TableOperatMismatch { expected: op, got: None };
                warn!("uid {}: {}", self.uid(), err);
                false
            }
        }
    }
}
