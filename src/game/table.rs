use crate::config::Config;
use crate::error::GameError;
use crate::game::action::{
    DealInfo, Notice, OperatKinds, OperatResponse, QuadClaim, TableOperat, WinOffer,
};
use crate::game::constants::{HAND_SIZE, NUM_PLAYERS};
use crate::game::meld::{Meld, QuadKind};
use crate::game::player::{Player, PlayerLink};
use crate::game::ready::ReadyChecker;
use crate::game::rules::Rule;
use crate::game::state::{Discard, DiscardKind, Phase, TableKind, TurnOutcome};
use crate::tile::{Tile, Wall};
use futures::future::join_all;
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// 一局的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    /// 第几局（从 1 开始）
    pub round: u32,
    pub winner: Option<usize>,
    pub offer: Option<WinOffer>,
    /// 本局打出的牌数
    pub turns: u32,
    pub wall_remaining: usize,
}

/// 牌桌
///
/// 一张牌桌由一个任务独占驱动，所有状态只在这个任务里修改；
/// 和玩家的交互全部经过 `Player::notify`。
pub struct Table {
    tid: u32,
    kind: TableKind,
    rule: Arc<dyn Rule>,
    config: Arc<Config>,
    players: Vec<Player>,
    wall: Wall,
    /// 每个座位打出且没被吃碰杠的牌
    discards: Vec<Vec<Tile>>,
    /// 翻开的牌
    fan: Option<Tile>,
    wildcard: Option<Tile>,
    /// 下一个摸牌的座位
    turn: usize,
    winner: Option<usize>,
    win: Option<WinOffer>,
    turns: u32,
    play_count: u32,
    avail_count: u32,
    phase: Phase,
    rng: StdRng,
}

impl Table {
    pub fn new(tid: u32, kind: TableKind, rule: Arc<dyn Rule>, links: Vec<Arc<PlayerLink>>, config: Arc<Config>) -> Self {
        let timeout = config.online_timeout();
        let players: Vec<Player> =
            links.into_iter().enumerate().map(|(seat, link)| Player::new(seat, link, timeout)).collect();
        let avail_count = match kind {
            TableKind::Normal => config.normal_rounds,
            TableKind::Robot => config.robot_rounds,
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ u64::from(tid)),
            None => StdRng::from_entropy(),
        };
        let wall = Wall::from_kinds(rule.wall_kinds());
        Self {
            tid,
            kind,
            discards: vec![Vec::new(); players.len()],
            players,
            wall,
            fan: None,
            wildcard: None,
            turn: 0,
            winner: None,
            win: None,
            turns: 0,
            play_count: 0,
            avail_count,
            phase: Phase::WaitingForSeats,
            rng,
            rule,
            config,
        }
    }

    pub fn tid(&self) -> u32 {
        self.tid
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn wildcard(&self) -> Option<Tile> {
        self.wildcard
    }

    pub fn fan(&self) -> Option<Tile> {
        self.fan
    }

    pub fn discards(&self, seat: usize) -> &[Tile] {
        self.discards.get(seat).map_or(&[][..], Vec::as_slice)
    }

    pub fn wall_remaining(&self) -> usize {
        self.wall.remaining_count()
    }

    pub fn play_count(&self) -> u32 {
        self.play_count
    }

    /// 一副牌的总张数
    pub fn total_tiles(&self) -> usize {
        self.wall.total_count()
    }

    /// 当前所有位置上的牌数：牌墙、手牌、牌组、牌河、翻牌
    pub fn tile_count(&self) -> usize {
        let held: usize = self.players.iter().map(Player::tile_count).sum();
        let discarded: usize = self.discards.iter().map(Vec::len).sum();
        self.wall.remaining_count() + held + discarded + usize::from(self.fan.is_some())
    }

    /// 驱动整张牌桌：开局确认、打牌、续局确认，直到局数用完或有人拒绝
    pub async fn run(&mut self) -> Vec<RoundResult> {
        info!("table {} opened ({:?}, rule {}, {} rounds)", self.tid, self.kind, self.rule.name(), self.avail_count);
        let mut results = Vec::new();
        while self.avail_count > 0 {
            if !self.confirm_all(TableOperat::Start).await {
                info!("table {}: start declined", self.tid);
                break;
            }
            match self.play_round().await {
                Ok(result) => results.push(result),
                Err(err) => {
                    error!("table {}: {}", self.tid, err);
                    break;
                }
            }
            self.avail_count -= 1;
            if self.avail_count > 0 && !self.confirm_all(TableOperat::Continue).await {
                info!("table {}: continue declined", self.tid);
                break;
            }
        }
        self.phase = Phase::Closed;
        info!("table {} closed after {} rounds", self.tid, self.play_count);
        results
    }

    /// 所有玩家并发确认，全部同意才返回 true
    async fn confirm_all(&self, op: TableOperat) -> bool {
        let answers = join_all(self.players.iter().map(|p| p.confirm(op))).await;
        for (seat, &ok) in answers.iter().enumerate() {
            self.broadcast(Notice::TableOperat { seat, op, ok });
        }
        answers.into_iter().all(|ok| ok)
    }

    fn broadcast(&self, notice: Notice) {
        for player in &self.players {
            player.send(notice.clone());
        }
    }

    fn clear(&mut self) {
        for player in &mut self.players {
            player.clear();
        }
        for pile in &mut self.discards {
            pile.clear();
        }
        self.fan = None;
        self.wildcard = None;
        self.turn = 0;
        self.winner = None;
        self.win = None;
        self.turns = 0;
    }

    /// 打一局
    pub async fn play_round(&mut self) -> Result<RoundResult, GameError> {
        if self.players.len() != NUM_PLAYERS {
            return Err(GameError::SeatsMissing { expected: NUM_PLAYERS, seated: self.players.len() });
        }
        self.clear();

        self.phase = Phase::Shuffling;
        self.wall = Wall::from_kinds(self.rule.wall_kinds());
        self.wall.shuffle(&mut self.rng);

        self.phase = Phase::Dealing;
        self.deal().await?;

        self.phase = Phase::Playing;
        while self.wall.remaining_count() > self.config.wall_reserve && self.winner.is_none() {
            let seat = self.turn;
            self.turn = (seat + 1) % self.players.len();
            match self.take_turn(seat, DiscardKind::SelfDraw).await {
                TurnOutcome::Discard(discard) => self.resolve_discard(discard).await,
                TurnOutcome::Won | TurnOutcome::Exhausted => break,
            }
        }

        self.play_count += 1;
        self.phase = Phase::RoundOver;
        match (self.winner, self.win) {
            (Some(seat), Some(offer)) => info!(
                "table {} round {}: seat {} won by {:?} on {} after {} turns",
                self.tid, self.play_count, seat, offer.kind, offer.tile, self.turns
            ),
            _ => info!("table {} round {}: drawn, {} tiles left", self.tid, self.play_count, self.wall.remaining_count()),
        }
        self.broadcast(Notice::RoundOver { winner: self.winner, turns: self.turns });

        Ok(RoundResult {
            round: self.play_count,
            winner: self.winner,
            offer: self.win,
            turns: self.turns,
            wall_remaining: self.wall.remaining_count(),
        })
    }

    /// 发牌、定混
    async fn deal(&mut self) -> Result<(), GameError> {
        for seat in 0..self.players.len() {
            let mut dealt = Vec::with_capacity(HAND_SIZE);
            for _ in 0..HAND_SIZE {
                dealt.push(self.wall.draw().ok_or(GameError::WallExhausted)?);
            }
            self.players[seat].deal(&dealt);
        }

        if let Some(fixed) = self.rule.fixed_wildcard() {
            self.wildcard = Some(fixed);
        } else if self.rule.has_wildcard() {
            let fan = self.wall.draw().ok_or(GameError::WallExhausted)?;
            self.fan = Some(fan);
            self.wildcard = Some(fan.successor());
        }
        debug!("table {}: fan {:?}, wildcard {:?}", self.tid, self.fan, self.wildcard);

        let checker = ReadyChecker::new(&*self.rule, self.wildcard);
        for player in &mut self.players {
            player.set_wildcard(self.wildcard, &checker);
        }
        self.broadcast(Notice::Dealt { fan: self.fan, wildcard: self.wildcard });

        let (fan, wildcard) = (self.fan, self.wildcard);
        let acks = self.players.iter().map(|player| {
            let mut request = player.request().with_kinds(OperatKinds::DEAL);
            request.deal = Some(DealInfo { seat: player.seat, fan, wildcard });
            player.decide(request)
        });
        for (seat, ack) in join_all(acks).await.into_iter().enumerate() {
            if let Err(err) = ack {
                warn!("table {} seat {}: deal ack: {}", self.tid, seat, err);
            }
        }
        Ok(())
    }

    /// 摸牌并出牌
    ///
    /// 摸牌后可以自摸、暗杠、补杠或出牌。杠后继续补摸，补杠亮出的牌
    /// 先给其他玩家抢杠的机会。
    async fn take_turn(&mut self, seat: usize, kind: DiscardKind) -> TurnOutcome {
        let seat_count = self.players.len();
        let mut kind = kind;
        loop {
            let Some(tile) = self.wall.draw() else {
                return TurnOutcome::Exhausted;
            };
            if kind == DiscardKind::SelfDraw && self.wall.remaining_count() <= self.config.wall_reserve {
                kind = DiscardKind::LastTile;
            }
            self.players[seat].receive(tile);
            self.broadcast(Notice::Drew { seat });

            let mut draw = self.players[seat].request().with_kinds(OperatKinds::DRAW);
            draw.draw = Some(tile);
            if let Err(err) = self.players[seat].decide(draw).await {
                warn!("table {} seat {}: draw ack: {}", self.tid, seat, err);
            }

            let drawn = Discard::new(tile, seat, kind);
            let mut request = self.players[seat].request().with_kinds(OperatKinds::DROP);
            {
                let view = self.players[seat].view(seat_count);
                self.rule.can_claim_concealed_quad(&view, &mut request);
                self.rule.can_claim_supplement_quad(&view, &mut request);
                self.rule.can_win(&drawn, &view, &mut request);
            }

            match self.players[seat].decide(request).await {
                Ok(OperatResponse::Win(offer)) => {
                    self.settle_win(seat, offer, false);
                    return TurnOutcome::Won;
                }
                Ok(OperatResponse::Quad(claim)) => {
                    if claim.kind == QuadKind::Supplement {
                        let exposed = Discard::new(claim.tile, seat, DiscardKind::SupplementQuad);
                        if self.offer_win(&exposed).await {
                            return TurnOutcome::Won;
                        }
                    }
                    self.apply_quad(seat, &claim);
                    kind = DiscardKind::AfterQuad;
                }
                Ok(OperatResponse::Drop(tile)) => return self.drop_tile(seat, tile),
                Ok(other) => {
                    warn!("table {} seat {}: unexpected {} on drop", self.tid, seat, other.name());
                    return self.fallback_drop(seat);
                }
                Err(err) => {
                    warn!("table {} seat {}: {}", self.tid, seat, err);
                    return self.fallback_drop(seat);
                }
            }
        }
    }

    fn drop_tile(&mut self, seat: usize, tile: Tile) -> TurnOutcome {
        let checker = ReadyChecker::new(&*self.rule, self.wildcard);
        if !self.players[seat].discard(tile, &checker) {
            return TurnOutcome::Exhausted;
        }
        debug!("table {} seat {} drops {}", self.tid, seat, tile);
        self.broadcast(Notice::Discarded { seat, tile });
        TurnOutcome::Discard(Discard::new(tile, seat, DiscardKind::Normal))
    }

    fn fallback_drop(&mut self, seat: usize) -> TurnOutcome {
        match self.players[seat].fallback_drop() {
            Some(tile) => self.drop_tile(seat, tile),
            None => TurnOutcome::Exhausted,
        }
    }

    fn apply_quad(&mut self, seat: usize, claim: &QuadClaim) {
        let checker = ReadyChecker::new(&*self.rule, self.wildcard);
        if self.players[seat].quad(claim, &checker) {
            self.broadcast(Notice::Claimed { seat, meld: Meld::Quad { tile: claim.tile, kind: claim.kind } });
        } else {
            warn!("table {} seat {}: quad {} could not be applied", self.tid, seat, claim.tile);
        }
    }

    fn settle_win(&mut self, seat: usize, offer: WinOffer, claimed: bool) {
        self.players[seat].win(offer.tile, claimed);
        self.winner = Some(seat);
        self.win = Some(offer);
        self.broadcast(Notice::Won { seat, offer });
    }

    /// 按座位顺序问和
    ///
    /// 第一个接受的玩家和牌；放弃的玩家进入过胡状态。
    async fn offer_win(&mut self, discard: &Discard) -> bool {
        let seat_count = self.players.len();
        for step in 1..seat_count {
            let seat = (discard.from + step) % seat_count;
            let mut request = self.players[seat].request();
            let offered = {
                let view = self.players[seat].view(seat_count);
                self.rule.can_win(discard, &view, &mut request)
            };
            if !offered {
                continue;
            }
            match self.players[seat].decide(request).await {
                Ok(OperatResponse::Win(offer)) => {
                    if discard.kind == DiscardKind::SupplementQuad {
                        self.players[discard.from].surrender(discard.tile);
                    }
                    self.settle_win(seat, offer, true);
                    return true;
                }
                Ok(_) => self.players[seat].decline_win(),
                Err(err) => {
                    warn!("table {} seat {}: {}", self.tid, seat, err);
                    self.players[seat].decline_win();
                }
            }
        }
        false
    }

    /// 处理一张打出的牌
    ///
    /// 优先级：和 > 杠、碰 > 吃。被吃碰杠后，认领者打出的牌继续按同样的顺序处理。
    async fn resolve_discard(&mut self, discard: Discard) {
        let mut pending = discard;
        loop {
            if self.offer_win(&pending).await {
                return;
            }
            self.discards[pending.from].push(pending.tile);
            self.turns += 1;

            let outcome = match self.offer_quad_or_triplet(&pending).await {
                Some(outcome) => outcome,
                None => match self.offer_sequence(&pending).await {
                    Some(outcome) => outcome,
                    None => return,
                },
            };
            match outcome {
                TurnOutcome::Discard(next) => pending = next,
                TurnOutcome::Won | TurnOutcome::Exhausted => return,
            }
        }
    }

    /// 从出牌者下家开始依次问杠、碰
    async fn offer_quad_or_triplet(&mut self, discard: &Discard) -> Option<TurnOutcome> {
        let seat_count = self.players.len();
        for step in 1..seat_count {
            let seat = (discard.from + step) % seat_count;
            let mut request = self.players[seat].request();
            let offered = {
                let view = self.players[seat].view(seat_count);
                let quad = self.rule.can_claim_open_quad(discard, &view, &mut request);
                let triplet = self.rule.can_claim_triplet(discard, &view, &mut request);
                quad || triplet
            };
            if !offered {
                continue;
            }
            match self.players[seat].decide(request).await {
                Ok(OperatResponse::Quad(claim)) => {
                    self.take_claimed(discard);
                    self.apply_quad(seat, &claim);
                    self.turn = (seat + 1) % seat_count;
                    return Some(self.take_turn(seat, DiscardKind::AfterQuad).await);
                }
                Ok(OperatResponse::Triplet(tile)) => {
                    self.take_claimed(discard);
                    if self.players[seat].pong(tile) {
                        self.broadcast(Notice::Claimed { seat, meld: Meld::Triplet { tile } });
                    }
                    self.turn = (seat + 1) % seat_count;
                    return Some(self.drop_after_claim(seat).await);
                }
                Ok(_) => {}
                Err(err) => warn!("table {} seat {}: {}", self.tid, seat, err),
            }
        }
        None
    }

    /// 只问下家吃
    async fn offer_sequence(&mut self, discard: &Discard) -> Option<TurnOutcome> {
        let seat_count = self.players.len();
        let seat = self.turn;
        if seat == discard.from {
            return None;
        }
        let mut request = self.players[seat].request();
        let offered = {
            let view = self.players[seat].view(seat_count);
            self.rule.can_claim_sequence(discard, &view, &mut request)
        };
        if !offered {
            return None;
        }
        match self.players[seat].decide(request).await {
            Ok(OperatResponse::Sequence(claim)) => {
                self.take_claimed(discard);
                if self.players[seat].chow(&claim) {
                    self.broadcast(Notice::Claimed { seat, meld: Meld::Sequence { tiles: claim.meld } });
                }
                self.turn = (seat + 1) % seat_count;
                Some(self.drop_after_claim(seat).await)
            }
            Ok(_) => None,
            Err(err) => {
                warn!("table {} seat {}: {}", self.tid, seat, err);
                None
            }
        }
    }

    /// 被认领的牌从牌河中拿走
    fn take_claimed(&mut self, discard: &Discard) {
        let pile = &mut self.discards[discard.from];
        if pile.last() == Some(&discard.tile) {
            pile.pop();
        }
    }

    /// 吃碰之后出牌
    async fn drop_after_claim(&mut self, seat: usize) -> TurnOutcome {
        let request = self.players[seat].request().with_kinds(OperatKinds::DROP);
        match self.players[seat].decide(request).await {
            Ok(OperatResponse::Drop(tile)) => self.drop_tile(seat, tile),
            Ok(other) => {
                warn!("table {} seat {}: unexpected {} on drop", self.tid, seat, other.name());
                self.fallback_drop(seat)
            }
            Err(err) => {
                warn!("table {} seat {}: {}", self.tid, seat, err);
                self.fallback_drop(seat)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::action::{Request, Response, WinKind};
    use crate::game::actor::FnActor;
    use crate::game::rules::DefaultRule;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tiles_of(codes: &[u16]) -> Vec<Tile> {
        codes.iter().map(|&c| Tile::from_code(c).unwrap()).collect()
    }

    fn t(code: u16) -> Tile {
        Tile::from_code(code).unwrap()
    }

    fn robot_table(hands: [&[u16]; 4]) -> Table {
        table_with((0..4).map(PlayerLink::robot).collect(), hands)
    }

    fn table_with(links: Vec<Arc<PlayerLink>>, hands: [&[u16]; 4]) -> Table {
        let rule: Arc<dyn Rule> = Arc::new(DefaultRule { wildcard: false, honors: true, pair_258: false });
        let config = Arc::new(Config { seed: Some(5), ..Config::default() });
        let mut table = Table::new(1, TableKind::Robot, rule.clone(), links, config);
        let checker = ReadyChecker::new(&*rule, None);
        for (seat, hand) in hands.iter().enumerate() {
            table.players[seat].deal(&tiles_of(hand));
            table.players[seat].set_wildcard(None, &checker);
        }
        table.turn = 1;
        table
    }

    const SEAT0: &[u16] = &[101, 104, 107, 201, 204, 207, 301, 304, 307, 401, 403, 405, 406];
    const SEAT1: &[u16] = &[104, 106, 202, 205, 208, 302, 305, 308, 401, 403, 405, 406, 407];
    const SEAT2: &[u16] = &[105, 105, 402, 201, 202, 203, 301, 302, 303, 206, 207, 208, 101];
    const READY: &[u16] = &[101, 102, 103, 106, 107, 108, 108, 201, 202, 203, 301, 302, 303];
    const IDLE: &[u16] = &[102, 103, 107, 108, 203, 204, 208, 209, 303, 304, 308, 309, 404];

    #[tokio::test]
    async fn test_win_beats_triplet_and_sequence() {
        let mut table = robot_table([SEAT0, SEAT1, SEAT2, READY]);
        table.resolve_discard(Discard::new(t(105), 0, DiscardKind::Normal)).await;

        assert_eq!(table.winner(), Some(3));
        assert_eq!(table.win, Some(WinOffer { tile: t(105), kind: WinKind::Discard, loser: Some(0) }));
        assert_eq!(table.players[3].hand().len(), 14);
        assert!(table.discards(0).is_empty());
        assert!(table.players[2].melds().is_empty());
        assert!(table.players[1].melds().is_empty());
    }

    #[tokio::test]
    async fn test_triplet_beats_sequence() {
        let mut table = robot_table([SEAT0, SEAT1, SEAT2, IDLE]);
        table.resolve_discard(Discard::new(t(105), 0, DiscardKind::Normal)).await;

        assert_eq!(table.winner(), None);
        assert_eq!(table.players[2].melds(), &[Meld::Triplet { tile: t(105) }]);
        assert!(table.players[1].melds().is_empty());
        assert!(table.discards(0).is_empty());
        assert_eq!(table.discards(2), &[t(402)]);
        assert_eq!(table.turn, 3);
        assert_eq!(table.players[2].hand().len(), 10);
    }

    #[tokio::test]
    async fn test_sequence_only_for_next_seat() {
        let mut table = robot_table([SEAT0, SEAT1, IDLE, IDLE]);
        table.resolve_discard(Discard::new(t(105), 0, DiscardKind::Normal)).await;

        assert_eq!(table.players[1].melds(), &[Meld::Sequence { tiles: [t(104), t(105), t(106)] }]);
        assert_eq!(table.turn, 2);
        assert_eq!(table.players[1].hand().len(), 10);
        assert_eq!(table.discards(1).len(), 1);
    }

    #[tokio::test]
    async fn test_supplement_quad_can_be_robbed() {
        let seat0: &[u16] = &[105, 105, 101, 104, 107, 201, 204, 207, 301, 304, 307, 401];
        let mut table = robot_table([seat0, SEAT1, READY, IDLE]);
        assert!(table.players[0].pong(t(105)));
        table.wall = Wall::from_tiles(tiles_of(&[105, 309, 309, 309]));

        assert_eq!(table.take_turn(0, DiscardKind::SelfDraw).await, TurnOutcome::Won);
        assert_eq!(table.winner(), Some(2));
        assert_eq!(table.win, Some(WinOffer { tile: t(105), kind: WinKind::RobQuad, loser: Some(0) }));
        assert_eq!(table.players[0].melds(), &[Meld::Triplet { tile: t(105) }]);
        assert_eq!(table.players[0].hand().len(), 10);
        assert_eq!(table.players[2].hand().len(), 14);
    }

    #[tokio::test]
    async fn test_declined_win_holds_until_own_move() {
        let offers = Arc::new(AtomicUsize::new(0));
        let counter = offers.clone();
        let actor = FnActor::new(move |request: &Request| match request {
            Request::Table(op) => Response::Table { op: *op, ok: false },
            Request::Operat(operat) => {
                if operat.kinds.contains(OperatKinds::WIN) {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
                Response::Operat(OperatResponse::Pass)
            }
        });
        let mut links: Vec<_> = (0..3).map(PlayerLink::robot).collect();
        links.push(PlayerLink::human(3, Arc::new(actor)));
        let mut table = table_with(links, [IDLE, IDLE, IDLE, READY]);

        table.resolve_discard(Discard::new(t(105), 0, DiscardKind::Normal)).await;
        assert_eq!(offers.load(Ordering::SeqCst), 1);
        assert!(table.players[3].has_declined_win());
        assert_eq!(table.discards(0), &[t(105)]);

        // 过胡后别家再打同一张也不能和
        table.resolve_discard(Discard::new(t(105), 1, DiscardKind::Normal)).await;
        assert_eq!(offers.load(Ordering::SeqCst), 1);
        assert_eq!(table.winner(), None);
        assert_eq!(table.discards(1), &[t(105)]);

        // 自己摸牌后解除
        table.players[3].receive(t(404));
        assert!(!table.players[3].has_declined_win());
        table.resolve_discard(Discard::new(t(105), 2, DiscardKind::Normal)).await;
        assert_eq!(offers.load(Ordering::SeqCst), 2);
        assert!(table.players[3].has_declined_win());

        // 碰牌同样解除
        assert!(table.players[3].pong(t(108)));
        assert!(!table.players[3].has_declined_win());
    }

    #[tokio::test]
    async fn test_robot_round_conserves_tiles() {
        let rule: Arc<dyn Rule> = Arc::new(DefaultRule::default());
        let links = (0..4).map(PlayerLink::robot).collect();
        let config = Arc::new(Config { seed: Some(42), robot_rounds: 2, ..Config::default() });
        let mut table = Table::new(9, TableKind::Robot, rule, links, config);

        let results = table.run().await;
        // 机器人不同意续局
        assert_eq!(results.len(), 1);
        assert_eq!(table.phase(), Phase::Closed);
        assert_eq!(table.tile_count(), table.total_tiles());
        assert_eq!(table.total_tiles(), 136);
        assert!(table.wildcard().is_some());
        let result = &results[0];
        match result.winner {
            Some(seat) => assert!(table.players()[seat].win_tile().is_some()),
            None => assert!(result.wall_remaining <= 10),
        }
    }
}
