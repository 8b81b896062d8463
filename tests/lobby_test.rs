//! 大厅测试：开桌、加入、断线重连

use hun_mahjong::engine::Outbound;
use hun_mahjong::{Config, Lobby, Notice, RemoteActor, Robot, RuleKind, Seated, TableError, TableKind};
use std::sync::Arc;

fn lobby() -> Lobby {
    Lobby::new(Config { seed: Some(11), online_timeout_ms: 20, ..Config::default() })
}

#[tokio::test]
async fn test_robot_table_runs_and_releases() {
    let lobby = lobby();
    let seated = lobby.create_table(1, Arc::new(Robot), TableKind::Robot, RuleKind::Default).await.unwrap();
    assert_eq!(seated.seat, 0);
    assert_eq!(lobby.seats(seated.tid).await.map(|uids| uids.len()), Some(4));
    assert_eq!(lobby.join_table(2, Arc::new(Robot), seated.tid).await, Err(TableError::AlreadyStarted(seated.tid)));

    let results = lobby.wait(seated.tid).await.expect("table results");
    assert_eq!(results.len(), 1);
    assert_eq!(lobby.table_count().await, 0);
    assert_eq!(lobby.table_of(1).await, None);
    assert_eq!(lobby.wait(seated.tid).await, None);
}

#[tokio::test]
async fn test_four_players_start_a_table() {
    let lobby = lobby();
    let first = lobby.create_table(10, Arc::new(Robot), TableKind::Normal, RuleKind::WildcardHeavy).await.unwrap();
    for (uid, seat) in [(11, 1), (12, 2), (13, 3)] {
        let seated = lobby.join_table(uid, Arc::new(Robot), first.tid).await.unwrap();
        assert_eq!(seated, Seated { tid: first.tid, seat });
    }
    assert_eq!(lobby.join_table(14, Arc::new(Robot), first.tid).await, Err(TableError::AlreadyStarted(first.tid)));
    assert_eq!(lobby.create_table(12, Arc::new(Robot), TableKind::Normal, RuleKind::Default).await, Err(TableError::AlreadyJoined(12)));

    let results = lobby.wait(first.tid).await.expect("table results");
    assert_eq!(results.len(), 1);
    assert_eq!(lobby.table_of(13).await, None);
}

#[tokio::test]
async fn test_leave_before_start_frees_the_seat() {
    let lobby = lobby();
    let seated = lobby.create_table(20, Arc::new(Robot), TableKind::Normal, RuleKind::Default).await.unwrap();
    lobby.join_table(21, Arc::new(Robot), seated.tid).await.unwrap();
    lobby.leave(20).await.unwrap();
    assert_eq!(lobby.seats(seated.tid).await, Some(vec![21]));
    assert_eq!(lobby.leave(20).await, Err(TableError::PlayerNotFound(20)));

    // 开局前断线等同于离开，空桌注销
    lobby.disconnect(21).await.unwrap();
    assert_eq!(lobby.table_count().await, 0);
}

#[tokio::test]
async fn test_reconnect_resumes_snapshot() {
    let lobby = lobby();
    let (first, _first_inbound) = RemoteActor::channel(8);
    let seated = lobby.create_table(30, Arc::new(first), TableKind::Normal, RuleKind::Default).await.unwrap();

    let (second, mut inbound) = RemoteActor::channel(8);
    let resumed = lobby.reconnect(30, Arc::new(second)).await.unwrap();
    assert_eq!(resumed, seated);
    match inbound.recv().await {
        Some(Outbound::Notice(Notice::Resume(snapshot))) => assert!(snapshot.hand.is_empty()),
        other => panic!("expected resume notice, got {:?}", other),
    }
    assert_eq!(lobby.reconnect(31, Arc::new(Robot)).await, Err(TableError::PlayerNotFound(31)));
}

#[tokio::test]
async fn test_disconnected_player_finishes_with_robot() {
    let lobby = lobby();
    // 接收端保留但从不回复
    let (actor, _inbound) = RemoteActor::channel(256);
    let seated = lobby.create_table(40, Arc::new(actor), TableKind::Robot, RuleKind::Default).await.unwrap();
    lobby.disconnect(40).await.unwrap();

    let results = lobby.wait(seated.tid).await.expect("table results");
    assert_eq!(results.len(), 1);
    assert_eq!(lobby.reconnect(40, Arc::new(Robot)).await, Err(TableError::PlayerNotFound(40)));
}

/// 让出执行权直到所有牌桌都已注销
async fn settle(lobby: &Lobby) {
    while lobby.table_count().await > 0 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_table_id_held_until_results_taken() {
    let lobby = Lobby::new(Config { first_table_id: 1, max_table_id: 3, seed: Some(5), ..Config::default() });
    let first = lobby.create_table(1, Arc::new(Robot), TableKind::Robot, RuleKind::Default).await.unwrap();
    assert_eq!(first.tid, 1);
    settle(&lobby).await;

    let second = lobby.create_table(2, Arc::new(Robot), TableKind::Normal, RuleKind::Default).await.unwrap();
    assert_eq!(second.tid, 2);
    assert_eq!(
        lobby.create_table(3, Arc::new(Robot), TableKind::Normal, RuleKind::Default).await,
        Err(TableError::NoTableIdLeft)
    );

    let results = lobby.wait(first.tid).await.expect("first table results");
    assert_eq!(results.len(), 1);
    let reused = lobby.create_table(3, Arc::new(Robot), TableKind::Normal, RuleKind::Default).await.unwrap();
    assert_eq!(reused.tid, 1);
    assert_eq!(lobby.wait(reused.tid).await, None);
}

#[tokio::test]
async fn test_oldest_unread_results_are_discarded() {
    let lobby = Lobby::new(Config { retained_results: 1, seed: Some(6), ..Config::default() });
    let first = lobby.create_table(1, Arc::new(Robot), TableKind::Robot, RuleKind::Default).await.unwrap();
    settle(&lobby).await;
    let second = lobby.create_table(2, Arc::new(Robot), TableKind::Robot, RuleKind::Default).await.unwrap();
    settle(&lobby).await;

    assert_eq!(lobby.wait(first.tid).await, None);
    assert_eq!(lobby.wait(second.tid).await.map(|results| results.len()), Some(1));
}
