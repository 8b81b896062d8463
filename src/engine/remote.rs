use crate::error::ActorError;
use crate::game::action::{Notice, Request, Response};
use crate::game::actor::Actor;
use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

/// 发往连接的消息
#[derive(Debug)]
pub enum Outbound {
    /// 需要回复的请求，回复从 `reply` 送回
    Request { request: Request, reply: oneshot::Sender<Response> },
    Notice(Notice),
}

/// 通过通道和连接任务通信的玩家代理
///
/// 网络层持有接收端，把请求写给客户端，收到回复后通过 `reply` 送回。
#[derive(Debug, Clone)]
pub struct RemoteActor {
    outbound: mpsc::Sender<Outbound>,
}

impl RemoteActor {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Outbound>) {
        let (outbound, inbound) = mpsc::channel(capacity);
        (Self { outbound }, inbound)
    }
}

#[async_trait]
impl Actor for RemoteActor {
    async fn notify(&self, request: Request) -> Result<Response, ActorError> {
        let (reply, answer) = oneshot::channel();
        self.outbound
            .send(Outbound::Request { request, reply })
            .await
            .map_err(|_| ActorError::Disconnected)?;
        answer.await.map_err(|_| ActorError::ReplyDropped)
    }

    /// 队列满时丢弃通知，连接已关闭时静默忽略
    fn send(&self, notice: Notice) {
        match self.outbound.try_send(Outbound::Notice(notice)) {
            Ok(()) => {}
            Err(TrySendError::Full(Outbound::Notice(notice))) => {
                warn!("outbound queue full, notice dropped: {:?}", notice);
            }
            Err(err) => debug!("notice dropped: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::action::TableOperat;

    #[tokio::test]
    async fn test_request_round_trip() {
        let (actor, mut inbound) = RemoteActor::channel(4);
        let client = tokio::spawn(async move {
            while let Some(message) = inbound.recv().await {
                if let Outbound::Request { request: Request::Table(op), reply } = message {
                    let _ = reply.send(Response::Table { op, ok: true });
                }
            }
        });
        let response = actor.notify(Request::Table(TableOperat::Start)).await;
        assert_eq!(response, Ok(Response::Table { op: TableOperat::Start, ok: true }));
        drop(actor);
        client.await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_connection() {
        let (actor, inbound) = RemoteActor::channel(1);
        drop(inbound);
        assert_eq!(actor.notify(Request::Table(TableOperat::Start)).await, Err(ActorError::Disconnected));
    }

    #[tokio::test]
    async fn test_dropped_reply() {
        let (actor, mut inbound) = RemoteActor::channel(1);
        tokio::spawn(async move {
            // 收到请求后直接丢弃回复通道
            let _ = inbound.recv().await;
        });
        assert_eq!(actor.notify(Request::Table(TableOperat::Continue)).await, Err(ActorError::ReplyDropped));
    }

    #[tokio::test]
    async fn test_full_queue_drops_notices() {
        let (actor, mut inbound) = RemoteActor::channel(1);
        actor.send(Notice::Drew { seat: 1 });
        actor.send(Notice::Drew { seat: 2 });

        match inbound.try_recv() {
            Ok(Outbound::Notice(Notice::Drew { seat })) => assert_eq!(seat, 1),
            other => panic!("expected first notice, got {:?}", other),
        }
        assert!(inbound.try_recv().is_err());

        drop(inbound);
        actor.send(Notice::Drew { seat: 3 });
    }
}
