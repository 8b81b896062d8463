use crate::error::ActorError;
use crate::game::action::{Notice, Request, Response};
use async_trait::async_trait;

/// 玩家代理
///
/// 牌桌只通过这个接口和玩家交互：`notify` 需要回复，`send` 只是广播。
/// 网络连接、机器人、测试脚本都实现这个 trait。
#[async_trait]
pub trait Actor: Send + Sync {
    /// 发送决策请求并等待回复
    ///
    /// 超时由调用方控制。
    async fn notify(&self, request: Request) -> Result<Response, ActorError>;

    /// 广播消息，不等待
    fn send(&self, notice: Notice);
}

/// 函数式代理适配器
///
/// 将函数转换为 Actor，常用于脚本化的客户端。
pub struct FnActor<F> {
    callback: F,
}

impl<F> FnActor<F>
where
    F: Fn(&Request) -> Response + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<F> Actor for FnActor<F>
where
    F: Fn(&Request) -> Response + Send + Sync,
{
    async fn notify(&self, request: Request) -> Result<Response, ActorError> {
        Ok((self.callback)(&request))
    }

    fn send(&self, _notice: Notice) {}
}
