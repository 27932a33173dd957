use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

/// 会话变化事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    SignedIn { user_id: String, email: String },
    SignedOut { user_id: String },
}

impl SessionEvent {
    pub fn user_id(&self) -> &str {
        match self {
            SessionEvent::SignedIn { user_id, .. } | SessionEvent::SignedOut { user_id } => {
                user_id
            }
        }
    }
}

/// 会话事件总线，基于 broadcast 通道
#[derive(Clone)]
pub struct SessionBus {
    sender: broadcast::Sender<SessionEvent>,
    active: Arc<AtomicUsize>,
}

impl SessionBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 发布事件；没有订阅者时静默丢弃
    pub fn publish(&self, event: SessionEvent) {
        match self.sender.send(event) {
            Ok(n) => debug!("Session event delivered to {} subscriber(s)", n),
            Err(broadcast::error::SendError(event)) => {
                debug!("No session subscribers for event {:?}", event)
            }
        }
    }

    /// 注册回调，返回的句柄被 drop 时立即退订
    pub fn on_change<F>(&self, callback: F) -> SessionSubscription
    where
        F: Fn(SessionEvent) + Send + 'static,
    {
        let mut rx = self.sender.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => callback(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Session subscriber lagged, {} event(s) skipped", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        self.active.fetch_add(1, Ordering::SeqCst);
        SessionSubscription {
            abort: handle.abort_handle(),
            active: self.active.clone(),
        }
    }

    /// 直接订阅原始事件流
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// 当前存活的回调订阅数
    pub fn active_subscriptions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl Default for SessionBus {
    fn default() -> Self {
        Self::new(64)
    }
}

/// 回调订阅句柄
pub struct SessionSubscription {
    abort: AbortHandle,
    active: Arc<AtomicUsize>,
}

impl SessionSubscription {
    /// 显式退订，等价于 drop
    pub fn unsubscribe(self) {}
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        self.abort.abort();
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
