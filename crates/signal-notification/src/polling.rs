//! 업데이트 수신 루프.
//!
//! Long polling으로 업데이트를 받아 이벤트마다 별도 태스크로 처리합니다.
//! 한 이벤트의 실패(또는 panic)는 해당 태스크에 격리되고 루프는 계속 동작합니다.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::bot_handler::{InboundEvent, SignalBot};
use crate::telegram::{TelegramClient, Update};
use crate::types::{BotApi, NotificationError, NotificationResult};

/// 폴링 실패 후 재시도 대기 시간.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// 업데이트 공급자.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// `offset` 이상의 업데이트를 가져옵니다.
    async fn fetch_updates(&self, offset: i64) -> NotificationResult<Vec<Update>>;
}

#[async_trait]
impl UpdateSource for TelegramClient {
    async fn fetch_updates(&self, offset: i64) -> NotificationResult<Vec<Update>> {
        self.get_updates(offset).await
    }
}

/// 업데이트 폴러.
pub struct UpdatePoller<S, A>
where
    S: UpdateSource,
    A: BotApi + 'static,
{
    source: Arc<S>,
    bot: Arc<SignalBot<A>>,
    next_offset: i64,
    tasks: JoinSet<()>,
}

impl<S, A> UpdatePoller<S, A>
where
    S: UpdateSource,
    A: BotApi + 'static,
{
    /// 새 폴러를 생성합니다.
    pub fn new(source: Arc<S>, bot: Arc<SignalBot<A>>) -> Self {
        Self {
            source,
            bot,
            next_offset: 0,
            tasks: JoinSet::new(),
        }
    }

    /// 다음 요청에 사용할 offset.
    pub fn next_offset(&self) -> i64 {
        self.next_offset
    }

    /// 업데이트를 한 번 가져와 이벤트별 태스크를 시작합니다.
    ///
    /// 시작한 이벤트 수를 반환합니다. 태스크 완료를 기다리지 않습니다.
    pub async fn poll_once(&mut self) -> NotificationResult<usize> {
        let updates = self.source.fetch_updates(self.next_offset).await?;

        if let Some(last) = updates.last() {
            self.next_offset = last.update_id + 1;
        }

        let mut dispatched = 0;
        for update in updates {
            let update_id = update.update_id;
            let Some(event) = InboundEvent::from_update(update, self.bot.username()) else {
                debug!(update_id, "처리 대상이 아닌 업데이트 무시");
                continue;
            };

            let bot = Arc::clone(&self.bot);
            self.tasks.spawn(async move { bot.handle_event(event).await });
            dispatched += 1;
        }

        Ok(dispatched)
    }

    /// 진행 중인 이벤트 태스크가 모두 끝날 때까지 기다립니다.
    pub async fn wait_idle(&mut self) {
        while let Some(result) = self.tasks.join_next().await {
            log_task_result(result);
        }
    }

    fn reap_finished(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            log_task_result(result);
        }
    }

    /// `shutdown`이 완료될 때까지 폴링합니다.
    ///
    /// 종료 시 진행 중인 이벤트 처리를 마친 뒤 반환합니다.
    pub async fn run_until<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!("텔레그램 봇 폴링 시작");
        tokio::pin!(shutdown);

        loop {
            self.reap_finished();

            let backoff = tokio::select! {
                _ = &mut shutdown => break,
                result = self.poll_once() => match result {
                    Ok(_) => None,
                    Err(NotificationError::RateLimited(secs)) => Some(Duration::from_secs(secs)),
                    Err(e) => {
                        error!(error = %e, "업데이트 폴링 실패");
                        Some(POLL_ERROR_BACKOFF)
                    }
                },
            };

            if let Some(delay) = backoff {
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        info!(in_flight = self.tasks.len(), "폴링 중지, 진행 중인 이벤트 처리 대기");
        self.wait_idle().await;
        info!("텔레그램 봇 종료");
    }
}

fn log_task_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            error!(error = %e, "이벤트 처리 태스크 panic");
        } else {
            warn!(error = %e, "이벤트 처리 태스크 취소");
        }
    }
}
