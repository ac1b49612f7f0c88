use futures::future::BoxFuture;
use std::time::Duration;
use tokio::task::AbortHandle;

pub type PhaseCallback = BoxFuture<'static, ()>;

/// Cancellable handle to a scheduled phase timeout.
///
/// Dropping the handle does not cancel the timer; call [`TimerHandle::cancel`].
#[derive(Debug)]
pub struct TimerHandle {
    room_id: String,
    abort: AbortHandle,
}

impl TimerHandle {
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn cancel(self) {
        log::debug!("Cancelling phase timer for room {}", self.room_id);
        self.abort.abort();
    }
}

/// Fires a one-shot callback after a delay.
pub trait PhaseScheduler: Send + Sync {
    fn schedule_once(&self, room_id: &str, delay: Duration, callback: PhaseCallback) -> TimerHandle;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl PhaseScheduler for TokioScheduler {
    fn schedule_once(&self, room_id: &str, delay: Duration, callback: PhaseCallback) -> TimerHandle {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback.await;
        });
        TimerHandle {
            room_id: room_id.to_string(),
            abort: task.abort_handle(),
        }
    }
}
