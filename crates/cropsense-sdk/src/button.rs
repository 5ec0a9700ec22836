//! Submit button state
//!
//! Purely cosmetic: a busy button does not block another submit. The busy
//! state is applied one scheduling tick after the press, and only the most
//! recent press may reset it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonState {
    Idle,
    /// Spinner shown, pointer events off
    Busy,
}

/// Token returned by [`SubmitButton::press`]
#[derive(Debug)]
#[must_use = "pass the press back to `release` once the outcome resolves"]
pub struct Press {
    epoch: u64,
}

#[derive(Clone)]
pub struct SubmitButton {
    inner: Arc<ButtonInner>,
}

struct ButtonInner {
    state: watch::Sender<ButtonState>,
    epoch: AtomicU64,
}

impl SubmitButton {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ButtonState::Idle);
        Self {
            inner: Arc::new(ButtonInner {
                state,
                epoch: AtomicU64::new(0),
            }),
        }
    }

    pub fn state(&self) -> ButtonState {
        *self.inner.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ButtonState> {
        self.inner.state.subscribe()
    }

    /// Schedules the busy state for the next tick.
    pub fn press(&self) -> Press {
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let inner = Arc::clone(&self.inner);
                runtime.spawn(async move {
                    tokio::task::yield_now().await;
                    if inner.epoch.load(Ordering::SeqCst) == epoch {
                        inner.state.send_replace(ButtonState::Busy);
                    }
                });
            }
            Err(_) => {
                self.inner.state.send_replace(ButtonState::Busy);
            }
        }

        Press { epoch }
    }

    /// Returns the button to idle unless a newer press superseded `press`.
    pub fn release(&self, press: Press) {
        let released = self
            .inner
            .epoch
            .compare_exchange(
                press.epoch,
                press.epoch + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok();
        if released {
            self.inner.state.send_replace(ButtonState::Idle);
        }
    }
}

impl Default for SubmitButton {
    fn default() -> Self {
        Self::new()
    }
}
