//! Next-frame deferral bound to a component's lifetime.
//!
//! Scroll-into-view and popover focus checks must run after the host has
//! rendered the current frame. They are expressed as `bubbletea_rs` commands
//! that resolve one frame later. Every deferred command carries a
//! [`LifetimeToken`]; once the owning component drops its [`Lifetime`] (or
//! calls [`Lifetime::teardown`]) the command resolves to `None` and no message
//! is ever delivered.
//!
//! Messages produced here also carry the owner's id and a sequence tag, the
//! same scheme the cursor and timer components use to ignore foreign or stale
//! messages.

use bubbletea_rs::{tick, Cmd, Msg};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

static LAST_ID: AtomicUsize = AtomicUsize::new(0);

/// Returns a process-unique id for a component instance.
pub(crate) fn next_id() -> usize {
    LAST_ID.fetch_add(1, Ordering::Relaxed) + 1
}

/// Delay used to land after the host's next render.
pub const FRAME: Duration = Duration::from_millis(16);

/// Liveness flag owned by a component.
///
/// Dropping the lifetime cancels every outstanding deferred command created
/// from its tokens.
#[derive(Debug)]
pub struct Lifetime {
    alive: Arc<AtomicBool>,
}

impl Lifetime {
    /// Creates a live lifetime.
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Hands out a token observing this lifetime.
    pub fn token(&self) -> LifetimeToken {
        LifetimeToken {
            alive: Arc::clone(&self.alive),
        }
    }

    /// Marks the owner as torn down. Idempotent.
    pub fn teardown(&self) {
        self.alive.store(false, Ordering::Release);
    }

    /// Whether the owner is still live.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Lifetime {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Cheap, cloneable observer of a [`Lifetime`].
#[derive(Debug, Clone)]
pub struct LifetimeToken {
    alive: Arc<AtomicBool>,
}

impl LifetimeToken {
    /// Whether the owning component is still live.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

/// Builds a command that yields `make_msg()` one frame from now, or nothing
/// if the owner was torn down in the meantime.
pub fn next_frame<F>(token: LifetimeToken, make_msg: F) -> Cmd
where
    F: FnOnce() -> Msg + Send + 'static,
{
    let frame = tick(FRAME, |_| Box::new(()) as Msg);
    Box::pin(async move {
        frame.await;
        if token.is_alive() {
            Some(make_msg())
        } else {
            tracing::debug!("skipping deferred task, owner was torn down");
            None
        }
    })
}
