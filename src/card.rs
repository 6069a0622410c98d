//! Async driver for a swipeable card.
//!
//! Wraps [`SwipeGesture`] with a clock: a committed swipe schedules a tokio
//! task that waits out the exit animation, returns the gesture to idle and
//! then calls the matching handler. Tearing the card down aborts that task so
//! a dead surface never receives a stale decision.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::domain::SwipeDirection;
use crate::gesture::{CardTransform, GestureParams, GesturePhase, Point, Release, SwipeGesture};

pub type SwipeHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct SwipeHandlers {
    pub on_swipe_left: SwipeHandler,
    pub on_swipe_right: SwipeHandler,
}

impl SwipeHandlers {
    pub fn new(
        on_swipe_left: impl Fn() + Send + Sync + 'static,
        on_swipe_right: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_swipe_left: Arc::new(on_swipe_left),
            on_swipe_right: Arc::new(on_swipe_right),
        }
    }

    /// Collapse both handlers into one taking the accept flag.
    pub fn from_decision(on_decision: impl Fn(bool) + Send + Sync + 'static) -> Self {
        let on_decision = Arc::new(on_decision);
        let left = Arc::clone(&on_decision);
        Self::new(move || (*left)(false), move || (*on_decision)(true))
    }

    fn for_direction(&self, direction: SwipeDirection) -> SwipeHandler {
        match direction {
            SwipeDirection::Left => Arc::clone(&self.on_swipe_left),
            SwipeDirection::Right => Arc::clone(&self.on_swipe_right),
        }
    }
}

impl std::fmt::Debug for SwipeHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeHandlers").finish_non_exhaustive()
    }
}

/// The rendered area the card lives on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardSurface {
    pub width: f64,
}

#[derive(Debug)]
struct Shared {
    gesture: SwipeGesture,
    handlers: SwipeHandlers,
}

#[derive(Debug)]
struct Attached {
    surface: CardSurface,
    shared: Arc<Mutex<Shared>>,
    /// `true` while attached. Handlers run under the read side, teardown
    /// flips it under the write side.
    live: Arc<RwLock<bool>>,
    pending: Option<JoinHandle<()>>,
}

#[derive(Debug)]
pub struct SwipeCard {
    attached: Option<Attached>,
    animation: Duration,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SwipeCard {
    /// Attach handlers to `surface`. Without a surface the card stays inert:
    /// every event is ignored and no handler ever fires.
    pub fn attach(
        surface: Option<CardSurface>,
        params: GestureParams,
        animation: Duration,
        handlers: SwipeHandlers,
    ) -> Self {
        let attached = match surface {
            Some(surface) => Some(Attached {
                surface,
                shared: Arc::new(Mutex::new(Shared {
                    gesture: SwipeGesture::new(params),
                    handlers,
                })),
                live: Arc::new(RwLock::new(true)),
                pending: None,
            }),
            None => {
                debug!("card.attach.no_surface");
                None
            }
        };
        Self { attached, animation }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.attached
            .as_ref()
            .map(|a| lock(&a.shared).gesture.is_animating())
            .unwrap_or(false)
    }

    /// Current visual state; the exit position while a commit is animating.
    pub fn transform(&self) -> CardTransform {
        let Some(attached) = &self.attached else {
            return CardTransform::CENTER;
        };
        let shared = lock(&attached.shared);
        match shared.gesture.phase() {
            GesturePhase::Animating { direction } => {
                shared.gesture.exit_transform(direction, attached.surface.width)
            }
            _ => shared.gesture.transform(),
        }
    }

    pub fn pointer_down(&mut self, at: Point) -> bool {
        match &self.attached {
            Some(a) => lock(&a.shared).gesture.pointer_down(at),
            None => false,
        }
    }

    pub fn pointer_move(&mut self, at: Point) -> Option<CardTransform> {
        let a = self.attached.as_ref()?;
        lock(&a.shared).gesture.pointer_move(at)
    }

    /// Must be called from within a tokio runtime; a commit spawns the
    /// animation task.
    pub fn pointer_up(&mut self) -> Option<Release> {
        let release = {
            let a = self.attached.as_ref()?;
            lock(&a.shared).gesture.pointer_up()
        }?;
        match release {
            Release::Commit(direction) => self.schedule_commit(direction),
            Release::Cancel => debug!("card.cancel"),
        }
        Some(release)
    }

    pub fn trigger_swipe_left(&mut self) -> bool {
        self.trigger(SwipeDirection::Left)
    }

    pub fn trigger_swipe_right(&mut self) -> bool {
        self.trigger(SwipeDirection::Right)
    }

    fn trigger(&mut self, direction: SwipeDirection) -> bool {
        let started = match &self.attached {
            Some(a) => lock(&a.shared).gesture.trigger(direction),
            None => false,
        };
        if started {
            self.schedule_commit(direction);
        }
        started
    }

    fn schedule_commit(&mut self, direction: SwipeDirection) {
        let Some(attached) = self.attached.as_mut() else {
            return;
        };
        info!(?direction, animation_ms = self.animation.as_millis() as u64, "card.commit");

        let shared = Arc::clone(&attached.shared);
        let live = Arc::clone(&attached.live);
        let delay = self.animation;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let live = live.read().unwrap_or_else(PoisonError::into_inner);
            if !*live {
                return;
            }
            let handler = {
                let mut guard = lock(&shared);
                match guard.gesture.finish_animation() {
                    Some(direction) => guard.handlers.for_direction(direction),
                    None => return,
                }
            };
            handler();
        });
        attached.pending = Some(task);
    }

    /// Detach from the surface. A commit still animating is dropped without
    /// firing its handler. If a handler is running right now this waits for
    /// it, so nothing fires once `teardown` returns. A handler must not tear
    /// down its own card.
    pub fn teardown(&mut self) {
        let Some(attached) = self.attached.take() else {
            return;
        };
        *attached.live.write().unwrap_or_else(PoisonError::into_inner) = false;
        if let Some(task) = attached.pending {
            task.abort();
        }
        debug!("card.teardown");
    }
}

impl Drop for SwipeCard {
    fn drop(&mut self) {
        self.teardown();
    }
}
