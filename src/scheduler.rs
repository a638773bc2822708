//! Frame scheduler: drives one field tick per display refresh.
//!
//! External signals (pointer moves, pointer leaving, viewport resizes) never
//! touch the field directly. They are queued as [`FieldEvent`]s through an
//! [`EventSink`] and drained at the start of the next frame, so a tick always
//! sees a settled pointer state and a fully rebuilt particle collection. The
//! sink is `Send + Clone`, which keeps that guarantee even when events come
//! from another thread.
//!
//! The loop runs until its host cancels the [`StopToken`]:
//!
//! ```ignore
//! let mut scheduler = FrameScheduler::new(field);
//! let sink = scheduler.sink();
//! let stop = scheduler.stop_token();
//!
//! sink.send(FieldEvent::PointerMoved(Vec2::new(40.0, 60.0)));
//! while scheduler.frame(&mut surface) == FrameStatus::Continue {
//!     present(&mut surface);
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use glam::Vec2;
use tracing::{debug, info};

use crate::field::ParticleField;
use crate::input::{PointerState, PointerTracker};
use crate::surface::Surface;
use crate::time::FrameClock;

/// An external signal for the field, applied at the next frame boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldEvent {
    /// The pointer moved over the surface.
    PointerMoved(Vec2),
    /// The pointer left the surface.
    PointerLeft,
    /// The viewport changed size.
    Resized { width: u32, height: u32 },
}

impl From<PointerState> for FieldEvent {
    fn from(state: PointerState) -> Self {
        match state {
            PointerState::Present(pos) => FieldEvent::PointerMoved(pos),
            PointerState::Absent => FieldEvent::PointerLeft,
        }
    }
}

/// Sending half of the scheduler's event queue.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Sender<FieldEvent>,
}

impl EventSink {
    /// Queue an event. Events sent after the scheduler is dropped are discarded.
    pub fn send(&self, event: FieldEvent) {
        let _ = self.tx.send(event);
    }
}

/// Shared cancellation flag for the frame loop.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    stopped: Arc<AtomicBool>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop. The frame in progress, if any, still completes.
    pub fn cancel(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Whether the host should schedule another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stopped,
}

/// Owns the field and pointer state and runs ticks one at a time.
#[derive(Debug)]
pub struct FrameScheduler {
    field: ParticleField,
    pointer: PointerTracker,
    events: Receiver<FieldEvent>,
    sink: EventSink,
    stop: StopToken,
    clock: FrameClock,
}

impl FrameScheduler {
    pub fn new(field: ParticleField) -> Self {
        Self::with_stop_token(field, StopToken::new())
    }

    /// Scheduler that stops when `stop` is cancelled.
    pub fn with_stop_token(field: ParticleField, stop: StopToken) -> Self {
        let (tx, rx) = unbounded();
        Self {
            field,
            pointer: PointerTracker::new(),
            events: rx,
            sink: EventSink { tx },
            stop,
            clock: FrameClock::new(),
        }
    }

    /// A handle for queueing pointer and resize events.
    pub fn sink(&self) -> EventSink {
        self.sink.clone()
    }

    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    /// Run one frame: apply queued events, then tick the field.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> FrameStatus {
        if self.stop.is_cancelled() {
            return FrameStatus::Stopped;
        }

        self.drain_events(surface);
        self.field.tick(surface, self.pointer.state());

        if let Some(fps) = self.clock.tick() {
            debug!(fps, frame = self.clock.frame(), "frame rate");
        }

        FrameStatus::Continue
    }

    /// Run up to `frames` frames, stopping early if cancelled.
    ///
    /// Returns the number of frames that ran.
    pub fn run_frames<S: Surface + ?Sized>(&mut self, surface: &mut S, frames: usize) -> usize {
        let mut ran = 0;
        while ran < frames && self.frame(surface) == FrameStatus::Continue {
            ran += 1;
        }
        if self.stop.is_cancelled() {
            info!(frames = self.clock.frame(), "frame loop stopped");
        }
        ran
    }

    fn drain_events<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        for event in self.events.try_iter() {
            match event {
                FieldEvent::PointerMoved(pos) => self.pointer.moved(pos),
                FieldEvent::PointerLeft => self.pointer.left(),
                FieldEvent::Resized { width, height } => {
                    debug!(width, height, "viewport resized");
                    self.field.resize(surface, width, height);
                }
            }
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer.state()
    }

    /// Frames completed so far.
    pub fn frames(&self) -> u64 {
        self.clock.frame()
    }
}
