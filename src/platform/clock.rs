//! Frame scheduling
//!
//! The game owns at most one outstanding frame request. Browsers hand out
//! `requestAnimationFrame` ids; headless runs and tests use
//! `ManualScheduler`, which just records what is pending.

use crate::error::GameError;

/// Opaque id of a pending frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Something that can call the game back on the next display frame
pub trait FrameScheduler {
    /// Ask for one callback on the next frame
    fn request(&mut self) -> Result<FrameHandle, GameError>;
    /// Cancel a request that has not fired yet
    fn cancel(&mut self, handle: FrameHandle);
}

/// Scheduler driven by hand (native loop, tests)
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: i32,
    pending: Vec<FrameHandle>,
    /// Total requests ever made
    pub requested: usize,
    /// Total cancellations
    pub cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that are armed and not yet fired or cancelled
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    /// Fire the oldest pending request, as the host would at vsync
    pub fn fire_next(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn request(&mut self) -> Result<FrameHandle, GameError> {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        self.requested += 1;
        Ok(handle)
    }

    fn cancel(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use raf::RafScheduler;

#[cfg(target_arch = "wasm32")]
mod raf {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use super::{FrameHandle, FrameScheduler};
    use crate::error::GameError;

    /// Shared slot for the per-frame callback
    pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// `requestAnimationFrame` backed scheduler
    pub struct RafScheduler {
        callback: FrameCallback,
    }

    impl Default for RafScheduler {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RafScheduler {
        pub fn new() -> Self {
            Self {
                callback: Rc::new(RefCell::new(None)),
            }
        }

        /// Slot the host fills with the frame closure once the game exists
        pub fn callback_slot(&self) -> FrameCallback {
            self.callback.clone()
        }
    }

    impl FrameScheduler for RafScheduler {
        fn request(&mut self) -> Result<FrameHandle, GameError> {
            let window = web_sys::window()
                .ok_or_else(|| GameError::Scheduler("no window".to_string()))?;
            let slot = self.callback.borrow();
            let callback = slot
                .as_ref()
                .ok_or_else(|| GameError::Scheduler("frame callback not installed".to_string()))?;
            window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .map(FrameHandle)
                .map_err(|e| GameError::Scheduler(format!("{:?}", e)))
        }

        fn cancel(&mut self, handle: FrameHandle) {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.cancel_animation_frame(handle.0) {
                    log::warn!("cancelAnimationFrame failed: {:?}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_request_and_cancel() {
        let mut clock = ManualScheduler::new();
        let a = clock.request().unwrap();
        let b = clock.request().unwrap();
        assert_ne!(a, b);
        assert_eq!(clock.pending(), &[a, b]);

        clock.cancel(a);
        assert_eq!(clock.pending(), &[b]);
        assert_eq!(clock.cancelled, 1);

        // Cancelling twice is harmless
        clock.cancel(a);
        assert_eq!(clock.cancelled, 1);

        assert_eq!(clock.fire_next(), Some(b));
        assert_eq!(clock.fire_next(), None);
    }
}
