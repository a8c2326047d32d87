//! Platform plumbing for the browser host
//!
//! The recurring tick is an explicit cancellable task rather than a bare
//! requestAnimationFrame chain: the owning shell starts it on mount and
//! cancels it on teardown. Cancellation is idempotent; an in-flight frame
//! checks the flag and quietly stops re-scheduling.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

/// Handle to a repeating animation-frame task
#[derive(Clone)]
pub struct FrameLoop {
    cancelled: Rc<Cell<bool>>,
}

impl FrameLoop {
    /// Run `callback` once per animation frame until cancelled
    pub fn start(callback: impl FnMut() + 'static) -> Self {
        let cancelled = Rc::new(Cell::new(false));
        let callback: Rc<RefCell<dyn FnMut()>> = Rc::new(RefCell::new(callback));
        schedule(cancelled.clone(), callback);
        Self { cancelled }
    }

    /// Stop re-scheduling. Safe to call any number of times.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

fn schedule(cancelled: Rc<Cell<bool>>, callback: Rc<RefCell<dyn FnMut()>>) {
    let closure = Closure::once(move |_time: f64| {
        if cancelled.get() {
            return;
        }
        (callback.borrow_mut())();
        schedule(cancelled, callback);
    });
    if let Some(window) = web_sys::window() {
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
