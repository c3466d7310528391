use std::sync::Arc;

/// Something that can deliver a callback on its next display refresh.
pub trait RedrawHost {
    fn request_redraw(&self);
}

impl RedrawHost for winit::window::Window {
    fn request_redraw(&self) {
        winit::window::Window::request_redraw(self);
    }
}

impl<T: RedrawHost + ?Sized> RedrawHost for Arc<T> {
    fn request_redraw(&self) {
        (**self).request_redraw();
    }
}

/// Coalesces frame requests onto the host's refresh callback.
///
/// At most one callback is in flight. The draw reads whatever state is live
/// when the callback fires, so extra requests in between change nothing.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the next refresh callback. Returns `false` if one is already armed.
    pub fn request_frame<H: RedrawHost + ?Sized>(&mut self, host: &H) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        host.request_redraw();
        true
    }

    /// The refresh callback arrived. Returns whether a frame had been requested.
    pub fn fire(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Forget an armed request; its callback will find nothing to do.
    pub fn cancel(&mut self) {
        self.pending = false;
    }
}
