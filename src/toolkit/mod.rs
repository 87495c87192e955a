//! Seam between the video output and the GUI toolkit that owns the screen.
//!
//! A toolkit has at most one application object per process. The first
//! surface thread that finds the [`AppRegistry`] empty builds the event
//! loop and owns it; later ones borrow the registered [`Application`] to
//! open their windows.

use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

use crate::{error::Result, image::Image};

pub mod gtk_toolkit;
pub mod headless;

/// Size and mode of the window a surface lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub fullscreen: bool,
}

pub trait Toolkit: Send + Sync {
    fn name(&self) -> &'static str;

    /// Bits per pixel of the screen.
    fn default_depth(&self) -> u32;

    fn new_image(&self, width: usize, height: usize, depth: u32) -> Result<Image> {
        Image::new(width, height, depth)
    }

    /// Hands back an image from [`Toolkit::new_image`].
    fn free_image(&self, image: Image) {
        drop(image);
    }

    fn registry(&self) -> &AppRegistry;

    /// Builds the application object. Runs on the thread that will later
    /// call [`EventLoop::exec`].
    fn new_event_loop(&self) -> Result<Box<dyn EventLoop>>;
}

pub trait EventLoop {
    fn application(&self) -> Arc<dyn Application>;

    /// Runs the event loop until [`Application::quit`]. `started` is called
    /// once from inside the loop, when windows can be opened.
    fn exec(self: Box<Self>, started: Box<dyn FnOnce()>);
}

/// Thread-safe handle on a running application object.
pub trait Application: Send + Sync {
    fn open_window(&self, geometry: Geometry) -> Result<Arc<dyn Surface>>;

    /// Makes [`EventLoop::exec`] return.
    fn quit(&self);
}

/// A window frames are painted into.
pub trait Surface: Send + Sync {
    fn size(&self) -> (u32, u32);

    /// Paints `image` with its top-left corner at `(x, y)`.
    fn draw_image(&self, x: i32, y: i32, image: Image) -> Result<()>;

    /// Raw framebuffer of the window, when the toolkit exposes one.
    fn frame_buffer(&self) -> Option<&Mutex<Image>> {
        None
    }

    /// Pushes framebuffer writes to the screen.
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self);
}

pub enum Claim {
    Owned(Box<dyn EventLoop>),
    Shared(Arc<dyn Application>),
}

/// The single application slot of a toolkit.
pub struct AppRegistry {
    slot: Mutex<Option<Arc<dyn Application>>>,
}

impl Default for AppRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AppRegistry {
    pub const fn new() -> Self {
        Self {
            slot: parking_lot::const_mutex(None),
        }
    }

    /// Returns the registered application, or builds and registers a new
    /// one on the calling thread.
    pub fn claim(&self, toolkit: &dyn Toolkit) -> Result<Claim> {
        let mut slot = self.slot.lock();
        if let Some(app) = slot.as_ref() {
            debug!("{} application already running, sharing it", toolkit.name());
            return Ok(Claim::Shared(app.clone()));
        }

        let event_loop = toolkit.new_event_loop()?;
        *slot = Some(event_loop.application());
        debug!("{} application created", toolkit.name());
        Ok(Claim::Owned(event_loop))
    }

    /// Empties the slot if `app` is the registered application.
    pub fn release(&self, app: &Arc<dyn Application>) {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|registered| Arc::ptr_eq(registered, app)) {
            *slot = None;
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.slot.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headless::HeadlessToolkit;

    #[test]
    fn second_claim_shares_the_first() {
        let toolkit = HeadlessToolkit::new(16);
        let registry = toolkit.registry();

        let owned = match registry.claim(&toolkit).unwrap() {
            Claim::Owned(event_loop) => event_loop,
            Claim::Shared(_) => panic!("empty registry must hand out ownership"),
        };
        let app = owned.application();
        assert!(registry.is_claimed());

        match registry.claim(&toolkit).unwrap() {
            Claim::Shared(shared) => assert!(Arc::ptr_eq(&shared, &app)),
            Claim::Owned(_) => panic!("second claim must share"),
        }
        assert_eq!(toolkit.stats().event_loops(), 1);

        registry.release(&app);
        assert!(!registry.is_claimed());
    }

    #[test]
    fn release_ignores_strangers() {
        let toolkit = HeadlessToolkit::new(16);
        let other = HeadlessToolkit::new(16);

        let Claim::Owned(mine) = toolkit.registry().claim(&toolkit).unwrap() else {
            panic!("expected ownership");
        };
        let Claim::Owned(theirs) = other.registry().claim(&other).unwrap() else {
            panic!("expected ownership");
        };

        toolkit.registry().release(&theirs.application());
        assert!(toolkit.registry().is_claimed());
        toolkit.registry().release(&mine.application());
        assert!(!toolkit.registry().is_claimed());
    }
}
