//! The window a video output paints into, and the thread that keeps the
//! toolkit's event loop alive behind it.
//!
//! `create` spawns the surface thread and blocks until it has published a
//! window; `destroy` asks it to stop and blocks until it has torn the
//! window down. Neither wait has a timeout.

use std::{sync::Arc, thread::JoinHandle};

use log::{debug, error, trace, warn};
use strum_macros::Display;
use surface_thread::SurfaceThread;
use thread_priority::*;

use crate::{
    error::{Result, VoutError},
    toolkit::{Application, Geometry, Surface, Toolkit},
};

pub(crate) mod surface_thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SurfaceState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

pub(crate) enum Ready {
    Window {
        surface: Arc<dyn Surface>,
        application: Arc<dyn Application>,
        owns_application: bool,
    },
    Failed(VoutError),
}

pub struct DisplaySurface {
    geometry: Geometry,
    state: SurfaceState,
    window: Option<Arc<dyn Surface>>,
    application: Option<Arc<dyn Application>>,
    owns_application: bool,
    stop_tx: Option<kanal::Sender<()>>,
    surface_thread: Option<JoinHandle<()>>,
}

impl DisplaySurface {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            state: SurfaceState::Stopped,
            window: None,
            application: None,
            owns_application: false,
            stop_tx: None,
            surface_thread: None,
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn window(&self) -> Option<&Arc<dyn Surface>> {
        self.window.as_ref()
    }

    pub fn owns_application(&self) -> bool {
        self.owns_application
    }

    pub fn create(&mut self, toolkit: Arc<dyn Toolkit>) -> Result<()> {
        if self.state != SurfaceState::Stopped {
            return Err(VoutError::SurfaceState(self.state));
        }
        self.state = SurfaceState::Starting;

        let (ready_tx, ready_rx) = kanal::bounded::<Ready>(1);
        let (stop_tx, stop_rx) = kanal::bounded::<()>(1);
        let thread = SurfaceThread::new(toolkit, self.geometry, ready_tx, stop_rx);

        let handle = match std::thread::Builder::new()
            .name("vout surface".to_string())
            .spawn_with_priority(ThreadPriority::Max, move |priority| {
                if let Err(err) = priority {
                    debug!("surface thread keeps default priority: {:?}", err);
                }
                thread.run();
            }) {
            Ok(handle) => handle,
            Err(err) => {
                error!("can't spawn vout thread: {}", err);
                self.state = SurfaceState::Stopped;
                return Err(VoutError::ThreadSpawn(err));
            }
        };

        match ready_rx.recv() {
            Ok(Ready::Window {
                surface,
                application,
                owns_application,
            }) => {
                trace!(
                    "surface {}x{} ready, {} application",
                    self.geometry.width,
                    self.geometry.height,
                    if owns_application { "owned" } else { "shared" }
                );
                self.window = Some(surface);
                self.application = Some(application);
                self.owns_application = owns_application;
                self.stop_tx = Some(stop_tx);
                self.surface_thread = Some(handle);
                self.state = SurfaceState::Running;
                Ok(())
            }
            Ok(Ready::Failed(err)) => {
                Self::join(handle);
                self.state = SurfaceState::Stopped;
                Err(err)
            }
            Err(_) => {
                Self::join(handle);
                self.state = SurfaceState::Stopped;
                Err(VoutError::SurfaceLost)
            }
        }
    }

    /// Stops the surface thread. Only the owner of the application ends its
    /// event loop; a borrower just lets its own thread go.
    pub fn destroy(&mut self) {
        if self.state != SurfaceState::Running {
            return;
        }
        self.state = SurfaceState::Stopping;

        match (&self.application, self.owns_application) {
            (Some(application), true) => application.quit(),
            _ => {
                if let Some(stop_tx) = self.stop_tx.take() {
                    let _ = stop_tx.try_send(());
                }
            }
        }

        if let Some(handle) = self.surface_thread.take() {
            Self::join(handle);
        }

        self.stop_tx = None;
        self.window = None;
        self.application = None;
        self.owns_application = false;
        self.state = SurfaceState::Stopped;
        trace!("surface stopped");
    }

    fn join(handle: JoinHandle<()>) {
        if handle.join().is_err() {
            warn!("surface thread panicked");
        }
    }
}

impl Drop for DisplaySurface {
    fn drop(&mut self) {
        self.destroy();
    }
}
