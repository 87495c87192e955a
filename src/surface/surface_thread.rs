use std::sync::Arc;

use log::{error, trace};
use parking_lot::Mutex;

use super::Ready;
use crate::toolkit::{Application, Claim, EventLoop, Geometry, Surface, Toolkit};

/// Body of the thread that owns, or borrows, the toolkit application for
/// one display surface.
pub(crate) struct SurfaceThread {
    toolkit: Arc<dyn Toolkit>,
    geometry: Geometry,
    ready_tx: kanal::Sender<Ready>,
    stop_rx: kanal::Receiver<()>,
}

impl SurfaceThread {
    pub(crate) fn new(
        toolkit: Arc<dyn Toolkit>,
        geometry: Geometry,
        ready_tx: kanal::Sender<Ready>,
        stop_rx: kanal::Receiver<()>,
    ) -> Self {
        Self {
            toolkit,
            geometry,
            ready_tx,
            stop_rx,
        }
    }

    pub(crate) fn run(self) {
        trace!("Surface thread started.");
        match self.toolkit.registry().claim(self.toolkit.as_ref()) {
            Ok(Claim::Owned(event_loop)) => self.run_owned(event_loop),
            Ok(Claim::Shared(application)) => self.run_shared(application),
            Err(err) => {
                error!("could not create the {} application: {}", self.toolkit.name(), err);
                let _ = self.ready_tx.send(Ready::Failed(err));
            }
        }
        trace!("Surface thread done.");
    }

    fn run_owned(self, event_loop: Box<dyn EventLoop>) {
        let application = event_loop.application();
        let opened: Arc<Mutex<Option<Arc<dyn Surface>>>> = Arc::new(Mutex::new(None));

        let started = {
            let application = application.clone();
            let opened = opened.clone();
            let ready_tx = self.ready_tx.clone();
            let geometry = self.geometry;
            move || match application.open_window(geometry) {
                Ok(surface) => {
                    *opened.lock() = Some(surface.clone());
                    let _ = ready_tx.send(Ready::Window {
                        surface,
                        application: application.clone(),
                        owns_application: true,
                    });
                }
                Err(err) => {
                    let _ = ready_tx.send(Ready::Failed(err));
                    application.quit();
                }
            }
        };

        event_loop.exec(Box::new(started));

        if let Some(surface) = opened.lock().take() {
            surface.close();
        }
        self.toolkit.registry().release(&application);
    }

    fn run_shared(self, application: Arc<dyn Application>) {
        let surface = match application.open_window(self.geometry) {
            Ok(surface) => surface,
            Err(err) => {
                let _ = self.ready_tx.send(Ready::Failed(err));
                return;
            }
        };

        let _ = self.ready_tx.send(Ready::Window {
            surface: surface.clone(),
            application,
            owns_application: false,
        });

        // Either a stop message or the sender going away ends the wait.
        let _ = self.stop_rx.recv();
        surface.close();
    }
}
