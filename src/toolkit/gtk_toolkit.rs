//! GTK 4 backend. The application, its windows and their paintables all
//! live on the surface thread that first claimed the registry; other
//! threads reach them through the default main context.

use std::{cell::RefCell, sync::Arc};

use gtk::{gio, glib, prelude::*, ApplicationWindow};
use log::{debug, trace};
use parking_lot::Mutex;

use super::{AppRegistry, Application, EventLoop, Geometry, Surface, Toolkit};
use crate::{
    chroma::Chroma,
    error::{Result, VoutError},
    image::Image,
    vout_display::VoutDisplay,
};

const APP_ID: &str = "io.github.vout_gtk.Output";

static REGISTRY: AppRegistry = AppRegistry::new();

thread_local! {
    static APPLICATION: RefCell<Option<gtk::Application>> = const { RefCell::new(None) };
}

enum SurfaceEvent {
    Draw { x: i32, y: i32, image: Image },
    Close,
}

pub struct GtkToolkit {
    depth: u32,
}

impl GtkToolkit {
    /// GDK does not report a screen depth, so the caller picks the one the
    /// output should negotiate.
    pub fn new(depth: u32) -> Self {
        Self { depth }
    }
}

impl Toolkit for GtkToolkit {
    fn name(&self) -> &'static str {
        "gtk"
    }

    fn default_depth(&self) -> u32 {
        self.depth
    }

    fn registry(&self) -> &AppRegistry {
        &REGISTRY
    }

    fn new_event_loop(&self) -> Result<Box<dyn EventLoop>> {
        if gtk::is_initialized() && !gtk::is_initialized_main_thread() {
            return Err(VoutError::Toolkit(
                "GTK is already bound to another thread".into(),
            ));
        }
        gtk::init().map_err(|err| VoutError::Toolkit(err.to_string()))?;

        let app = gtk::Application::builder()
            .application_id(APP_ID)
            .flags(gio::ApplicationFlags::NON_UNIQUE)
            .build();

        Ok(Box::new(GtkEventLoop {
            app,
            handle: Arc::new(GtkApp {
                context: glib::MainContext::default(),
            }),
        }))
    }
}

struct GtkEventLoop {
    app: gtk::Application,
    handle: Arc<GtkApp>,
}

impl EventLoop for GtkEventLoop {
    fn application(&self) -> Arc<dyn Application> {
        self.handle.clone()
    }

    fn exec(self: Box<Self>, started: Box<dyn FnOnce()>) {
        let app = self.app;
        APPLICATION.with(|slot| slot.replace(Some(app.clone())));

        let started = RefCell::new(Some(started));
        app.connect_activate(move |_| {
            if let Some(started) = started.borrow_mut().take() {
                started();
            }
        });

        let hold = app.hold();
        trace!("GTK loop running");
        let code = app.run_with_args::<&str>(&[]);
        drop(hold);
        debug!("GTK loop exited with {:?}", code);

        APPLICATION.with(|slot| slot.take());
    }
}

struct GtkApp {
    context: glib::MainContext,
}

impl Application for GtkApp {
    fn open_window(&self, geometry: Geometry) -> Result<Arc<dyn Surface>> {
        let (tx, rx) = kanal::bounded::<Result<Arc<dyn Surface>>>(1);
        self.context.invoke(move || {
            let _ = tx.send(open_on_loop(geometry));
        });
        rx.recv()
            .map_err(|_| VoutError::Toolkit("GTK loop is gone".into()))?
    }

    fn quit(&self) {
        self.context.invoke(|| {
            APPLICATION.with(|slot| {
                if let Some(app) = slot.borrow().as_ref() {
                    app.quit();
                }
            })
        });
    }
}

/// Runs on the GTK thread.
fn open_on_loop(geometry: Geometry) -> Result<Arc<dyn Surface>> {
    let app = APPLICATION
        .with(|slot| slot.borrow().clone())
        .ok_or_else(|| VoutError::Toolkit("no GTK application on this thread".into()))?;

    let frame_buffer = Image::new(
        geometry.width as usize,
        geometry.height as usize,
        Chroma::for_depth(geometry.depth).depth(),
    )?;

    let display = VoutDisplay::new(geometry.width, geometry.height);

    let picture = gtk::Picture::builder()
        .paintable(&display)
        .hexpand(true)
        .vexpand(true)
        .halign(gtk::Align::Fill)
        .valign(gtk::Align::Fill)
        .content_fit(gtk::ContentFit::Contain)
        .can_shrink(true)
        .build();

    let window = ApplicationWindow::builder()
        .application(&app)
        .title("vout")
        .default_width(geometry.width as i32)
        .default_height(geometry.height as i32)
        .child(&picture)
        .build();

    if geometry.fullscreen {
        window.fullscreen();
    }
    window.present();

    let (event_tx, event_rx) = kanal::bounded::<SurfaceEvent>(2);

    let event_handler = async move {
        while let Ok(event) = event_rx.as_async().recv().await {
            match event {
                SurfaceEvent::Draw { x, y, image } => display.draw_image(x, y, &image),
                SurfaceEvent::Close => break,
            }
        }
        window.close();
    };

    glib::MainContext::default().spawn_local(event_handler);

    Ok(Arc::new(GtkSurface {
        size: (geometry.width, geometry.height),
        event_tx,
        frame_buffer: Mutex::new(frame_buffer),
    }))
}

struct GtkSurface {
    size: (u32, u32),
    event_tx: kanal::Sender<SurfaceEvent>,
    frame_buffer: Mutex<Image>,
}

impl Surface for GtkSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn draw_image(&self, x: i32, y: i32, image: Image) -> Result<()> {
        match self.event_tx.try_send(SurfaceEvent::Draw { x, y, image }) {
            Ok(true) => Ok(()),
            Ok(false) => {
                trace!("window busy, frame dropped");
                Ok(())
            }
            Err(_) => Err(VoutError::Toolkit("window is gone".into())),
        }
    }

    fn frame_buffer(&self) -> Option<&Mutex<Image>> {
        Some(&self.frame_buffer)
    }

    fn flush(&self) -> Result<()> {
        let image = self.frame_buffer.lock().clone();
        self.draw_image(0, 0, image)
    }

    fn close(&self) {
        let _ = self.event_tx.try_send(SurfaceEvent::Close);
    }
}
