//! A toolkit without a screen. Windows are plain buffers and the event loop
//! just waits to be told to quit; counters record what the output did.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use log::trace;
use parking_lot::Mutex;

use super::{AppRegistry, Application, EventLoop, Geometry, Surface, Toolkit};
use crate::{
    chroma::Chroma,
    error::{Result, VoutError},
    image::Image,
};

/// One [`Surface::draw_image`] call.
#[derive(Debug, Clone)]
pub struct DrawRecord {
    pub x: i32,
    pub y: i32,
    pub image: Image,
}

#[derive(Debug, Default)]
pub struct HeadlessStats {
    images: AtomicUsize,
    event_loops: AtomicUsize,
    quits: AtomicUsize,
    windows_opened: AtomicUsize,
    windows_closed: AtomicUsize,
    draws: AtomicUsize,
    flushes: AtomicUsize,
    last_draw: Mutex<Option<DrawRecord>>,
    last_flush: Mutex<Option<Image>>,
    allocated: Mutex<Vec<usize>>,
    freed: Mutex<Vec<usize>>,
}

impl HeadlessStats {
    pub fn images(&self) -> usize {
        self.images.load(Ordering::SeqCst)
    }

    pub fn event_loops(&self) -> usize {
        self.event_loops.load(Ordering::SeqCst)
    }

    pub fn quits(&self) -> usize {
        self.quits.load(Ordering::SeqCst)
    }

    pub fn windows_opened(&self) -> usize {
        self.windows_opened.load(Ordering::SeqCst)
    }

    pub fn windows_closed(&self) -> usize {
        self.windows_closed.load(Ordering::SeqCst)
    }

    pub fn draws(&self) -> usize {
        self.draws.load(Ordering::SeqCst)
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    pub fn last_draw(&self) -> Option<DrawRecord> {
        self.last_draw.lock().clone()
    }

    /// Images handed back through [`Toolkit::free_image`], as allocation
    /// ordinals: 0 is the first image [`Toolkit::new_image`] returned.
    pub fn freed(&self) -> Vec<usize> {
        self.freed.lock().clone()
    }

    /// Framebuffer contents at the last flush.
    pub fn last_flush(&self) -> Option<Image> {
        self.last_flush.lock().clone()
    }
}

pub struct HeadlessToolkit {
    depth: u32,
    image_budget: Option<AtomicUsize>,
    frame_buffer: bool,
    fail_windows: bool,
    panic_on_loop: bool,
    registry: AppRegistry,
    stats: Arc<HeadlessStats>,
}

impl HeadlessToolkit {
    pub fn new(depth: u32) -> Self {
        Self {
            depth,
            image_budget: None,
            frame_buffer: true,
            fail_windows: false,
            panic_on_loop: false,
            registry: AppRegistry::new(),
            stats: Arc::new(HeadlessStats::default()),
        }
    }

    /// Fails every image allocation after the first `images`.
    pub fn with_image_budget(mut self, images: usize) -> Self {
        self.image_budget = Some(AtomicUsize::new(images));
        self
    }

    pub fn without_frame_buffer(mut self) -> Self {
        self.frame_buffer = false;
        self
    }

    /// Makes the application refuse to open windows.
    pub fn with_failing_windows(mut self) -> Self {
        self.fail_windows = true;
        self
    }

    /// Makes the surface thread die while building the event loop.
    pub fn with_panicking_event_loop(mut self) -> Self {
        self.panic_on_loop = true;
        self
    }

    pub fn stats(&self) -> Arc<HeadlessStats> {
        self.stats.clone()
    }
}

impl Toolkit for HeadlessToolkit {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn default_depth(&self) -> u32 {
        self.depth
    }

    fn new_image(&self, width: usize, height: usize, depth: u32) -> Result<Image> {
        if let Some(budget) = &self.image_budget {
            budget
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .map_err(|_| {
                    VoutError::Allocation(
                        width
                            .saturating_mul(height)
                            .saturating_mul(depth as usize / 8),
                    )
                })?;
        }
        let image = Image::new(width, height, depth)?;
        self.stats.images.fetch_add(1, Ordering::SeqCst);
        self.stats.allocated.lock().push(image.bits().as_ptr() as usize);
        Ok(image)
    }

    fn free_image(&self, image: Image) {
        let address = image.bits().as_ptr() as usize;
        let ordinal = self
            .stats
            .allocated
            .lock()
            .iter()
            .rposition(|&allocated| allocated == address);
        if let Some(ordinal) = ordinal {
            self.stats.freed.lock().push(ordinal);
        }
    }

    fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    fn new_event_loop(&self) -> Result<Box<dyn EventLoop>> {
        if self.panic_on_loop {
            panic!("headless event loop failed to start");
        }
        let (quit_tx, quit_rx) = kanal::bounded::<()>(1);
        self.stats.event_loops.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(HeadlessEventLoop {
            app: Arc::new(HeadlessApp {
                quit_tx,
                frame_buffer: self.frame_buffer,
                fail_windows: self.fail_windows,
                stats: self.stats.clone(),
            }),
            quit_rx,
        }))
    }
}

struct HeadlessEventLoop {
    app: Arc<HeadlessApp>,
    quit_rx: kanal::Receiver<()>,
}

impl EventLoop for HeadlessEventLoop {
    fn application(&self) -> Arc<dyn Application> {
        self.app.clone()
    }

    fn exec(self: Box<Self>, started: Box<dyn FnOnce()>) {
        trace!("headless loop running");
        started();
        let _ = self.quit_rx.recv();
        trace!("headless loop done");
    }
}

struct HeadlessApp {
    quit_tx: kanal::Sender<()>,
    frame_buffer: bool,
    fail_windows: bool,
    stats: Arc<HeadlessStats>,
}

impl Application for HeadlessApp {
    fn open_window(&self, geometry: Geometry) -> Result<Arc<dyn Surface>> {
        if self.fail_windows {
            return Err(VoutError::Toolkit("window refused".into()));
        }

        let frame_buffer = match self.frame_buffer {
            true => Some(Mutex::new(Image::new(
                geometry.width as usize,
                geometry.height as usize,
                Chroma::for_depth(geometry.depth).depth(),
            )?)),
            false => None,
        };

        self.stats.windows_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(HeadlessSurface {
            size: (geometry.width, geometry.height),
            frame_buffer,
            closed: AtomicBool::new(false),
            stats: self.stats.clone(),
        }))
    }

    fn quit(&self) {
        self.stats.quits.fetch_add(1, Ordering::SeqCst);
        let _ = self.quit_tx.try_send(());
    }
}

struct HeadlessSurface {
    size: (u32, u32),
    frame_buffer: Option<Mutex<Image>>,
    closed: AtomicBool,
    stats: Arc<HeadlessStats>,
}

impl Surface for HeadlessSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn draw_image(&self, x: i32, y: i32, image: Image) -> Result<()> {
        self.stats.draws.fetch_add(1, Ordering::SeqCst);
        *self.stats.last_draw.lock() = Some(DrawRecord { x, y, image });
        Ok(())
    }

    fn frame_buffer(&self) -> Option<&Mutex<Image>> {
        self.frame_buffer.as_ref()
    }

    fn flush(&self) -> Result<()> {
        let frame_buffer = self.frame_buffer.as_ref().ok_or(VoutError::NoFrameBuffer)?;
        self.stats.flushes.fetch_add(1, Ordering::SeqCst);
        *self.stats.last_flush.lock() = Some(frame_buffer.lock().clone());
        Ok(())
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.stats.windows_closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}
