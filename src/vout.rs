//! The video output itself: a frame sink for a fixed 320x240 handheld
//! screen, running fullscreen, with no input handling.

use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::{
    chroma::Chroma,
    config::VoutConfig,
    error::{Result, VoutError},
    host::{Capabilities, ModuleDescriptor, OutputFormat, VoutHost, VoutModule},
    painter::{PaintMode, SurfacePainter},
    picture::{free_picture, new_picture, Picture, PictureStatus, PictureType},
    surface::{DisplaySurface, SurfaceState},
    toolkit::{Geometry, Toolkit},
};

pub struct VideoOutput {
    toolkit: Arc<dyn Toolkit>,
    config: VoutConfig,
    surface: DisplaySurface,
    painter: Box<dyn SurfacePainter>,
    depth: Option<u32>,
}

impl VideoOutput {
    pub const DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
        shortname: "gtk",
        description: "Handheld GTK video output",
        capability: "video output",
        score: 20,
    };

    /// Opens the output window and returns once it is on screen.
    pub fn open(toolkit: Arc<dyn Toolkit>, config: VoutConfig) -> Result<Self> {
        if config.display().is_some() || config.alt_fullscreen() || config.drawable() != -1 {
            debug!("display, alt_fullscreen and drawable settings are ignored");
        }

        let mut surface = DisplaySurface::new(Geometry {
            width: config.width(),
            height: config.height(),
            depth: toolkit.default_depth(),
            fullscreen: config.fullscreen(),
        });

        if let Err(err) = surface.create(toolkit.clone()) {
            error!("could not open the {} output: {}", toolkit.name(), err);
            return Err(err);
        }

        let mut mode = config.paint_mode();
        if mode == PaintMode::Direct
            && surface
                .window()
                .is_some_and(|window| window.frame_buffer().is_none())
        {
            warn!("{} surface has no framebuffer, rotating instead", toolkit.name());
            mode = PaintMode::Rotate;
        }

        info!(
            "{} output {}x{}, {} painter",
            toolkit.name(),
            config.width(),
            config.height(),
            mode
        );

        Ok(Self {
            toolkit,
            config,
            surface,
            painter: mode.painter(),
            depth: None,
        })
    }

    /// Tears the window down.
    pub fn close(mut self) {
        self.surface.destroy();
    }

    /// Fullscreen is set once at open and never changes.
    pub fn toggle_fullscreen(&mut self) {}

    pub fn config(&self) -> &VoutConfig {
        &self.config
    }

    pub fn paint_mode(&self) -> PaintMode {
        self.painter.mode()
    }

    pub fn surface_state(&self) -> SurfaceState {
        self.surface.state()
    }

    pub fn owns_application(&self) -> bool {
        self.surface.owns_application()
    }

    /// Depth the output was negotiated for, once `init` ran.
    pub fn depth(&self) -> Option<u32> {
        self.depth
    }
}

impl VoutModule for VideoOutput {
    fn descriptor(&self) -> ModuleDescriptor {
        Self::DESCRIPTOR
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            init: true,
            end: true,
            render: false,
            display: true,
            manage: false,
        }
    }

    /// Pictures left over from an earlier `init` are released first.
    fn init(&mut self, host: &mut VoutHost) -> Result<()> {
        if host.pictures.output_count() > 0 {
            debug!("init without end, releasing {} pictures", host.pictures.output_count());
            self.end(host);
        }

        let depth = *self.depth.get_or_insert_with(|| self.toolkit.default_depth());
        let chroma = Chroma::for_depth(depth);

        host.output = OutputFormat {
            chroma: Some(chroma),
            masks: chroma.masks(),
            width: self.config.width(),
            height: self.config.height(),
            aspect: host.render.aspect,
        };

        let ceiling = self.config.direct_buffers();
        while host.pictures.output_count() < ceiling {
            let Some(index) = host.pictures.free_slot() else {
                break;
            };

            let picture = &mut host.pictures[index];
            if let Err(err) = new_picture(self.toolkit.as_ref(), depth, &host.output, picture) {
                warn!("direct buffer {} not allocated: {}", index, err);
                break;
            }
            picture.status = PictureStatus::Destroyed;
            picture.kind = PictureType::Direct;

            host.pictures.push_output(index);
        }

        debug!(
            "{} of {} output pictures, {} at depth {}",
            host.pictures.output_count(),
            ceiling,
            chroma,
            depth
        );
        Ok(())
    }

    fn end(&mut self, host: &mut VoutHost) {
        while let Some(index) = host.pictures.pop_output() {
            let picture = &mut host.pictures[index];
            free_picture(self.toolkit.as_ref(), picture);
            picture.status = PictureStatus::Free;
            picture.kind = PictureType::Empty;
        }
    }

    fn display(&mut self, host: &VoutHost, picture: &Picture) -> Result<()> {
        let Some(window) = self.surface.window() else {
            return Ok(());
        };

        let geometry = self.surface.geometry();
        let placement = host.place_picture(geometry.width, geometry.height);
        let image = picture.image().ok_or(VoutError::EmptyPicture)?;

        self.painter
            .paint(self.toolkit.as_ref(), window.as_ref(), placement, image)
    }
}
