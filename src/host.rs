//! The player-side contract a video output plugs into.

use crate::{
    chroma::{ChannelMasks, Chroma},
    error::Result,
    picture::{Picture, PictureHeap},
    placement::{place_picture, Alignment, PlaceFn, Placement, VOUT_ASPECT_FACTOR},
};

/// What the decoder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderFormat {
    pub width: u32,
    pub height: u32,
    pub aspect: u32,
    /// Stretch to the window instead of clamping to the picture size.
    pub scale: bool,
    pub h_align: Alignment,
    pub v_align: Alignment,
}

impl Default for RenderFormat {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            aspect: VOUT_ASPECT_FACTOR * 4 / 3,
            scale: true,
            h_align: Alignment::Center,
            v_align: Alignment::Center,
        }
    }
}

/// What the output negotiated in `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputFormat {
    pub chroma: Option<Chroma>,
    pub masks: ChannelMasks,
    pub width: u32,
    pub height: u32,
    pub aspect: u32,
}

/// How the host lists a module and ranks it against other modules with
/// the same capability. Higher scores are tried first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub shortname: &'static str,
    pub description: &'static str,
    pub capability: &'static str,
    pub score: u32,
}

/// Which entry points of a [`VoutModule`] the host should call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub init: bool,
    pub end: bool,
    pub render: bool,
    pub display: bool,
    pub manage: bool,
}

/// Per-output state owned by the host and shared with the plugin through
/// the [`VoutModule`] calls.
#[derive(Debug)]
pub struct VoutHost {
    pub render: RenderFormat,
    pub output: OutputFormat,
    pub pictures: PictureHeap,
    pub place: PlaceFn,
}

impl Default for VoutHost {
    fn default() -> Self {
        Self::new(RenderFormat::default())
    }
}

impl VoutHost {
    pub fn new(render: RenderFormat) -> Self {
        Self {
            render,
            output: OutputFormat::default(),
            pictures: PictureHeap::new(),
            place: place_picture,
        }
    }

    pub fn place_picture(&self, width: u32, height: u32) -> Placement {
        (self.place)(&self.render, width, height)
    }
}

/// Entry points of a video output, called from the host's output thread.
pub trait VoutModule {
    fn descriptor(&self) -> ModuleDescriptor;

    fn capabilities(&self) -> Capabilities;

    /// Negotiates `host.output` and allocates the output pictures.
    fn init(&mut self, host: &mut VoutHost) -> Result<()>;

    /// Releases everything `init` allocated.
    fn end(&mut self, host: &mut VoutHost);

    fn render(&mut self, _host: &VoutHost, _picture: &Picture) {}

    fn display(&mut self, host: &VoutHost, picture: &Picture) -> Result<()>;

    fn manage(&mut self, _host: &mut VoutHost) -> Result<()> {
        Ok(())
    }
}
