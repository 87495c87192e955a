use crate::{chroma::Chroma, surface::SurfaceState};

pub type Result<T> = std::result::Result<T, VoutError>;

#[derive(Debug, thiserror::Error)]
pub enum VoutError {
    #[error("out of memory allocating {0} bytes")]
    Allocation(usize),
    #[error("unsupported depth {0}")]
    UnsupportedDepth(u32),
    #[error("chroma {chroma} does not match display depth {depth}")]
    FormatMismatch { chroma: Chroma, depth: u32 },
    #[error("expected a {expected}-bit buffer, got {actual}-bit")]
    DepthMismatch { expected: u32, actual: u32 },
    #[error("no output chroma negotiated")]
    NoChroma,
    #[error("{len} byte plane too small for {width}x{height} with stride {stride}")]
    PlaneBounds {
        len: usize,
        width: usize,
        height: usize,
        stride: usize,
    },
    #[error("cannot rotate {src_width}x{src_height} into {dst_width}x{dst_height}")]
    RotationShape {
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
    },
    #[error("picture has no image buffer")]
    EmptyPicture,
    #[error("surface has no direct framebuffer")]
    NoFrameBuffer,
    #[error("can't spawn vout thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),
    #[error("surface is {0}")]
    SurfaceState(SurfaceState),
    #[error("surface thread exited before the window was ready")]
    SurfaceLost,
    #[error("toolkit error: {0}")]
    Toolkit(String),
    #[error(transparent)]
    Config(#[from] confy::ConfyError),
}
