//! Letterboxing of the rendered picture inside the output window.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::host::RenderFormat;

/// Fixed-point unit of picture aspect ratios: 4:3 is `VOUT_ASPECT_FACTOR * 4 / 3`.
pub const VOUT_ASPECT_FACTOR: u32 = 432_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Start,
    #[default]
    Center,
    End,
}

impl Alignment {
    fn offset(self, room: u32, used: u32) -> i32 {
        match self {
            Alignment::Start => 0,
            Alignment::Center => ((room - used) / 2) as i32,
            Alignment::End => (room - used) as i32,
        }
    }
}

/// Destination rectangle of a picture inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Signature of the host's placement function.
pub type PlaceFn = fn(&RenderFormat, u32, u32) -> Placement;

/// Fits a picture of `render`'s aspect ratio in a `width` x `height` window.
pub fn place_picture(render: &RenderFormat, width: u32, height: u32) -> Placement {
    if width == 0 || height == 0 {
        return Placement::default();
    }

    let factor = VOUT_ASPECT_FACTOR as u64;
    let (mut w, mut h) = if render.scale {
        (width as u64, height as u64)
    } else {
        (
            width.min(render.width) as u64,
            height.min(render.height) as u64,
        )
    };
    if w == 0 || h == 0 {
        return Placement::default();
    }

    let aspect = match render.aspect {
        0 => factor * w / h,
        aspect => aspect as u64,
    };

    if factor * w / h < aspect {
        w = h * aspect / factor;
    } else {
        h = w * factor / aspect;
    }

    if w > width as u64 {
        w = width as u64;
        h = factor * w / aspect;
    }
    if h > height as u64 {
        h = height as u64;
        w = h * aspect / factor;
    }

    let (w, h) = (w as u32, h as u32);
    Placement {
        x: render.h_align.offset(width, w),
        y: render.v_align.offset(height, h),
        width: w,
        height: h,
    }
}
