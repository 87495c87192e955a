use std::cell::{Cell, RefCell};

use gtk::{gdk, glib, graphene, prelude::*, subclass::prelude::*};

pub struct PaintedImage {
    pub texture: gdk::Texture,
    pub x: i32,
    pub y: i32,
}

#[derive(Default)]
pub struct VoutDisplay {
    pub next_frame: RefCell<Option<PaintedImage>>,
    pub screen: Cell<(i32, i32)>,
}

impl VoutDisplay {
    /// Screen size, grown to fit the last image when it spills over.
    fn extent(&self) -> (i32, i32) {
        let (mut width, mut height) = self.screen.get();
        if let Some(frame) = &*self.next_frame.borrow() {
            width = width.max(frame.x + frame.texture.width());
            height = height.max(frame.y + frame.texture.height());
        }
        (width.max(1), height.max(1))
    }
}

#[glib::object_subclass]
impl ObjectSubclass for VoutDisplay {
    const NAME: &'static str = "VoutDisplay";
    type Type = super::VoutDisplay;
    type Interfaces = (gdk::Paintable,);
}

impl ObjectImpl for VoutDisplay {}

impl PaintableImpl for VoutDisplay {
    fn intrinsic_height(&self) -> i32 {
        self.extent().1
    }

    fn intrinsic_width(&self) -> i32 {
        self.extent().0
    }

    fn snapshot(&self, snapshot: &gdk::Snapshot, width: f64, height: f64) {
        snapshot.append_color(
            &gdk::RGBA::BLACK,
            &graphene::Rect::new(0f32, 0f32, width as f32, height as f32),
        );

        if let Some(frame) = &*self.next_frame.borrow() {
            let (extent_width, extent_height) = self.extent();
            let sx = width as f32 / extent_width as f32;
            let sy = height as f32 / extent_height as f32;
            snapshot.append_texture(
                &frame.texture,
                &graphene::Rect::new(
                    frame.x as f32 * sx,
                    frame.y as f32 * sy,
                    frame.texture.width() as f32 * sx,
                    frame.texture.height() as f32 * sy,
                ),
            );
        }
    }
}
