mod imp;

use gtk::{gdk, glib, prelude::*, subclass::prelude::*};

use crate::image::Image;

glib::wrapper! {
    pub struct VoutDisplay(ObjectSubclass<imp::VoutDisplay>) @implements gdk::Paintable;
}

impl VoutDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        let display: Self = glib::Object::new();
        display.imp().screen.set((width as i32, height as i32));
        display
    }

    pub fn draw_image(&self, x: i32, y: i32, image: &Image) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }

        let imp = self.imp();

        let bytes = glib::Bytes::from_owned(image.to_rgb24());

        let pixbuf = gtk::gdk_pixbuf::Pixbuf::from_bytes(
            &bytes,
            gtk::gdk_pixbuf::Colorspace::Rgb,
            false,
            8,
            image.width() as i32,
            image.height() as i32,
            image.width() as i32 * 3,
        );

        let texture = gdk::Texture::for_pixbuf(&pixbuf);

        let moved = imp
            .next_frame
            .borrow()
            .as_ref()
            .map(|frame| (frame.x, frame.y, frame.texture.width(), frame.texture.height()))
            != Some((x, y, texture.width(), texture.height()));

        imp.next_frame
            .replace(Some(imp::PaintedImage { texture, x, y }));

        if moved {
            self.invalidate_size();
        }
        self.invalidate_contents();
    }
}
