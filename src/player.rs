use std::time::{Duration, Instant};

use log::{trace, warn};
use vout_gtk::{pattern, VideoOutput, VoutHost, VoutModule};

/// Stands in for the decoder: writes a scrolling gradient into the first
/// output picture and displays it at a fixed rate.
pub(crate) struct Player {
    frame_time: Duration,
    next_refresh: Instant,
    phase: usize,
}

impl Player {
    pub(crate) fn new(fps: u32) -> Self {
        Self {
            frame_time: Duration::from_micros(1_000_000 / fps.max(1) as u64),
            next_refresh: Instant::now(),
            phase: 0,
        }
    }

    /// Plays `frames` frames. Returns how many reached the output.
    pub(crate) fn run(&mut self, vout: &mut VideoOutput, host: &mut VoutHost, frames: u64) -> u64 {
        let mut shown = 0;

        for _ in 0..frames {
            let Some(picture) = host.pictures.output_mut(0) else {
                warn!("no output picture to decode into");
                break;
            };
            if let Some(image) = picture.image_mut() {
                if let Err(err) = pattern::gradient(image, self.phase) {
                    warn!("could not draw test pattern: {}", err);
                    break;
                }
            }

            let Some(picture) = host.pictures.output(0) else {
                break;
            };
            match vout.display(host, picture) {
                Ok(()) => {
                    trace!("frame {} displayed", self.phase);
                    shown += 1;
                }
                Err(err) => warn!("frame {} not displayed: {}", self.phase, err),
            }
            self.phase += 1;

            let now = Instant::now();
            if self.next_refresh > now {
                std::thread::sleep(self.next_refresh - now);
            }
            self.next_refresh = Instant::now() + self.frame_time;
        }

        shown
    }
}
