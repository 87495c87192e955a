//! Pixel format tags negotiated with the host.

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Red/green/blue bit masks of a packed RGB format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelMasks {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
pub enum Chroma {
    /// 5-6-5 packed RGB, two bytes per pixel.
    #[strum(serialize = "RV16")]
    Rv16,
    /// 8-8-8 RGB in a 32-bit word, four bytes per pixel.
    #[strum(serialize = "RV32")]
    Rv32,
}

impl Chroma {
    /// Picks the output chroma for a display depth. Anything that is not
    /// 16 bits is driven as RV32.
    pub fn for_depth(depth: u32) -> Self {
        match depth {
            16 => Chroma::Rv16,
            _ => Chroma::Rv32,
        }
    }

    pub fn fourcc(self) -> [u8; 4] {
        match self {
            Chroma::Rv16 => *b"RV16",
            Chroma::Rv32 => *b"RV32",
        }
    }

    /// The only display depth this chroma can be allocated for.
    pub fn depth(self) -> u32 {
        match self {
            Chroma::Rv16 => 16,
            Chroma::Rv32 => 32,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        self.depth() as usize / 8
    }

    pub fn masks(self) -> ChannelMasks {
        match self {
            Chroma::Rv16 => ChannelMasks {
                red: 0xf800,
                green: 0x07e0,
                blue: 0x001f,
            },
            Chroma::Rv32 => ChannelMasks {
                red: 0x00ff_0000,
                green: 0x0000_ff00,
                blue: 0x0000_00ff,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn depth_selects_chroma() {
        assert_eq!(Chroma::for_depth(16), Chroma::Rv16);
        assert_eq!(Chroma::for_depth(32), Chroma::Rv32);
        assert_eq!(Chroma::for_depth(24), Chroma::Rv32);
        assert_eq!(Chroma::for_depth(8), Chroma::Rv32);
    }

    #[test]
    fn names_match_fourcc() {
        for chroma in Chroma::iter() {
            assert_eq!(chroma.as_ref().as_bytes(), &chroma.fourcc());
            assert_eq!(Chroma::from_str(chroma.as_ref()).unwrap(), chroma);
            assert_eq!(chroma.bytes_per_pixel() * 8, chroma.depth() as usize);
        }
    }

    #[test]
    fn rv16_masks() {
        let masks = Chroma::Rv16.masks();
        assert_eq!((masks.red, masks.green, masks.blue), (0xf800, 0x07e0, 0x001f));
        assert_eq!(masks.red | masks.green | masks.blue, 0xffff);
    }
}
