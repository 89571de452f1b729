//! On-board memories: mirrored work RAM, nametable VRAM, palette RAM.

use crate::cartridge::Mirroring;
use crate::image::Rgb;

/// A RAM of `N` bytes that mirrors across its whole address range.
///
/// Out-of-range addresses fold back by keeping the low bits, so a 2 KiB RAM
/// addressed at `$0800` reads the byte at `$0000`. `N` must be a power of
/// two no larger than the 16-bit address space; invalid sizes fail to
/// compile.
pub struct MirroredRam<const N: usize> {
    mem: [u8; N],
}

impl<const N: usize> MirroredRam<N> {
    #[must_use]
    pub fn new() -> Self {
        const {
            assert!(N.is_power_of_two(), "RAM size must be a power of two");
            assert!(N <= 0x1_0000, "RAM must fit a 16-bit address space");
        }
        Self { mem: [0; N] }
    }

    fn mirror(addr: u16) -> usize {
        addr as usize & (N - 1)
    }

    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        self.mem[Self::mirror(addr)]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.mem[Self::mirror(addr)] = value;
    }
}

impl<const N: usize> Default for MirroredRam<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// The 2 KiB nametable memory.
///
/// The PPU address space reserves 4 KiB for four nametables but the console
/// only wires up two; the cartridge selects which pairs alias. The mirror
/// function drops the two nametable-select bits and re-inserts the one the
/// mirroring mode preserves: under vertical mirroring tables 0/2 and 1/3
/// coincide (bit 10 selects the page), under horizontal mirroring 0/1 and
/// 2/3 do (bit 11 selects the page).
pub struct Vram {
    ram: MirroredRam<2048>,
    mirroring: Mirroring,
}

impl Vram {
    #[must_use]
    pub fn new(mirroring: Mirroring) -> Self {
        Self {
            ram: MirroredRam::new(),
            mirroring,
        }
    }

    fn mirror(&self, addr: u16) -> u16 {
        let page = match self.mirroring {
            Mirroring::Horizontal => addr & 0x0800 != 0,
            // Four-screen needs cartridge VRAM; with only the two on-board
            // pages it degenerates to the vertical layout.
            Mirroring::Vertical | Mirroring::FourScreen => addr & 0x0400 != 0,
        };
        (addr & !0x0C00) | (u16::from(page) << 10)
    }

    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        self.ram.read(self.mirror(addr))
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.ram.write(self.mirror(addr), value);
    }
}

/// The 32-byte palette memory with its background-entry aliasing.
///
/// Addresses `$3F10/$3F14/$3F18/$3F1C` are the same cells as
/// `$3F00/$3F04/$3F08/$3F0C`; the fold applies before the 32-byte mirror.
pub struct PaletteRam {
    ram: MirroredRam<32>,
}

impl PaletteRam {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: MirroredRam::new(),
        }
    }

    fn bg_mirror(addr: u16) -> u16 {
        if addr & 0x13 == 0x10 {
            addr & !0x10
        } else {
            addr
        }
    }

    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        self.ram.read(Self::bg_mirror(addr))
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.ram.write(Self::bg_mirror(addr), value);
    }

    /// Resolve one entry of one palette to its NTSC master color.
    #[must_use]
    pub fn get_color(&self, palette: u8, index: u8) -> Rgb {
        let entry = self.read(u16::from((palette << 2) | (index & 0x03)));
        NTSC_PALETTE[usize::from(entry) & (NTSC_PALETTE.len() - 1)]
    }

    /// The four resolved colors of one palette.
    #[must_use]
    pub fn get_palette(&self, palette: u8) -> [Rgb; 4] {
        [
            self.get_color(palette, 0),
            self.get_color(palette, 1),
            self.get_color(palette, 2),
            self.get_color(palette, 3),
        ]
    }
}

impl Default for PaletteRam {
    fn default() -> Self {
        Self::new()
    }
}

const fn c(r: u8, g: u8, b: u8) -> Rgb {
    Rgb::new(r, g, b)
}

/// The 64-entry NTSC master palette of the 2C02.
#[rustfmt::skip]
pub const NTSC_PALETTE: [Rgb; 64] = [
    // $00
    c(84, 84, 84),    c(0, 30, 116),    c(8, 16, 144),    c(48, 0, 136),
    c(68, 0, 100),    c(92, 0, 48),     c(84, 4, 0),      c(60, 24, 0),
    c(32, 42, 0),     c(8, 58, 0),      c(0, 64, 0),      c(0, 60, 0),
    c(0, 50, 60),     c(0, 0, 0),       c(0, 0, 0),       c(0, 0, 0),
    // $10
    c(152, 150, 152), c(8, 76, 196),    c(48, 50, 236),   c(92, 30, 228),
    c(136, 20, 176),  c(160, 20, 100),  c(152, 34, 32),   c(120, 60, 0),
    c(84, 90, 0),     c(40, 114, 0),    c(8, 124, 0),     c(0, 118, 40),
    c(0, 102, 120),   c(0, 0, 0),       c(0, 0, 0),       c(0, 0, 0),
    // $20
    c(236, 238, 236), c(76, 154, 236),  c(120, 124, 236), c(176, 98, 236),
    c(228, 84, 236),  c(236, 88, 180),  c(236, 106, 100), c(212, 136, 32),
    c(160, 170, 0),   c(116, 196, 0),   c(76, 208, 32),   c(56, 204, 108),
    c(56, 180, 204),  c(60, 60, 60),    c(0, 0, 0),       c(0, 0, 0),
    // $30
    c(236, 238, 236), c(168, 204, 236), c(188, 188, 236), c(212, 178, 236),
    c(236, 174, 236), c(236, 174, 212), c(236, 180, 176), c(228, 196, 144),
    c(204, 210, 120), c(180, 222, 120), c(168, 226, 144), c(152, 226, 180),
    c(160, 214, 228), c(160, 162, 160), c(0, 0, 0),       c(0, 0, 0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrored_ram_folds_addresses() {
        let mut ram: MirroredRam<2048> = MirroredRam::new();
        ram.write(0x0000, 0xAB);
        for n in 0..4u16 {
            assert_eq!(ram.read(n * 0x0800), 0xAB);
        }
        ram.write(0x1FFF, 0xCD);
        assert_eq!(ram.read(0x07FF), 0xCD);
    }

    #[test]
    fn vram_vertical_mirroring() {
        let mut vram = Vram::new(Mirroring::Vertical);
        vram.write(0x2000, 0x11);
        vram.write(0x2400, 0x22);
        // 0/2 alias, 1/3 alias
        assert_eq!(vram.read(0x2800), 0x11);
        assert_eq!(vram.read(0x2C00), 0x22);
        assert_ne!(vram.read(0x2400), 0x11);
    }

    #[test]
    fn vram_horizontal_mirroring() {
        let mut vram = Vram::new(Mirroring::Horizontal);
        vram.write(0x2000, 0x11);
        vram.write(0x2800, 0x22);
        // 0/1 alias, 2/3 alias
        assert_eq!(vram.read(0x2400), 0x11);
        assert_eq!(vram.read(0x2C00), 0x22);
        assert_ne!(vram.read(0x2800), 0x11);
    }

    #[test]
    fn vram_mirroring_holds_for_every_offset() {
        let mut vert = Vram::new(Mirroring::Vertical);
        let mut horiz = Vram::new(Mirroring::Horizontal);
        for k in 0..0x400u16 {
            vert.write(0x2000 + k, (k & 0xFF) as u8);
            horiz.write(0x2000 + k, (k & 0xFF) as u8);
        }
        for k in 0..0x400u16 {
            assert_eq!(vert.read(0x2000 + k), vert.read(0x2800 + k));
            assert_eq!(horiz.read(0x2000 + k), horiz.read(0x2400 + k));
        }
    }

    #[test]
    fn palette_background_aliases() {
        let mut palette = PaletteRam::new();
        for (alias, base) in [(0x3F10, 0x3F00), (0x3F14, 0x3F04), (0x3F18, 0x3F08), (0x3F1C, 0x3F0C)]
        {
            palette.write(alias, 0x2A);
            assert_eq!(palette.read(base), 0x2A);
            palette.write(base, 0x15);
            assert_eq!(palette.read(alias), 0x15);
        }
        // Non-background entries do not alias
        palette.write(0x3F11, 0x01);
        assert_ne!(palette.read(0x3F01), 0x01);
    }

    #[test]
    fn palette_color_lookup() {
        let mut palette = PaletteRam::new();
        palette.write(0x3F05, 0x21); // palette 1, entry 1
        let color = palette.get_color(1, 1);
        assert_eq!(color, NTSC_PALETTE[0x21]);
        // Entry index folds modulo 4
        assert_eq!(palette.get_color(1, 5), color);
    }

    #[test]
    fn palette_get_palette_resolves_four_entries() {
        let mut palette = PaletteRam::new();
        for i in 0..4u16 {
            palette.write(0x3F08 + i, 0x20 + i as u8);
        }
        let colors = palette.get_palette(2);
        for (i, color) in colors.iter().enumerate() {
            assert_eq!(*color, NTSC_PALETTE[0x20 + i]);
        }
    }
}
