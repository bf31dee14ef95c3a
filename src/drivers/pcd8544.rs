//! PCD8544 (Nokia 5110) 84×48 monochrome LCD over SPI.
//!
//! The driver keeps a 504-byte framebuffer: six horizontal banks of 84
//! columns, one byte per column, LSB at the top.  Text is rendered with a
//! 5×7 ASCII font and the whole buffer is pushed on [`Pcd8544::flush`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use log::debug;

use crate::drivers::display::{DisplayError, HEIGHT, TextItem, TextPanel, WIDTH};

pub const BUFFER_LEN: usize = WIDTH as usize * HEIGHT as usize / 8;

const CMD_FUNCTION_BASIC: u8 = 0x20;
const CMD_FUNCTION_EXTENDED: u8 = 0x21;
const CMD_DISPLAY_NORMAL: u8 = 0x0C;
const CMD_SET_Y: u8 = 0x40;
const CMD_SET_X: u8 = 0x80;
// Extended instruction set.
const CMD_TEMP_COEFF: u8 = 0x04;
const CMD_BIAS_1_48: u8 = 0x14;
const CMD_SET_VOP: u8 = 0x80;

/// Operating voltage is 7 bits.
pub const MAX_CONTRAST: u8 = 0x7F;

pub struct Pcd8544<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
    buffer: [u8; BUFFER_LEN],
}

impl<SPI, DC, RST> Pcd8544<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
        Self {
            spi,
            dc,
            rst,
            buffer: [0; BUFFER_LEN],
        }
    }

    /// Hardware reset, then bias, temperature and contrast setup.
    pub fn init(&mut self, delay: &mut impl DelayNs, contrast: u8) -> Result<(), DisplayError> {
        self.rst.set_low().map_err(|_| DisplayError::Pin)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(|_| DisplayError::Pin)?;

        self.command(&[
            CMD_FUNCTION_EXTENDED,
            CMD_SET_VOP | contrast.min(MAX_CONTRAST),
            CMD_TEMP_COEFF,
            CMD_BIAS_1_48,
            CMD_FUNCTION_BASIC,
            CMD_DISPLAY_NORMAL,
        ])?;
        debug!("DISPLAY | pcd8544 ready, contrast {}", contrast);
        self.clear();
        self.flush()
    }

    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        self.command(&[
            CMD_FUNCTION_EXTENDED,
            CMD_SET_VOP | contrast.min(MAX_CONTRAST),
            CMD_FUNCTION_BASIC,
        ])
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Off-panel pixels are ignored.
    pub fn set_pixel(&mut self, x: i16, y: i16, on: bool) {
        if !(0..i16::from(WIDTH)).contains(&x) || !(0..i16::from(HEIGHT)).contains(&y) {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let idx = (y / 8) * usize::from(WIDTH) + x;
        let bit = 1 << (y % 8);
        if on {
            self.buffer[idx] |= bit;
        } else {
            self.buffer[idx] &= !bit;
        }
    }

    pub fn pixel(&self, x: u8, y: u8) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        let idx = usize::from(y / 8) * usize::from(WIDTH) + usize::from(x);
        self.buffer[idx] & (1 << (y % 8)) != 0
    }

    /// Draw `text` with its top-left corner at (`x`, `y`).
    pub fn draw_text(&mut self, x: u8, y: u8, text: &str) {
        let mut cx = i16::from(x);
        for ch in text.chars() {
            let glyph = glyph(ch);
            for (col, bits) in glyph.iter().enumerate() {
                for row in 0..8 {
                    if bits & (1 << row) != 0 {
                        self.set_pixel(cx + col as i16, i16::from(y) + row, true);
                    }
                }
            }
            cx += 6;
            if cx >= i16::from(WIDTH) {
                break;
            }
        }
    }

    pub fn buffer(&self) -> &[u8; BUFFER_LEN] {
        &self.buffer
    }

    pub fn flush(&mut self) -> Result<(), DisplayError> {
        self.command(&[CMD_SET_X, CMD_SET_Y])?;
        self.dc.set_high().map_err(|_| DisplayError::Pin)?;
        self.spi.write(&self.buffer).map_err(|_| DisplayError::Bus)
    }

    pub fn release(self) -> (SPI, DC, RST) {
        (self.spi, self.dc, self.rst)
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Pin)?;
        self.spi.write(bytes).map_err(|_| DisplayError::Bus)
    }
}

impl<SPI, DC, RST> TextPanel for Pcd8544<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    fn show(&mut self, frame: &[TextItem]) -> Result<(), DisplayError> {
        self.clear();
        for item in frame {
            self.draw_text(item.x, item.y, &item.text);
        }
        self.flush()
    }
}

/// Column bitmaps for `ch`; anything outside printable ASCII renders as `?`.
fn glyph(ch: char) -> &'static [u8; 5] {
    let code = ch as u32;
    let idx = if (0x20..=0x7E).contains(&code) {
        (code - 0x20) as usize
    } else {
        usize::from(b'?' - 0x20)
    };
    &FONT_5X7[idx]
}

/// Printable ASCII 0x20..=0x7E.
static FONT_5X7: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x00, 0x08, 0x14, 0x22, 0x41], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x41, 0x22, 0x14, 0x08, 0x00], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x01, 0x01], // F
    [0x3E, 0x41, 0x41, 0x51, 0x32], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x04, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x7F, 0x20, 0x18, 0x20, 0x7F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x03, 0x04, 0x78, 0x04, 0x03], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x00, 0x7F, 0x41, 0x41], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // \
    [0x41, 0x41, 0x7F, 0x00, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x08, 0x14, 0x54, 0x54, 0x3C], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x00, 0x7F, 0x10, 0x28, 0x44], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x10, 0x08, 0x08, 0x10, 0x08], // ~
];
