//! Sharp memory LCD driver
//!
//! Driver for the 144x168 LS013B7DH05 memory-in-pixel panel over SPI.
//! Only lines marked dirty in the [`FrameBuffer`] are sent on flush.
//!
//! The panel expects command and address bytes LSB first while pixel data
//! is sent as stored (leftmost pixel first), so only the header bytes are
//! bit-reversed for the MSB-first SPI peripheral. A set pixel bit is black
//! in the frame buffer but white on the panel, so data bytes are inverted.

use embassy_time::Timer;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

use stockmoods_display::framebuffer::{FrameBuffer, LINE_BYTES};
use stockmoods_display::layout::SCREEN_HEIGHT;

const HEIGHT: usize = SCREEN_HEIGHT as usize;

/// Mode bits, already reversed for MSB-first transmission
mod cmd {
    pub const WRITE_LINE: u8 = 0x80;
    pub const VCOM: u8 = 0x40;
    pub const CLEAR_ALL: u8 = 0x20;
}

/// Per line: address, data, trailer
const LINE_FRAME: usize = 1 + LINE_BYTES + 1;

/// Mode byte, every line, final trailer
const MAX_TRANSFER: usize = 1 + HEIGHT * LINE_FRAME + 1;

/// Memory LCD errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum LcdError {
    Spi,
    Pin,
}

/// Sharp memory LCD driver
pub struct MemoryLcd<SPI, CS, DISP> {
    spi: SPI,
    /// Chip select, active high on this panel
    cs: CS,
    /// Display-on pin
    disp: DISP,
    vcom: bool,
    tx: [u8; MAX_TRANSFER],
}

impl<SPI, CS, DISP> MemoryLcd<SPI, CS, DISP>
where
    SPI: SpiBus,
    CS: OutputPin,
    DISP: OutputPin,
{
    pub fn new(spi: SPI, cs: CS, disp: DISP) -> Self {
        Self {
            spi,
            cs,
            disp,
            vcom: false,
            tx: [0; MAX_TRANSFER],
        }
    }

    /// Clear the panel and turn it on
    pub async fn init(&mut self) -> Result<(), LcdError> {
        self.cs.set_low().map_err(|_| LcdError::Pin)?;
        self.clear().await?;
        self.disp.set_high().map_err(|_| LcdError::Pin)
    }

    /// Clear panel memory to white
    pub async fn clear(&mut self) -> Result<(), LcdError> {
        self.tx[0] = cmd::CLEAR_ALL | self.vcom_bit();
        self.tx[1] = 0;
        self.transfer(2).await
    }

    /// Invert VCOM
    ///
    /// Must be called about once a second to keep DC bias off the liquid
    /// crystal.
    pub async fn toggle_vcom(&mut self) -> Result<(), LcdError> {
        self.vcom = !self.vcom;
        self.tx[0] = self.vcom_bit();
        self.tx[1] = 0;
        self.transfer(2).await
    }

    /// Send every dirty line of `frame`, returning how many were sent
    pub async fn flush(&mut self, frame: &mut FrameBuffer) -> Result<usize, LcdError> {
        let tx = &mut self.tx;
        tx[0] = cmd::WRITE_LINE | if self.vcom { cmd::VCOM } else { 0 };
        let mut len = 1;
        let mut lines = 0;

        frame.take_dirty_rows(|y, row| {
            // Line addresses are 1-based
            tx[len] = ((y + 1) as u8).reverse_bits();
            for (out, &pixels) in tx[len + 1..len + 1 + LINE_BYTES].iter_mut().zip(row) {
                *out = !pixels;
            }
            tx[len + LINE_FRAME - 1] = 0;
            len += LINE_FRAME;
            lines += 1;
        });

        if lines == 0 {
            return Ok(0);
        }

        self.tx[len] = 0;
        self.transfer(len + 1).await?;
        Ok(lines)
    }

    fn vcom_bit(&self) -> u8 {
        if self.vcom {
            cmd::VCOM
        } else {
            0
        }
    }

    async fn transfer(&mut self, len: usize) -> Result<(), LcdError> {
        self.cs.set_high().map_err(|_| LcdError::Pin)?;
        // tsSCS: 3us setup after chip select
        Timer::after_micros(3).await;

        let result = match self.spi.write(&self.tx[..len]).await {
            Ok(()) => self.spi.flush().await,
            Err(e) => Err(e),
        };

        // thSCS: 1us hold before releasing
        Timer::after_micros(1).await;
        self.cs.set_low().map_err(|_| LcdError::Pin)?;
        result.map_err(|_| LcdError::Spi)
    }
}
