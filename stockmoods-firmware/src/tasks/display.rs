//! Display task
//!
//! Renders surface snapshots from the controller into the frame buffer and
//! pushes changed lines to the memory LCD. Also toggles VCOM once a second.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_rp::spi::{Async, Spi};
use embassy_time::{Duration, Ticker};

use stockmoods_display::{FrameBuffer, GraphicsBackend, Renderer};

use crate::channels::SURFACE_UPDATE;
use crate::memlcd::MemoryLcd;

/// VCOM inversion period
const VCOM_PERIOD_MS: u64 = 1000;

pub type Lcd = MemoryLcd<Spi<'static, embassy_rp::peripherals::SPI0, Async>, Output<'static>, Output<'static>>;

/// Display update task
#[embassy_executor::task]
pub async fn display_task(mut lcd: Lcd) {
    info!("Display task started");

    if let Err(e) = lcd.init().await {
        error!("Failed to initialize display: {:?}", e);
    } else {
        info!("Memory LCD initialized");
    }

    let mut gfx = GraphicsBackend::new(FrameBuffer::new());
    let mut renderer = Renderer::new();
    let mut vcom = Ticker::every(Duration::from_millis(VCOM_PERIOD_MS));

    loop {
        match select(SURFACE_UPDATE.wait(), vcom.next()).await {
            Either::First(surface) => {
                match renderer.render(&surface, &mut gfx) {
                    Ok(redrawn) => trace!("Redrawn: {:?}", redrawn),
                    Err(e) => warn!("Render failed: {:?}", e),
                }

                match lcd.flush(gfx.target_mut()).await {
                    Ok(lines) => trace!("Flushed {} lines", lines),
                    Err(e) => {
                        warn!("Display flush failed: {:?}", e);
                        // Panel state is unknown; resend everything next time
                        gfx.target_mut().mark_all_dirty();
                    }
                }
            }
            Either::Second(()) => {
                if let Err(e) = lcd.toggle_vcom().await {
                    warn!("VCOM toggle failed: {:?}", e);
                }
            }
        }
    }
}
