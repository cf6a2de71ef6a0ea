//! Stock Moods - stock quote watchface firmware
//!
//! Main firmware binary for RP2040 boards driving a 144x168 Sharp memory LCD.
//! Shows the time and a stock quote with a mood face; quotes come from a
//! companion device over UART.
//!
//! Board wiring:
//! - UART0 (GPIO0 TX, GPIO1 RX): companion link
//! - SPI0 (GPIO18 SCK, GPIO19 MOSI), GPIO17 SCS, GPIO20 DISP: memory LCD
//! - GPIO15: user button to ground

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::config::WATCH_CONFIG;
use crate::memlcd::MemoryLcd;

mod channels;
mod clock;
mod config;
mod memlcd;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Sharp memory LCDs are rated for 1 MHz SPI
const LCD_SPI_HZ: u32 = 1_000_000;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Stock Moods firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = &WATCH_CONFIG;
    info!(
        "Config: 24h={}, cadence={}min, baud={}, ack timeout={}ms",
        config.clock.use_24h,
        config.refresh.cadence_min,
        config.companion.baudrate,
        config.companion.ack_timeout_ms
    );
    clock::set_use_24h(config.clock.use_24h);

    // Setup UART for the companion link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.companion.baudrate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for companion link");

    // Setup SPI for the memory LCD (write-only)
    let mut spi_config = spi::Config::default();
    spi_config.frequency = LCD_SPI_HZ;
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, spi_config);
    let cs = Output::new(p.PIN_17, Level::Low);
    let disp = Output::new(p.PIN_20, Level::Low);
    let lcd = MemoryLcd::new(spi, cs, disp);

    info!("SPI initialized for memory LCD");

    let button = Input::new(p.PIN_15, Pull::Up);

    // Spawn tasks
    unwrap!(spawner.spawn(tasks::controller_task(config)));
    unwrap!(spawner.spawn(tasks::tick_task()));
    unwrap!(spawner.spawn(tasks::companion_rx_task(rx)));
    unwrap!(spawner.spawn(tasks::companion_tx_task(
        tx,
        config.companion.ack_timeout_ms
    )));
    unwrap!(spawner.spawn(tasks::display_task(lcd)));
    unwrap!(spawner.spawn(tasks::button_task(button)));

    info!("All tasks spawned, firmware running");
}
