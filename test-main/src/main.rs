mod config;

use crate::config::Config;
use dotenv::dotenv;
use dotlcd::lcd::hd44780::{Bitmap, Hd44780};
use dotlcd::lcd::LcdDevice;
use dotlcd::sim::SimulatedHd44780;
use dotlcd::StdDelay;
use log::{debug, info, warn};
use std::fmt::Write;
use sysinfo::System;
use time::OffsetDateTime;

const HEART: Bitmap = [
    0b00000, 0b01010, 0b11111, 0b11111, 0b11111, 0b01110, 0b00100, 0b00000,
];

fn main() -> eyre::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    const UNKNOWN_STR: &str = "???";

    let config = Config::try_load().unwrap_or_else(|| {
        warn!("No config file loaded, using defaults");
        Config::default()
    });
    debug!("{:?}", config);

    let mut sim = if config.eight_bit_bus {
        SimulatedHd44780::new_8bit()
    } else {
        SimulatedHd44780::new_4bit()
    };

    let geometry = config.lcd.geometry()?;
    let mut lcd = Hd44780::from_config(&mut sim, &config.lcd, StdDelay)?;

    lcd.begin();
    lcd.set_custom_char(0, &HEART)?;

    let host = System::host_name();
    lcd.print(host.as_deref().unwrap_or(UNKNOWN_STR));
    lcd.write_custom_char(0)?;

    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    write!(lcd, "\n{:02}:{:02}\t{}", now.hour(), now.minute(), System::cpu_arch())?;

    if geometry.height() > 2 {
        write!(lcd, "\n{}", System::kernel_version().as_deref().unwrap_or(UNKNOWN_STR))?;
    }

    info!("Cursor ended at {:?}", lcd.cursor());
    lcd.cursor_blink_on();

    let border = "-".repeat(geometry.width() as usize);
    info!("+{}+", border);
    for row in sim.render(geometry) {
        info!("|{}|", row);
    }
    info!("+{}+", border);
    info!(
        "Backlight {}, blink {}, {}-bit interface",
        if sim.backlight() { "on" } else { "off" },
        if sim.blink() { "on" } else { "off" },
        if sim.is_8bit_interface() { 8 } else { 4 },
    );

    Ok(())
}
