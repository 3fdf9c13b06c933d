use std::cell::RefCell;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use linux_embedded_hal::I2cdev;
use log::{info, warn};

use sl01::{tsl4531, veml6075, RunningMedianBuffer, Sl01, Tsl4531, Veml6075};

const MAX_WINDOW: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Sensor {
    Light,
    Uv,
    Both,
}

/// Print SL01 light and UV readings from a Linux I²C bus
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// I²C character device
    #[arg(long, default_value = "/dev/i2c-1")]
    bus: String,

    /// Which chip to read
    #[arg(long, value_enum, default_value_t = Sensor::Both)]
    sensor: Sensor,

    /// Milliseconds between readings
    #[arg(long, default_value_t = 2000)]
    interval_ms: u64,

    /// Report the median of this many readings (1 disables smoothing, max 32)
    #[arg(long, default_value_t = 1)]
    window: usize,

    /// Stop after this many readings
    #[arg(long)]
    count: Option<u64>,
}

struct Smoothed {
    lux: RunningMedianBuffer<MAX_WINDOW>,
    uva: RunningMedianBuffer<MAX_WINDOW>,
    uvb: RunningMedianBuffer<MAX_WINDOW>,
    uv_index: RunningMedianBuffer<MAX_WINDOW>,
}

impl Smoothed {
    fn new(window: usize) -> Self {
        Self {
            lux: RunningMedianBuffer::new(window),
            uva: RunningMedianBuffer::new(window),
            uvb: RunningMedianBuffer::new(window),
            uv_index: RunningMedianBuffer::new(window),
        }
    }
}

fn push(buffer: &mut RunningMedianBuffer<MAX_WINDOW>, value: f32) -> f32 {
    buffer.push(value);
    buffer.median().unwrap_or(value)
}

fn open_bus(path: &str) -> Result<I2cdev> {
    I2cdev::new(path).with_context(|| format!("opening {path}"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if args.window > MAX_WINDOW {
        warn!("window {} clamped to {}", args.window, MAX_WINDOW);
    }
    let mut smoothed = Smoothed::new(args.window);
    let interval = Duration::from_millis(args.interval_ms);
    info!("Reading {:?} from {}", args.sensor, args.bus);

    match args.sensor {
        Sensor::Light => {
            let mut tsl = Tsl4531::new(open_bus(&args.bus)?);
            tsl.init().context("configuring TSL4531")?;
            run(args.count, interval, || {
                let lux = tsl.lux()?;
                println!("Light level: {:.1} lux", push(&mut smoothed.lux, lux));
                Ok(())
            })
        }
        Sensor::Uv => {
            let mut veml = Veml6075::new(open_bus(&args.bus)?);
            if let Err(e) = veml.verify_device_id() {
                warn!("VEML6075 identity check failed: {e}");
            }
            veml.init().context("configuring VEML6075")?;
            run(args.count, interval, || {
                let m = veml.measure()?;
                print_uv(&mut smoothed, m.uva, m.uvb, m.uv_index);
                Ok(())
            })
        }
        Sensor::Both => {
            let bus = RefCell::new(open_bus(&args.bus)?);
            let mut board = Sl01::new(&bus);
            board.init().context("configuring SL01")?;
            info!(
                "TSL4531 at 0x{:02x}, VEML6075 at 0x{:02x}",
                tsl4531::DEFAULT_ADDRESS,
                veml6075::DEFAULT_ADDRESS
            );
            run(args.count, interval, || {
                let r = board.read()?;
                println!("Light level: {:.1} lux", push(&mut smoothed.lux, r.lux));
                print_uv(&mut smoothed, r.uva, r.uvb, r.uv_index);
                Ok(())
            })
        }
    }
}

fn print_uv(smoothed: &mut Smoothed, uva: f32, uvb: f32, uv_index: f32) {
    println!("UVA intensity: {:.2} uW/cm^2", push(&mut smoothed.uva, uva));
    println!("UVB intensity: {:.2} uW/cm^2", push(&mut smoothed.uvb, uvb));
    println!("UV index     : {:.2}", push(&mut smoothed.uv_index, uv_index));
}

/// Call `read` every `interval`. Read errors are logged and the loop goes
/// on; the drivers don't retry, so this is the retry policy.
fn run(count: Option<u64>, interval: Duration, mut read: impl FnMut() -> Result<()>) -> Result<()> {
    let mut done = 0;
    while count.map_or(true, |c| done < c) {
        if let Err(e) = read() {
            warn!("reading failed: {e:#}");
        }
        done += 1;
        thread::sleep(interval);
    }
    Ok(())
}
