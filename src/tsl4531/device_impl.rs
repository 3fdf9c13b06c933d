use embedded_hal::i2c::{ErrorType, I2c, SevenBitAddress};
use log::{debug, info, warn};

use crate::tsl4531::{Config, Error, IntegrationTime, Tsl4531, DEFAULT_ADDRESS};
use crate::DEFAULT_CLOCK_SPEED;

struct Register;
impl Register {
    /// Command bit, must be set on every register address
    const COMMAND: u8 = 0x80;
    const CONTROL: u8 = 0x00;
    const CONFIG: u8 = 0x01;
    /// DATAHIGH (0x05) follows and is read in the same transaction
    const DATA_LOW: u8 = 0x04;
    const ID: u8 = 0x0A;
}

struct Control;
impl Control {
    const POWER_DOWN: u8 = 0x00;
    const CONTINUOUS: u8 = 0x03;
}

const PSAVESKIP: u8 = 0x08;

fn config_bits(config: &Config) -> u8 {
    let tcntrl = match config.integration_time {
        IntegrationTime::_400ms => 0x00,
        IntegrationTime::_200ms => 0x01,
        IntegrationTime::_100ms => 0x02,
    };
    if config.power_save_skip {
        tcntrl | PSAVESKIP
    } else {
        tcntrl
    }
}

impl<I2C> Tsl4531<I2C>
where
    I2C: I2c<SevenBitAddress>,
{
    pub fn new(i2c: I2C) -> Self {
        Self::new_with_address(i2c, DEFAULT_ADDRESS, DEFAULT_CLOCK_SPEED)
    }

    /// Use a non-default address. `clock_speed` is informational: the bus
    /// owner configures the actual clock.
    pub fn new_with_address(i2c: I2C, address: u8, clock_speed: u32) -> Self {
        Tsl4531 {
            i2c,
            address,
            clock_speed,
            config: Config::default(),
            ready: false,
        }
    }

    pub fn destroy(self) -> I2C {
        self.i2c
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn clock_speed(&self) -> u32 {
        self.clock_speed
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.ready
    }

    /// Power on in continuous mode with 100 ms integration.
    pub fn init(&mut self) -> Result<(), Error<I2C::Error>> {
        self.init_with_config(Config::default())
    }

    pub fn init_with_config(&mut self, config: Config) -> Result<(), Error<I2C::Error>> {
        self.ready = false;
        self.write_register(Register::CONTROL, Control::CONTINUOUS)?;
        self.write_register(Register::CONFIG, config_bits(&config))?;
        self.config = config;
        self.ready = true;
        info!(
            "TSL4531 at 0x{:02x} ready, {} ms integration",
            self.address,
            config.integration_time.as_ms()
        );
        Ok(())
    }

    /// Stop conversions. `lux()` fails until the next `init()`.
    pub fn power_down(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_register(Register::CONTROL, Control::POWER_DOWN)?;
        self.ready = false;
        Ok(())
    }

    /// Part number in the upper nibble, revision in the lower. Works before `init()`.
    pub fn device_id(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register(Register::ID).map_err(Error::ReadTimeout)
    }

    /// Raw 16-bit ADC count
    pub fn read_raw(&mut self) -> Result<u16, Error<I2C::Error>> {
        if !self.ready {
            return Err(Error::Uninitialized);
        }
        let raw = self.read_data().map_err(|e| {
            warn!("TSL4531 read failed: {:?}", e);
            Error::ReadTimeout(e)
        })?;
        debug!("TSL4531 raw {}", raw);
        Ok(raw)
    }

    /// Illuminance in lux
    pub fn lux(&mut self) -> Result<f32, Error<I2C::Error>> {
        let raw = self.read_raw()?;
        Ok(self.config.integration_time.lux(raw))
    }

    /// DATALOW and DATAHIGH in one transaction. Reading DATALOW latches
    /// DATAHIGH, so both bytes come from the same conversion.
    fn read_data(&mut self) -> Result<u16, <I2C as ErrorType>::Error> {
        let mut data = [0; 2];
        self.i2c
            .write_read(
                self.address,
                &[Register::COMMAND | Register::DATA_LOW],
                &mut data,
            )
            .and(Ok(u16::from_le_bytes(data)))
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        debug!("TSL4531 0x{:02x} <- 0x{:02x}", register, value);
        self.i2c
            .write(self.address, &[Register::COMMAND | register, value])
            .map_err(|e| {
                warn!("TSL4531 at 0x{:02x} did not ack: {:?}", self.address, e);
                Error::NotResponding(e)
            })
    }

    fn read_register(&mut self, register: u8) -> Result<u8, <I2C as ErrorType>::Error> {
        let mut data = [0; 1];
        self.i2c
            .write_read(self.address, &[Register::COMMAND | register], &mut data)
            .and(Ok(data[0]))
    }
}
