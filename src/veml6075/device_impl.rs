use embedded_hal::i2c::{ErrorType, I2c, SevenBitAddress};
use log::{debug, info, warn};

use crate::veml6075::{
    Config, DynamicSetting, Error, IntegrationTime, Mode, UvData, UvMeasurement, Veml6075,
    DEFAULT_ADDRESS, DEVICE_ID,
};
use crate::DEFAULT_CLOCK_SPEED;

struct Register;
impl Register {
    const CONF: u8 = 0x00;
    const UVA: u8 = 0x07;
    const UVB: u8 = 0x09;
    const UVCOMP1: u8 = 0x0A;
    const UVCOMP2: u8 = 0x0B;
    const DEVICE_ID: u8 = 0x0C;
}

struct Conf;
impl Conf {
    const SD: u16 = 0x01;
    const UV_AF: u16 = 0x02;
    const UV_TRIG: u16 = 0x04;
    const HD: u16 = 0x08;
}

/// Contents of the configuration register
#[derive(Debug, Clone, Copy)]
struct ConfBits {
    bits: u16,
}

impl ConfBits {
    fn with_high(self, mask: u16) -> Self {
        ConfBits {
            bits: self.bits | mask,
        }
    }
    fn with_low(self, mask: u16) -> Self {
        ConfBits {
            bits: self.bits & !mask,
        }
    }
}

impl From<&Config> for ConfBits {
    fn from(config: &Config) -> Self {
        let it = match config.integration_time {
            IntegrationTime::_50ms => 0x00,
            IntegrationTime::_100ms => 0x10,
            IntegrationTime::_200ms => 0x20,
            IntegrationTime::_400ms => 0x30,
            IntegrationTime::_800ms => 0x40,
        };
        let conf = ConfBits { bits: it };
        let conf = match config.dynamic {
            DynamicSetting::Normal => conf.with_low(Conf::HD),
            DynamicSetting::High => conf.with_high(Conf::HD),
        };
        match config.mode {
            Mode::Continuous => conf.with_low(Conf::UV_AF),
            Mode::ActiveForce => conf.with_high(Conf::UV_AF),
        }
    }
}

impl<I2C> Veml6075<I2C>
where
    I2C: I2c<SevenBitAddress>,
{
    pub fn new(i2c: I2C) -> Self {
        Self::new_with_address(i2c, DEFAULT_ADDRESS, DEFAULT_CLOCK_SPEED)
    }

    /// Use a non-default address. `clock_speed` is informational: the bus
    /// owner configures the actual clock.
    pub fn new_with_address(i2c: I2C, address: u8, clock_speed: u32) -> Self {
        Veml6075 {
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

    /// Configure for continuous UVA/UVB measurement at 100 ms.
    pub fn init(&mut self) -> Result<(), Error<I2C::Error>> {
        self.init_with_config(Config::default())
    }

    /// Write `config` and power the sensor on. Can be called again to
    /// reconfigure; the driver is uninitialized until the write succeeds.
    pub fn init_with_config(&mut self, config: Config) -> Result<(), Error<I2C::Error>> {
        self.ready = false;
        let conf = ConfBits::from(&config).with_low(Conf::SD);
        self.write_conf(conf)?;
        self.config = config;
        self.ready = true;
        info!(
            "VEML6075 at 0x{:02x} ready, {} ms integration",
            self.address,
            config.integration_time.as_ms()
        );
        Ok(())
    }

    /// Put the sensor into shutdown. Reads fail until the next `init()`.
    pub fn shutdown(&mut self) -> Result<(), Error<I2C::Error>> {
        let conf = ConfBits::from(&self.config).with_high(Conf::SD);
        self.write_conf(conf)?;
        self.ready = false;
        Ok(())
    }

    /// Start a single measurement. Only meaningful in [`Mode::ActiveForce`];
    /// the result is available after one integration time.
    pub fn trigger(&mut self) -> Result<(), Error<I2C::Error>> {
        self.ensure_ready()?;
        if self.config.mode != Mode::ActiveForce {
            debug!("VEML6075 trigger ignored in continuous mode");
            return Ok(());
        }
        let conf = ConfBits::from(&self.config).with_high(Conf::UV_TRIG);
        self.write_conf(conf)
    }

    /// Low byte of the identification register. Works before `init()`.
    pub fn device_id(&mut self) -> Result<u8, Error<I2C::Error>> {
        let id = self
            .read_register(Register::DEVICE_ID)
            .map_err(Error::ReadTimeout)?;
        Ok(id as u8)
    }

    pub fn verify_device_id(&mut self) -> Result<(), Error<I2C::Error>> {
        match self.device_id()? {
            DEVICE_ID => Ok(()),
            other => Err(Error::InvalidDeviceId(other)),
        }
    }

    /// Read all four UV channels.
    pub fn read_raw(&mut self) -> Result<UvData, Error<I2C::Error>> {
        self.ensure_ready()?;
        let data = self.read_uv_data().map_err(|e| {
            warn!("VEML6075 read failed: {:?}", e);
            Error::ReadTimeout(e)
        })?;
        debug!("VEML6075 raw {:?}", data);
        Ok(data)
    }

    /// UVA, UV index and UVB from a single read of the channels.
    pub fn measure(&mut self) -> Result<UvMeasurement, Error<I2C::Error>> {
        let raw = self.read_raw()?;
        Ok(UvMeasurement::from_raw(&raw, &self.config))
    }

    /// UVA irradiance in µW/cm²
    pub fn uva(&mut self) -> Result<f32, Error<I2C::Error>> {
        Ok(self.measure()?.uva)
    }

    /// UVB irradiance in µW/cm²
    pub fn uvb(&mut self) -> Result<f32, Error<I2C::Error>> {
        Ok(self.measure()?.uvb)
    }

    pub fn uv_index(&mut self) -> Result<f32, Error<I2C::Error>> {
        Ok(self.measure()?.uv_index)
    }

    fn ensure_ready(&self) -> Result<(), Error<I2C::Error>> {
        if self.ready {
            Ok(())
        } else {
            Err(Error::Uninitialized)
        }
    }

    fn read_uv_data(&mut self) -> Result<UvData, <I2C as ErrorType>::Error> {
        Ok(UvData {
            uva: self.read_register(Register::UVA)?,
            uvb: self.read_register(Register::UVB)?,
            uvcomp1: self.read_register(Register::UVCOMP1)?,
            uvcomp2: self.read_register(Register::UVCOMP2)?,
        })
    }

    fn write_conf(&mut self, conf: ConfBits) -> Result<(), Error<I2C::Error>> {
        debug!("VEML6075 CONF <- 0x{:04x}", conf.bits);
        self.write_register(Register::CONF, conf.bits).map_err(|e| {
            warn!("VEML6075 at 0x{:02x} did not ack: {:?}", self.address, e);
            Error::NotResponding(e)
        })
    }

    fn write_register(
        &mut self,
        register: u8,
        value: u16,
    ) -> Result<(), <I2C as ErrorType>::Error> {
        self.i2c
            .write(self.address, &[register, value as u8, (value >> 8) as u8])
    }

    fn read_register(&mut self, register: u8) -> Result<u16, <I2C as ErrorType>::Error> {
        let mut data = [0; 2];
        self.i2c
            .write_read(self.address, &[register], &mut data)
            .and(Ok(u16::from(data[0]) | u16::from(data[1]) << 8))
    }
}
