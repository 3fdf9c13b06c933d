//! Both SL01 chips on one shared bus.

use core::cell::RefCell;
use core::fmt;

use embedded_hal::i2c::I2c;
use embedded_hal_bus::i2c::RefCellDevice;
use log::info;

use crate::error::Error;
use crate::tsl4531::Tsl4531;
use crate::veml6075::Veml6075;

/// Which chip failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError<E> {
    Light(Error<E>),
    Uv(Error<E>),
}

impl<E: fmt::Debug> fmt::Display for BoardError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::Light(e) => write!(f, "TSL4531: {e}"),
            BoardError::Uv(e) => write!(f, "VEML6075: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for BoardError<E> {}

/// One reading of every channel on the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sl01Reading {
    pub lux: f32,
    /// µW/cm²
    pub uva: f32,
    /// µW/cm²
    pub uvb: f32,
    pub uv_index: f32,
}

pub struct Sl01<'a, I2C> {
    light: Tsl4531<RefCellDevice<'a, I2C>>,
    uv: Veml6075<RefCellDevice<'a, I2C>>,
}

impl<'a, I2C> Sl01<'a, I2C>
where
    I2C: I2c,
{
    /// Both chips at their default addresses
    pub fn new(bus: &'a RefCell<I2C>) -> Self {
        Self {
            light: Tsl4531::new(RefCellDevice::new(bus)),
            uv: Veml6075::new(RefCellDevice::new(bus)),
        }
    }

    pub fn init(&mut self) -> Result<(), BoardError<I2C::Error>> {
        self.uv.init().map_err(BoardError::Uv)?;
        self.light.init().map_err(BoardError::Light)?;
        info!("SL01 ready");
        Ok(())
    }

    pub fn read(&mut self) -> Result<Sl01Reading, BoardError<I2C::Error>> {
        let uv = self.uv.measure().map_err(BoardError::Uv)?;
        let lux = self.light.lux().map_err(BoardError::Light)?;
        Ok(Sl01Reading {
            lux,
            uva: uv.uva,
            uvb: uv.uvb,
            uv_index: uv.uv_index,
        })
    }

    pub fn light(&mut self) -> &mut Tsl4531<RefCellDevice<'a, I2C>> {
        &mut self.light
    }

    pub fn uv(&mut self) -> &mut Veml6075<RefCellDevice<'a, I2C>> {
        &mut self.uv
    }
}
