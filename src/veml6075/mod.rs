//! VEML6075 UVA/UVB light sensor.
//!
//! Raw UVA and UVB counts are compensated against the visible (UVCOMP1) and
//! infrared (UVCOMP2) channels before being converted to irradiance or UV
//! index, following Vishay application note 84339.

mod device_impl;

pub use crate::error::Error;

/// The i2c address normally used by VEML6075
pub const DEFAULT_ADDRESS: u8 = 0x10;

/// Low byte of the DEVICE_ID register
pub const DEVICE_ID: u8 = 0x26;

/// VEML6075 device driver.
#[derive(Debug)]
pub struct Veml6075<I2C> {
    /// The concrete I²C device implementation.
    i2c: I2C,
    address: u8,
    clock_speed: u32,
    config: Config,
    /// configuration register written successfully
    ready: bool,
}

/// Integration time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationTime {
    /// 50 ms
    _50ms,
    /// 100 ms (default)
    _100ms,
    /// 200 ms
    _200ms,
    /// 400 ms
    _400ms,
    /// 800 ms
    _800ms,
}

impl IntegrationTime {
    /// Return the integration time in milliseconds
    pub fn as_ms(&self) -> u16 {
        match self {
            IntegrationTime::_50ms => 50,
            IntegrationTime::_100ms => 100,
            IntegrationTime::_200ms => 200,
            IntegrationTime::_400ms => 400,
            IntegrationTime::_800ms => 800,
        }
    }
}

/// Dynamic range setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicSetting {
    /// Normal dynamic (default)
    Normal,
    /// High dynamic: half the sensitivity, twice the range
    High,
}

/// Measurement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Measure continuously (default)
    Continuous,
    /// Measure once per call to [`Veml6075::trigger`]
    ActiveForce,
}

/// Linear compensation and responsivity coefficients.
///
/// Responsivities are counts per unit at 100 ms integration, normal dynamic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// UVA visible coefficient
    pub a: f32,
    /// UVA infrared coefficient
    pub b: f32,
    /// UVB visible coefficient
    pub c: f32,
    /// UVB infrared coefficient
    pub d: f32,
    /// counts per µW/cm² of UVA
    pub uva_responsivity: f32,
    /// counts per µW/cm² of UVB
    pub uvb_responsivity: f32,
    /// UVA counts per UV index step
    pub uva_index_responsivity: f32,
    /// UVB counts per UV index step
    pub uvb_index_responsivity: f32,
}

impl Calibration {
    /// Open air, no teflon diffuser in front of the sensor
    pub const OPEN_AIR: Self = Self {
        a: 2.22,
        b: 1.33,
        c: 2.95,
        d: 1.74,
        uva_responsivity: 0.93,
        uvb_responsivity: 2.1,
        uva_index_responsivity: 684.46,
        uvb_index_responsivity: 385.95,
    };

    /// `UVA - a·COMP1 - b·COMP2`
    pub fn uva_compensated(&self, raw: &UvData) -> f32 {
        raw.uva as f32 - self.a * raw.uvcomp1 as f32 - self.b * raw.uvcomp2 as f32
    }

    /// `UVB - c·COMP1 - d·COMP2`
    pub fn uvb_compensated(&self, raw: &UvData) -> f32 {
        raw.uvb as f32 - self.c * raw.uvcomp1 as f32 - self.d * raw.uvcomp2 as f32
    }

    /// Mean of the UVA and UVB index contributions
    pub fn uv_index(&self, uva_comp: f32, uvb_comp: f32) -> f32 {
        (uva_comp / self.uva_index_responsivity + uvb_comp / self.uvb_index_responsivity) / 2.0
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::OPEN_AIR
    }
}

/// Sensor configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub integration_time: IntegrationTime,
    pub dynamic: DynamicSetting,
    pub mode: Mode,
    pub calibration: Calibration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            integration_time: IntegrationTime::_100ms,
            dynamic: DynamicSetting::Normal,
            mode: Mode::Continuous,
            calibration: Calibration::OPEN_AIR,
        }
    }
}

impl Config {
    /// Factor bringing counts taken with this configuration back to the
    /// 100 ms, normal dynamic reference the responsivities are given for.
    pub fn count_scale(&self) -> f32 {
        let scale = 100.0 / self.integration_time.as_ms() as f32;
        match self.dynamic {
            DynamicSetting::Normal => scale,
            DynamicSetting::High => scale * 2.0,
        }
    }
}

/// Raw channel counts from one read of the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UvData {
    pub uva: u16,
    pub uvb: u16,
    /// visible compensation channel
    pub uvcomp1: u16,
    /// infrared compensation channel
    pub uvcomp2: u16,
}

/// Calibrated values computed from a single [`UvData`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvMeasurement {
    /// UVA irradiance, µW/cm²
    pub uva: f32,
    /// UVB irradiance, µW/cm²
    pub uvb: f32,
    pub uv_index: f32,
}

impl UvMeasurement {
    pub fn from_raw(raw: &UvData, config: &Config) -> Self {
        let cal = &config.calibration;
        let scale = config.count_scale();
        let uva_comp = cal.uva_compensated(raw) * scale;
        let uvb_comp = cal.uvb_compensated(raw) * scale;
        Self {
            uva: uva_comp / cal.uva_responsivity,
            uvb: uvb_comp / cal.uvb_responsivity,
            uv_index: cal.uv_index(uva_comp, uvb_comp),
        }
    }
}
