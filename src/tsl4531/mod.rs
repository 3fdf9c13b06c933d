//! TSL4531 ambient light sensor.
//!
//! The chip reports illuminance directly; the only conversion is the
//! integration time multiplier.

mod device_impl;

pub use crate::error::Error;

/// The i2c address normally used by TSL4531
pub const DEFAULT_ADDRESS: u8 = 0x29;

/// TSL4531 device driver.
#[derive(Debug)]
pub struct Tsl4531<I2C> {
    /// The concrete I²C device implementation.
    i2c: I2C,
    address: u8,
    clock_speed: u32,
    config: Config,
    ready: bool,
}

/// Integration time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationTime {
    /// 100 ms (board default)
    _100ms,
    /// 200 ms
    _200ms,
    /// 400 ms
    _400ms,
}

impl IntegrationTime {
    /// Return the integration time in milliseconds
    pub fn as_ms(&self) -> u16 {
        match self {
            IntegrationTime::_100ms => 100,
            IntegrationTime::_200ms => 200,
            IntegrationTime::_400ms => 400,
        }
    }

    /// Lux per count
    pub fn multiplier(&self) -> u16 {
        match self {
            IntegrationTime::_100ms => 4,
            IntegrationTime::_200ms => 2,
            IntegrationTime::_400ms => 1,
        }
    }

    pub fn lux(&self, raw: u16) -> f32 {
        f32::from(raw) * f32::from(self.multiplier())
    }
}

/// Sensor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub integration_time: IntegrationTime,
    /// Skip the power save states between conversions
    pub power_save_skip: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            integration_time: IntegrationTime::_100ms,
            power_save_skip: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::mock_i2c::FakeI2c;

    const DATA_LOW: u8 = 0x84;

    fn bus_with(raw: u16) -> FakeI2c {
        let mut bus = FakeI2c::new();
        set_raw(&mut bus, raw);
        bus
    }

    fn set_raw(bus: &mut FakeI2c, raw: u16) {
        bus.set_register(DATA_LOW, &raw.to_le_bytes());
    }

    #[test]
    fn init_powers_on_at_100ms() {
        let mut tsl = Tsl4531::new(FakeI2c::new());
        tsl.init().unwrap();
        let bus = tsl.destroy();
        assert_eq!(
            bus.sent,
            vec![
                (DEFAULT_ADDRESS, vec![0x80, 0x03]),
                (DEFAULT_ADDRESS, vec![0x81, 0x02]),
            ]
        );
    }

    #[test]
    fn init_with_config_sets_integration_and_psave() {
        let mut tsl = Tsl4531::new_with_address(FakeI2c::new(), 0x39, 400_000);
        tsl.init_with_config(Config {
            integration_time: IntegrationTime::_400ms,
            power_save_skip: true,
        })
        .unwrap();
        assert_eq!(tsl.address(), 0x39);
        assert_eq!(tsl.clock_speed(), 400_000);
        assert_eq!(tsl.destroy().sent[1], (0x39, vec![0x81, 0x08]));
    }

    #[test]
    fn lux_combines_bytes_and_applies_multiplier() {
        let mut tsl = Tsl4531::new(bus_with(0x0102));
        tsl.init().unwrap();
        assert_eq!(tsl.read_raw(), Ok(0x0102));
        assert_relative_eq!(tsl.lux().unwrap(), 258.0 * 4.0);
    }

    #[test]
    fn lux_reads_both_data_bytes_in_one_transaction() {
        let mut tsl = Tsl4531::new(bus_with(0x01FF));
        tsl.init().unwrap();
        tsl.i2c.sent.clear();
        tsl.i2c.reads = 0;

        assert_relative_eq!(tsl.lux().unwrap(), 511.0 * 4.0);
        assert_eq!(tsl.i2c.sent, vec![(DEFAULT_ADDRESS, vec![DATA_LOW])]);
        assert_eq!(tsl.i2c.reads, 1);
    }

    #[test]
    fn multiplier_follows_integration_time() {
        for (it, factor) in [
            (IntegrationTime::_100ms, 4.0),
            (IntegrationTime::_200ms, 2.0),
            (IntegrationTime::_400ms, 1.0),
        ] {
            let mut tsl = Tsl4531::new(bus_with(1000));
            tsl.init_with_config(Config {
                integration_time: it,
                power_save_skip: false,
            })
            .unwrap();
            assert_relative_eq!(tsl.lux().unwrap(), 1000.0 * factor);
        }
    }

    #[test]
    fn doubling_raw_doubles_lux() {
        let mut tsl = Tsl4531::new(bus_with(1234));
        tsl.init().unwrap();
        let single = tsl.lux().unwrap();
        set_raw(&mut tsl.i2c, 2468);
        assert_relative_eq!(tsl.lux().unwrap(), single * 2.0);
    }

    #[test]
    fn full_scale_does_not_overflow() {
        assert_relative_eq!(IntegrationTime::_100ms.lux(u16::MAX), 65535.0 * 4.0);
    }

    #[test]
    fn lux_before_init_touches_nothing() {
        let mut tsl = Tsl4531::new(bus_with(10));
        assert_eq!(tsl.lux(), Err(Error::Uninitialized));
        assert_eq!(tsl.read_raw(), Err(Error::Uninitialized));
        assert_eq!(tsl.destroy().transactions(), 0);
    }

    #[test]
    fn failed_init_stays_uninitialized_and_can_retry() {
        let mut bus = bus_with(10);
        bus.fail_writes = true;
        let mut tsl = Tsl4531::new(bus);

        assert!(matches!(tsl.init(), Err(Error::NotResponding(_))));
        assert!(!tsl.is_initialized());
        assert_eq!(tsl.lux(), Err(Error::Uninitialized));

        tsl.i2c.fail_writes = false;
        tsl.init().unwrap();
        assert_relative_eq!(tsl.lux().unwrap(), 40.0);
    }

    #[test]
    fn config_write_failure_after_power_on_is_not_ready() {
        let mut bus = bus_with(10);
        bus.fail_writes_after = Some(1);
        let mut tsl = Tsl4531::new(bus);

        assert!(matches!(tsl.init(), Err(Error::NotResponding(_))));
        // CONTROL went through, CONFIG did not
        assert_eq!(tsl.i2c.sent, vec![(DEFAULT_ADDRESS, vec![0x80, 0x03])]);
        assert!(!tsl.is_initialized());
        assert_eq!(tsl.lux(), Err(Error::Uninitialized));

        tsl.i2c.fail_writes_after = None;
        tsl.init().unwrap();
        assert_relative_eq!(tsl.lux().unwrap(), 40.0);
    }

    #[test]
    fn failed_reinit_from_ready_drops_to_uninitialized() {
        let mut tsl = Tsl4531::new(bus_with(10));
        tsl.init().unwrap();
        tsl.i2c.fail_writes = true;

        assert!(matches!(tsl.init(), Err(Error::NotResponding(_))));
        assert!(!tsl.is_initialized());
        assert_eq!(tsl.lux(), Err(Error::Uninitialized));
    }

    #[test]
    fn bus_failure_on_read_is_read_timeout() {
        let mut tsl = Tsl4531::new(bus_with(10));
        tsl.init().unwrap();
        tsl.i2c.fail_reads = true;
        assert!(matches!(tsl.lux(), Err(Error::ReadTimeout(_))));
        assert!(tsl.is_initialized());
    }

    #[test]
    fn power_down_returns_to_uninitialized() {
        let mut tsl = Tsl4531::new(bus_with(10));
        tsl.init().unwrap();
        tsl.power_down().unwrap();
        assert!(!tsl.is_initialized());
        assert_eq!(tsl.i2c.register(0x80), Some(&[0x00][..]));
        assert_eq!(tsl.lux(), Err(Error::Uninitialized));
    }

    #[test]
    fn device_id_reads_id_register() {
        let mut bus = FakeI2c::new();
        bus.set_register(0x8A, &[0xA0]);
        let mut tsl = Tsl4531::new(bus);
        assert_eq!(tsl.device_id(), Ok(0xA0));
    }
}
