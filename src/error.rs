use core::fmt;

/// All possible errors in this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// A configuration write was not acknowledged by the device.
    NotResponding(E),
    /// A register read failed or timed out on the bus.
    ReadTimeout(E),
    /// A measurement was requested before `init()` succeeded.
    Uninitialized,
    /// The identification register returned an unexpected value.
    InvalidDeviceId(u8),
}

impl<E> Error<E> {
    /// The underlying bus error, if the failure came from the bus.
    pub fn bus_error(&self) -> Option<&E> {
        match self {
            Error::NotResponding(e) | Error::ReadTimeout(e) => Some(e),
            Error::Uninitialized | Error::InvalidDeviceId(_) => None,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotResponding(e) => write!(f, "device not responding: {e:?}"),
            Error::ReadTimeout(e) => write!(f, "register read failed: {e:?}"),
            Error::Uninitialized => f.write_str("device read before init()"),
            Error::InvalidDeviceId(id) => write!(f, "unexpected device id 0x{id:02x}"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
