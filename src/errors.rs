#[cfg(feature = "defmt")]
use defmt::Format;

use crate::registers::Register;

/// Represents potential errors when interacting with the MAX17263 chip.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum Error<E> {
    /// An error occurred during I2C communication.
    I2c(E),
    /// A readiness poll ran out of attempts before its bit cleared.
    ///
    /// The device configuration is indeterminate afterwards (the hibernate
    /// configuration may not have been restored); reset and initialize again.
    Timeout {
        /// The register that was being polled.
        register: Register,
    },
    /// Configuration verification failed after writing to the chip.
    ConfigVerificationFailed {
        /// The register whose verification failed.
        register: Register,
        /// The expected value of the register.
        expected: u16,
        /// The actual value read back from the register.
        actual: u16,
    },
    /// A calibration parameter cannot be represented by the device.
    InvalidConfig(&'static str),
}
