#![allow(unused_imports)]
#![allow(dead_code)]

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorType, I2c, Operation};
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use max17263_rs::{registers::*, FuelGaugeConfig, Max17263};
use std::cell::RefCell;
use std::rc::Rc;

/// A mock I2C device that can be programmed with expected transactions.
#[derive(Clone)]
pub struct MockI2c {
    mock: Rc<RefCell<I2cMock>>,
}

impl MockI2c {
    /// Creates a new `MockI2c` with the given expected transactions.
    pub fn new(transactions: &[I2cTransaction]) -> Self {
        Self {
            mock: Rc::new(RefCell::new(I2cMock::new(transactions))),
        }
    }

    /// Verifies that all expected transactions occurred.
    pub fn done(self) {
        self.mock.borrow_mut().done();
    }
}

impl ErrorType for MockI2c {
    type Error = embedded_hal::i2c::ErrorKind;
}

impl I2c for MockI2c {
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.mock
            .borrow_mut()
            .write(address, bytes)
            .map_err(|_| embedded_hal::i2c::ErrorKind::Other)
    }

    fn read(&mut self, address: u8, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.mock
            .borrow_mut()
            .read(address, bytes)
            .map_err(|_| embedded_hal::i2c::ErrorKind::Other)
    }

    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.mock
            .borrow_mut()
            .write_read(address, bytes, buffer)
            .map_err(|_| embedded_hal::i2c::ErrorKind::Other)
    }

    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.mock
            .borrow_mut()
            .transaction(address, operations)
            .map_err(|_| embedded_hal::i2c::ErrorKind::Other)
    }
}

/// Records every requested delay instead of sleeping.
#[derive(Default)]
pub struct RecordingDelay {
    pub delays_ms: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delays_ms.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
    }
}

/// Expected 16-bit register read, LSB first on the wire.
pub fn read(reg: Register, value: u16) -> I2cTransaction {
    I2cTransaction::write_read(
        DEVICE_ADDRESS,
        vec![reg as u8],
        value.to_le_bytes().to_vec(),
    )
}

/// Expected 16-bit register write, LSB first on the wire.
pub fn write(reg: Register, value: u16) -> I2cTransaction {
    let [lo, hi] = value.to_le_bytes();
    I2cTransaction::write(DEVICE_ADDRESS, vec![reg as u8, lo, hi])
}

/// Helper function to create a Max17263 instance for testing.
pub fn create_driver(
    transactions: &[I2cTransaction],
    config: FuelGaugeConfig,
) -> (Max17263<MockI2c>, MockI2c) {
    let i2c_mock_instance = MockI2c::new(transactions);
    let driver = match Max17263::new(i2c_mock_instance.clone(), config) {
        Ok(driver) => driver,
        Err(e) => panic!("invalid test config: {:?}", e),
    };
    (driver, i2c_mock_instance)
}

/// Helper function to create a driver with the default configuration.
pub fn create_default_driver(transactions: &[I2cTransaction]) -> (Max17263<MockI2c>, MockI2c) {
    create_driver(transactions, FuelGaugeConfig::default())
}
