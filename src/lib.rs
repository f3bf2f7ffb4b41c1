#![no_std]

#[macro_use]
extern crate uom;

#[cfg(feature = "defmt")]
extern crate defmt;

use embedded_hal::i2c::ErrorType;

#[cfg(not(feature = "async"))]
use embedded_hal::{delay::DelayNs, i2c::I2c};
#[cfg(feature = "async")]
use embedded_hal_async::{delay::DelayNs, i2c::I2c};

pub mod calibration;
pub mod registers;
use registers::*;

mod data_types;
mod errors;
mod ez_config;
pub mod units;

pub use calibration::Scales;
pub use data_types::{
    FStat, FuelGaugeConfig, InitOutcome, LedConfig, ModelCfg, ModelId, PollPolicy, Reconfigure,
    RegisterDump, RegisterValue, Status,
};
pub use errors::Error;

use crate::data_types::ConfigWords;
use crate::units::{
    ElectricCharge, ElectricCurrent, ElectricPotential, Ratio, ThermodynamicTemperature, Time,
};

/// MAX17263 driver
pub struct Max17263<I2C> {
    i2c: I2C,
    config: FuelGaugeConfig,
    scales: Scales,
    words: ConfigWords,
}

impl<I2C> Max17263<I2C>
where
    I2C: ErrorType,
{
    /// Creates a new driver for the device at [`DEVICE_ADDRESS`].
    ///
    /// The sense-resistor multipliers and the raw calibration words are derived
    /// here, so a configuration the device cannot represent is rejected before
    /// any bus traffic.
    ///
    /// # Arguments
    ///
    /// * `i2c` - The I2C peripheral.
    /// * `config` - Calibration and initialization parameters.
    pub fn new(i2c: I2C, config: FuelGaugeConfig) -> Result<Self, Error<I2C::Error>> {
        let scales = Scales::new(config.rsense).ok_or(Error::InvalidConfig(
            "sense resistor must be positive and finite",
        ))?;

        if config.poll.max_attempts == 0 {
            return Err(Error::InvalidConfig(
                "poll policy needs at least one attempt",
            ));
        }

        let words = ConfigWords {
            design_cap: scales
                .raw_capacity(config.design_capacity)
                .ok_or(Error::InvalidConfig("design capacity out of range"))?,
            ichg_term: scales
                .raw_current(config.charge_termination_current)
                .ok_or(Error::InvalidConfig(
                    "charge termination current out of range",
                ))?,
            vempty: calibration::raw_vempty(config.empty_voltage, config.recovery_voltage)
                .ok_or(Error::InvalidConfig("empty or recovery voltage out of range"))?,
            model_cfg: ModelCfg::refresh_request(&config).bits(),
        };

        Ok(Self {
            i2c,
            config,
            scales,
            words,
        })
    }

    pub fn config(&self) -> &FuelGaugeConfig {
        &self.config
    }

    /// Sense-resistor dependent scale factors.
    pub fn scales(&self) -> &Scales {
        &self.scales
    }

    /// Destroys the driver and returns the I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "RegisterAccess",),
    async(feature = "async", keep_self)
)]
#[allow(async_fn_in_trait)]
/// Trait for abstracting 16-bit register access.
pub trait RegisterAccess<E>
where
    Self: Sized,
{
    /// Reads a 16-bit register.
    async fn read_register(&mut self, reg: Register) -> Result<u16, Error<E>>;

    /// Writes a 16-bit register.
    async fn write_register(&mut self, reg: Register, value: u16) -> Result<(), Error<E>>;
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Max17263",),
    async(feature = "async", keep_self)
)]
impl<I2C, E> RegisterAccess<E> for Max17263<I2C>
where
    I2C: I2c<Error = E>,
{
    async fn read_register(&mut self, reg: Register) -> Result<u16, Error<E>> {
        // Registers are transferred LSB first.
        let mut data = [0u8; 2];
        self.i2c
            .write_read(DEVICE_ADDRESS, &[reg.address()], &mut data)
            .await
            .map_err(Error::I2c)?;
        Ok(u16::from_le_bytes(data))
    }

    async fn write_register(&mut self, reg: Register, value: u16) -> Result<(), Error<E>> {
        let [lo, hi] = value.to_le_bytes();
        self.i2c
            .write(DEVICE_ADDRESS, &[reg.address(), lo, hi])
            .await
            .map_err(Error::I2c)
    }
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Max17263",),
    async(feature = "async", keep_self)
)]
impl<I2C, E> Max17263<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Polls `reg` until every bit in `mask` reads back as zero.
    ///
    /// Returns the number of reads it took. Fails with [`Error::Timeout`] once the
    /// configured poll budget is spent.
    async fn wait_for_clear<D: DelayNs>(
        &mut self,
        reg: Register,
        mask: u16,
        delay: &mut D,
    ) -> Result<u16, Error<E>> {
        let policy = self.config.poll;

        for attempt in 1..=policy.max_attempts {
            if self.read_register(reg).await? & mask == 0 {
                return Ok(attempt);
            }
            if attempt < policy.max_attempts {
                delay.delay_ms(policy.interval_ms).await;
            }
        }

        #[cfg(feature = "defmt")]
        defmt::error!(
            "{} did not clear mask {:#x} after {} reads",
            reg,
            mask,
            policy.max_attempts
        );
        Err(Error::Timeout { register: reg })
    }

    /// Blocks until FStat.DNR clears, i.e. the first measurement after power-up is done.
    pub async fn wait_data_ready<D: DelayNs>(&mut self, delay: &mut D) -> Result<u16, Error<E>> {
        self.wait_for_clear(Register::FStat, FSTAT_DNR, delay).await
    }

    /// Blocks until ModelCfg.Refresh clears, i.e. the device has loaded the new model.
    pub async fn wait_model_refresh<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<u16, Error<E>> {
        self.wait_for_clear(Register::ModelCfg, MODEL_CFG_REFRESH, delay)
            .await
    }

    /// Reads the decoded Status register.
    pub async fn read_status(&mut self) -> Result<Status, Error<E>> {
        let raw = self.read_register(Register::Status).await?;
        Ok(Status::new(raw))
    }

    /// Returns true if the device has been reset since the POR flag was last cleared.
    pub async fn power_on_reset_event(&mut self) -> Result<bool, Error<E>> {
        let raw = self.read_register(Register::Status).await?;
        Ok(raw & STATUS_POR != 0)
    }

    /// Returns true unless the Status.Bst (battery absent) bit is set.
    pub async fn battery_present(&mut self) -> Result<bool, Error<E>> {
        let raw = self.read_register(Register::Status).await?;
        Ok(raw & STATUS_BST == 0)
    }

    pub async fn read_fstat(&mut self) -> Result<FStat, Error<E>> {
        let raw = self.read_register(Register::FStat).await?;
        Ok(FStat::new(raw))
    }

    pub async fn read_model_config(&mut self) -> Result<ModelCfg, Error<E>> {
        let raw = self.read_register(Register::ModelCfg).await?;
        Ok(ModelCfg::new(raw))
    }

    /// Reads the cell voltage (VCell).
    pub async fn read_vcell(&mut self) -> Result<ElectricPotential, Error<E>> {
        let raw = self.read_register(Register::VCell).await?;
        Ok(calibration::voltage(raw))
    }

    /// Reads the average cell voltage (AvgVCell).
    pub async fn read_avg_vcell(&mut self) -> Result<ElectricPotential, Error<E>> {
        let raw = self.read_register(Register::AvgVCell).await?;
        Ok(calibration::voltage(raw))
    }

    /// Reads the battery current. Positive while charging.
    pub async fn read_current(&mut self) -> Result<ElectricCurrent, Error<E>> {
        let raw = self.read_register(Register::Current).await?;
        Ok(self.scales.current(raw))
    }

    /// Reads the average battery current.
    pub async fn read_avg_current(&mut self) -> Result<ElectricCurrent, Error<E>> {
        let raw = self.read_register(Register::AvgCurrent).await?;
        Ok(self.scales.current(raw))
    }

    /// Reads the reported remaining capacity (RepCap).
    pub async fn read_reported_capacity(&mut self) -> Result<ElectricCharge, Error<E>> {
        let raw = self.read_register(Register::RepCap).await?;
        Ok(self.scales.capacity(raw))
    }

    /// Reads back the programmed design capacity.
    pub async fn read_design_capacity(&mut self) -> Result<ElectricCharge, Error<E>> {
        let raw = self.read_register(Register::DesignCap).await?;
        Ok(self.scales.capacity(raw))
    }

    /// Reads the reported state of charge (RepSOC).
    pub async fn read_state_of_charge(&mut self) -> Result<Ratio, Error<E>> {
        let raw = self.read_register(Register::RepSoc).await?;
        Ok(calibration::state_of_charge(raw))
    }

    /// Reads the estimated time to empty (TTE).
    pub async fn read_time_to_empty(&mut self) -> Result<Time, Error<E>> {
        let raw = self.read_register(Register::TimeToEmpty).await?;
        Ok(calibration::time(raw))
    }

    /// Reads the temperature (Temp).
    pub async fn read_temperature(&mut self) -> Result<ThermodynamicTemperature, Error<E>> {
        let raw = self.read_register(Register::Temp).await?;
        Ok(calibration::temperature(raw))
    }

    /// Reads the given registers, in order.
    ///
    /// At most [`REGISTER_COUNT`] registers fit in the returned list.
    pub async fn read_registers(&mut self, regs: &[Register]) -> Result<RegisterDump, Error<E>> {
        if regs.len() > REGISTER_COUNT {
            return Err(Error::InvalidConfig("too many registers for one dump"));
        }

        let mut dump = RegisterDump::new();
        for &register in regs {
            let value = self.read_register(register).await?;
            dump.push(RegisterValue { register, value })
                .map_err(|_| Error::InvalidConfig("too many registers for one dump"))?;
        }
        Ok(dump)
    }

    /// Reads every mapped register. Used for production test logs.
    pub async fn dump_registers(&mut self) -> Result<RegisterDump, Error<E>> {
        self.read_registers(&Register::ALL).await
    }
}
