//! EZ-Config initialization (UG6597, "Initialize Registers to Recommended Configuration").

#[cfg(not(feature = "async"))]
use embedded_hal::{delay::DelayNs, i2c::I2c};
#[cfg(feature = "async")]
use embedded_hal_async::{delay::DelayNs, i2c::I2c};

use crate::registers::*;
use crate::{Error, InitOutcome, Max17263, Reconfigure, RegisterAccess};

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Max17263",),
    async(feature = "async", keep_self)
)]
impl<I2C, E> Max17263<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Loads the EZ model and calibration into the device.
    ///
    /// Runs once per power cycle: if the device reports no power-on reset it
    /// still holds its configuration and nothing is written, unless the config
    /// asks for [`Reconfigure::Always`]. Any failure aborts the sequence. After a
    /// [`Error::Timeout`] the hibernate configuration may not have been restored,
    /// so the device should be reset before trying again.
    pub async fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<InitOutcome, Error<E>> {
        if !self.power_on_reset_event().await?
            && self.config.reconfigure == Reconfigure::OnPowerOnReset
        {
            #[cfg(feature = "defmt")]
            defmt::debug!("No power-on reset, keeping device configuration");
            return Ok(InitOutcome::Skipped);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("Loading EZ model");

        self.wait_data_ready(delay).await?;
        self.write_calibration().await?;

        let hib_cfg = self.exit_hibernate().await?;

        self.write_register(Register::ModelCfg, self.words.model_cfg)
            .await?;
        self.wait_model_refresh(delay).await?;

        self.write_register(Register::HibCfg, hib_cfg).await?;

        self.clear_power_on_reset().await?;

        if let Some(leds) = self.config.leds {
            self.write_register(Register::LedCfg1, leds.led_cfg1)
                .await?;
            self.write_register(Register::LedCfg2, leds.led_cfg2)
                .await?;
        }

        Ok(InitOutcome::Configured)
    }

    async fn write_calibration(&mut self) -> Result<(), Error<E>> {
        self.write_register(Register::DesignCap, self.words.design_cap)
            .await?;
        self.write_register(Register::IChgTerm, self.words.ichg_term)
            .await?;
        self.write_register(Register::VEmpty, self.words.vempty)
            .await
    }

    /// The device ignores ModelCfg writes while hibernating. Returns the HibCfg
    /// value to restore afterwards.
    async fn exit_hibernate(&mut self) -> Result<u16, Error<E>> {
        let hib_cfg = self.read_register(Register::HibCfg).await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Saved HibCfg {:#x}", hib_cfg);

        self.write_register(Register::HibCfg, HIB_CFG_DISABLED)
            .await?;
        Ok(hib_cfg)
    }

    async fn clear_power_on_reset(&mut self) -> Result<(), Error<E>> {
        let expected = self.read_register(Register::Status).await? & !STATUS_POR;
        self.write_register(Register::Status, expected).await?;

        let actual = self.read_register(Register::Status).await?;
        if actual & STATUS_POR != 0 {
            #[cfg(feature = "defmt")]
            defmt::error!("POR flag still set after clearing: {:#x}", actual);
            return Err(Error::ConfigVerificationFailed {
                register: Register::Status,
                expected,
                actual,
            });
        }
        Ok(())
    }
}
