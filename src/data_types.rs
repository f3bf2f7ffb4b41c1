use crate::registers::*;
use crate::units::{ElectricCharge, ElectricCurrent, ElectricPotential, ElectricalResistance};
use uom::si::{
    electric_charge::milliampere_hour, electric_current::milliampere, electric_potential::volt,
    electrical_resistance::milliohm,
};

/// EZ model selection written into ModelCfg.ModelID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ModelId {
    /// Most lithium cobalt-oxide variants.
    #[default]
    Default = 0,
    /// Lithium NCR or NCA cells (Panasonic).
    LithiumNcr = 2,
    /// Lithium iron-phosphate cells.
    LithiumIronPhosphate = 6,
}

/// Readiness poll budget: how often and how many times a status bit is read.
///
/// The device needs up to ~875 ms to absorb a new model, so the default allows
/// 100 reads spaced 10 ms apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollPolicy {
    pub interval_ms: u32,
    pub max_attempts: u16,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval_ms: 10,
            max_attempts: 100,
        }
    }
}

/// When `initialize` should program the EZ model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reconfigure {
    /// Only after the device reports a power-on reset.
    #[default]
    OnPowerOnReset,
    /// On every call, even if the device kept its previous configuration.
    Always,
}

/// Raw LED register values written at the end of initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedConfig {
    pub led_cfg1: u16,
    pub led_cfg2: u16,
}

/// Calibration and initialization parameters, fixed for the life of the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelGaugeConfig {
    /// Current sense resistor between CSP and CSN.
    pub rsense: ElectricalResistance,
    /// Nominal capacity of the cell.
    pub design_capacity: ElectricCharge,
    /// Charge current below which a charge cycle is considered complete.
    pub charge_termination_current: ElectricCurrent,
    /// Empty voltage target, during load (10 mV resolution).
    pub empty_voltage: ElectricPotential,
    /// Voltage at which the empty detection is released (40 mV resolution).
    pub recovery_voltage: ElectricPotential,
    pub model_id: ModelId,
    /// Cells with more than 100 kΩ NTC thermistors.
    pub r100: bool,
    /// Set for cells charged above 4.275 V.
    pub v_chg: bool,
    pub poll: PollPolicy,
    pub reconfigure: Reconfigure,
    pub leds: Option<LedConfig>,
}

impl Default for FuelGaugeConfig {
    fn default() -> Self {
        Self {
            rsense: ElectricalResistance::new::<milliohm>(10.0),
            design_capacity: ElectricCharge::new::<milliampere_hour>(3000.0),
            charge_termination_current: ElectricCurrent::new::<milliampere>(250.0),
            empty_voltage: ElectricPotential::new::<volt>(3.3),
            recovery_voltage: ElectricPotential::new::<volt>(3.88),
            model_id: ModelId::Default,
            r100: false,
            v_chg: false,
            poll: PollPolicy::default(),
            reconfigure: Reconfigure::OnPowerOnReset,
            leds: None,
        }
    }
}

/// Raw register words derived once from a [`FuelGaugeConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConfigWords {
    pub design_cap: u16,
    pub ichg_term: u16,
    pub vempty: u16,
    pub model_cfg: u16,
}

/// What `initialize` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitOutcome {
    /// The EZ model and calibration registers were programmed.
    Configured,
    /// No power-on reset was pending; the device kept its configuration.
    Skipped,
}

/// Decoded Status register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub power_on_reset: bool,
    pub min_current_alert: bool,
    /// Battery absent (Bst).
    pub battery_absent: bool,
    pub max_current_alert: bool,
    pub soc_changed: bool,
    pub min_voltage_alert: bool,
    pub min_temperature_alert: bool,
    pub min_soc_alert: bool,
    pub battery_inserted: bool,
    pub max_voltage_alert: bool,
    pub max_temperature_alert: bool,
    pub max_soc_alert: bool,
    pub battery_removed: bool,
}

impl Status {
    pub fn new(raw: u16) -> Self {
        Self {
            power_on_reset: raw & STATUS_POR != 0,
            min_current_alert: raw & STATUS_IMN != 0,
            battery_absent: raw & STATUS_BST != 0,
            max_current_alert: raw & STATUS_IMX != 0,
            soc_changed: raw & STATUS_DSOCI != 0,
            min_voltage_alert: raw & STATUS_VMN != 0,
            min_temperature_alert: raw & STATUS_TMN != 0,
            min_soc_alert: raw & STATUS_SMN != 0,
            battery_inserted: raw & STATUS_BI != 0,
            max_voltage_alert: raw & STATUS_VMX != 0,
            max_temperature_alert: raw & STATUS_TMX != 0,
            max_soc_alert: raw & STATUS_SMX != 0,
            battery_removed: raw & STATUS_BR != 0,
        }
    }
}

/// Decoded FStat register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FStat {
    /// No valid measurement yet since power-up.
    pub data_not_ready: bool,
    pub long_relaxation: bool,
    pub full_qualified: bool,
    pub empty_detected: bool,
    pub relaxed: bool,
}

impl FStat {
    pub fn new(raw: u16) -> Self {
        Self {
            data_not_ready: raw & FSTAT_DNR != 0,
            long_relaxation: raw & FSTAT_RELDT2 != 0,
            full_qualified: raw & FSTAT_FQ != 0,
            empty_detected: raw & FSTAT_EDET != 0,
            relaxed: raw & FSTAT_RELDT != 0,
        }
    }
}

/// ModelCfg register contents.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModelCfg {
    /// Set by the host to load a model; cleared by the device when done.
    pub refresh: bool,
    pub r100: bool,
    pub v_chg: bool,
    /// Raw ModelID field (bits 7:4).
    pub model_id: u8,
}

impl ModelCfg {
    pub fn new(raw: u16) -> Self {
        Self {
            refresh: raw & MODEL_CFG_REFRESH != 0,
            r100: raw & MODEL_CFG_R100 != 0,
            v_chg: raw & MODEL_CFG_VCHG != 0,
            model_id: ((raw & MODEL_CFG_MODEL_ID) >> MODEL_CFG_MODEL_ID_SHIFT) as u8,
        }
    }

    /// The refresh request for `config`'s model.
    pub fn refresh_request(config: &FuelGaugeConfig) -> Self {
        Self {
            refresh: true,
            r100: config.r100,
            v_chg: config.v_chg,
            model_id: config.model_id as u8,
        }
    }

    pub fn bits(&self) -> u16 {
        let mut raw = ((self.model_id as u16) << MODEL_CFG_MODEL_ID_SHIFT) & MODEL_CFG_MODEL_ID;
        if self.refresh {
            raw |= MODEL_CFG_REFRESH;
        }
        if self.r100 {
            raw |= MODEL_CFG_R100;
        }
        if self.v_chg {
            raw |= MODEL_CFG_VCHG;
        }
        raw
    }
}

/// One entry of a register dump.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterValue {
    pub register: Register,
    pub value: u16,
}

/// Every mapped register with its current raw value, in address order.
pub type RegisterDump = heapless::Vec<RegisterValue, REGISTER_COUNT>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_decode() {
        let status = Status::new(STATUS_POR | STATUS_BST | STATUS_BR);
        assert!(status.power_on_reset);
        assert!(status.battery_absent);
        assert!(status.battery_removed);
        assert!(!status.battery_inserted);
        assert!(!status.min_voltage_alert);

        let status = Status::new(0x0000);
        assert!(!status.power_on_reset);
        assert!(!status.battery_absent);
    }

    #[test]
    fn test_fstat_decode() {
        assert!(FStat::new(0x0001).data_not_ready);
        let fstat = FStat::new(FSTAT_FQ | FSTAT_RELDT);
        assert!(!fstat.data_not_ready);
        assert!(fstat.full_qualified);
        assert!(fstat.relaxed);
    }

    #[test]
    fn test_model_cfg_bits() {
        let config = FuelGaugeConfig::default();
        assert_eq!(ModelCfg::refresh_request(&config).bits(), 0x8000);

        let config = FuelGaugeConfig {
            r100: true,
            v_chg: true,
            model_id: ModelId::LithiumIronPhosphate,
            ..Default::default()
        };
        let request = ModelCfg::refresh_request(&config);
        assert_eq!(request.bits(), 0x8000 | 0x2000 | 0x0400 | 0x0060);
        assert_eq!(ModelCfg::new(request.bits()), request);
    }

    #[test]
    fn test_model_cfg_refresh_cleared() {
        let cfg = ModelCfg::new(0x0420);
        assert!(!cfg.refresh);
        assert!(cfg.v_chg);
        assert_eq!(cfg.model_id, ModelId::LithiumNcr as u8);
    }
}
