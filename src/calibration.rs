//! Register scale factors and raw <-> physical conversions (UG6595 / UG6597).

use crate::registers::{VEMPTY_VE_MAX, VEMPTY_VE_SHIFT, VEMPTY_VR_MAX};
use crate::units::{
    ElectricCharge, ElectricCurrent, ElectricPotential, ElectricalResistance, Ratio,
    ThermodynamicTemperature, Time,
};
use uom::si::{
    electric_charge::ampere_hour, electric_current::ampere, electric_potential::volt,
    electrical_resistance::ohm, ratio::percent, thermodynamic_temperature::degree_celsius,
    time::hour,
};

/// VCell / AvgVCell LSB in volts.
pub const VOLTAGE_SCALE_V: f32 = 7.8125e-5;
/// TTE LSB (5.625 s) in hours.
pub const TIME_SCALE_HOURS: f32 = 5.625 / 3600.0;
/// RepSOC LSB in percent.
pub const SOC_SCALE_PERCENT: f32 = 1.0 / 256.0;
/// Temp LSB in degrees Celsius.
pub const TEMPERATURE_SCALE_C: f32 = 1.0 / 256.0;

/// Capacity LSB is 5.0 μVh across the sense resistor.
const CAPACITY_LSB_VOLT_HOURS: f32 = 5.0e-6;
/// Current LSB is 1.5625 μV across the sense resistor.
const CURRENT_LSB_VOLTS: f32 = 1.5625e-6;

const VEMPTY_VE_LSB_V: f32 = 0.01;
const VEMPTY_VR_LSB_V: f32 = 0.04;

/// Scale factors that depend on the sense resistor.
///
/// Only constructible from a positive, finite resistance, so a conversion can
/// never run against an unset or zero resistor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales {
    capacity_ah_per_lsb: f32,
    current_a_per_lsb: f32,
}

impl Scales {
    /// Computes the capacity and current multipliers for `r_sense`.
    ///
    /// Returns `None` for a zero, negative or non-finite resistance.
    pub fn new(r_sense: ElectricalResistance) -> Option<Self> {
        let ohms = r_sense.get::<ohm>();
        if !ohms.is_finite() || ohms <= 0.0 {
            return None;
        }

        Some(Self {
            capacity_ah_per_lsb: CAPACITY_LSB_VOLT_HOURS / ohms,
            current_a_per_lsb: CURRENT_LSB_VOLTS / ohms,
        })
    }

    /// Charge represented by one capacity LSB.
    pub fn capacity_scale(&self) -> ElectricCharge {
        ElectricCharge::new::<ampere_hour>(self.capacity_ah_per_lsb)
    }

    /// Current represented by one current LSB.
    pub fn current_scale(&self) -> ElectricCurrent {
        ElectricCurrent::new::<ampere>(self.current_a_per_lsb)
    }

    /// Converts a Current / AvgCurrent / IChgTerm register value (two's complement).
    pub fn current(&self, raw: u16) -> ElectricCurrent {
        ElectricCurrent::new::<ampere>(raw as i16 as f32 * self.current_a_per_lsb)
    }

    /// Converts a RepCap / DesignCap register value (two's complement).
    pub fn capacity(&self, raw: u16) -> ElectricCharge {
        ElectricCharge::new::<ampere_hour>(raw as i16 as f32 * self.capacity_ah_per_lsb)
    }

    /// Converts a charge into DesignCap LSBs, or `None` if it does not fit.
    pub fn raw_capacity(&self, capacity: ElectricCharge) -> Option<u16> {
        let lsb = round(capacity.get::<ampere_hour>() / self.capacity_ah_per_lsb)?;
        if (0..=i16::MAX as i32).contains(&lsb) {
            Some(lsb as u16)
        } else {
            None
        }
    }

    /// Converts a current into IChgTerm LSBs, or `None` if it does not fit.
    pub fn raw_current(&self, current: ElectricCurrent) -> Option<u16> {
        let lsb = round(current.get::<ampere>() / self.current_a_per_lsb)?;
        if (i16::MIN as i32..=i16::MAX as i32).contains(&lsb) {
            Some(lsb as i16 as u16)
        } else {
            None
        }
    }
}

/// Converts a VCell / AvgVCell register value.
pub fn voltage(raw: u16) -> ElectricPotential {
    ElectricPotential::new::<volt>(raw as f32 * VOLTAGE_SCALE_V)
}

/// Converts a TTE register value.
pub fn time(raw: u16) -> Time {
    Time::new::<hour>(raw as f32 * TIME_SCALE_HOURS)
}

/// Converts a RepSOC register value.
pub fn state_of_charge(raw: u16) -> Ratio {
    Ratio::new::<percent>(raw as f32 * SOC_SCALE_PERCENT)
}

/// Converts a Temp register value (two's complement).
pub fn temperature(raw: u16) -> ThermodynamicTemperature {
    ThermodynamicTemperature::new::<degree_celsius>(raw as i16 as f32 * TEMPERATURE_SCALE_C)
}

/// Packs the empty (VE, 10 mV/LSB) and recovery (VR, 40 mV/LSB) targets into a
/// VEmpty register value, or `None` if either is out of range.
pub fn raw_vempty(empty: ElectricPotential, recovery: ElectricPotential) -> Option<u16> {
    let ve = round(empty.get::<volt>() / VEMPTY_VE_LSB_V)?;
    let vr = round(recovery.get::<volt>() / VEMPTY_VR_LSB_V)?;
    if !(0..=VEMPTY_VE_MAX as i32).contains(&ve) || !(0..=VEMPTY_VR_MAX as i32).contains(&vr) {
        return None;
    }

    Some(((ve as u16) << VEMPTY_VE_SHIFT) | vr as u16)
}

// Round half away from zero; `f32::round` needs std.
fn round(value: f32) -> Option<i32> {
    if !value.is_finite() || value > i32::MAX as f32 || value < i32::MIN as f32 {
        return None;
    }
    let shifted = if value >= 0.0 { value + 0.5 } else { value - 0.5 };
    Some(shifted as i32)
}
