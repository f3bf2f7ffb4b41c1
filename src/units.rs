#![allow(non_upper_case_globals)]
#![allow(non_snake_case)]
#![allow(non_camel_case_types)]
#![allow(clippy::upper_case_acronyms)]

// f32-backed SI quantities used by every measurement and calibration value.
ISQ!(
    uom::si,
    f32,
    (
        millimeter,
        kilogram,
        second,
        milliampere,
        kelvin,
        mole,
        candela
    )
);

#[cfg(test)]
mod tests {
    use super::{ElectricCharge, ElectricCurrent, ElectricPotential, ElectricalResistance, Time};
    use approx::assert_relative_eq;
    use uom::si::{
        electric_charge::milliampere_hour,
        electric_current::milliampere,
        electric_potential::volt,
        electrical_resistance::{milliohm, ohm},
        time::{hour, second},
    };

    #[test]
    fn test_units() {
        let current = ElectricCurrent::new::<milliampere>(15.625);
        let potential = ElectricPotential::new::<volt>(3.7);
        let resistance_10_milliohm = ElectricalResistance::new::<milliohm>(10.0);
        let charge = ElectricCharge::new::<milliampere_hour>(3000.0);
        let time = Time::new::<second>(5.625 * 640.0);

        assert_relative_eq!(current.get::<milliampere>(), 15.625, epsilon = 1e-4);
        assert_relative_eq!(potential.get::<volt>(), 3.7, epsilon = 1e-5);
        assert_relative_eq!(resistance_10_milliohm.get::<ohm>(), 0.01, epsilon = 1e-7);
        assert_relative_eq!(charge.get::<milliampere_hour>(), 3000.0, epsilon = 0.01);
        assert_relative_eq!(time.get::<hour>(), 1.0, epsilon = 1e-6);
    }
}
