/// 7-bit I2C address of the MAX17263.
pub const DEVICE_ADDRESS: u8 = 0x36;

/// Number of registers in [`Register::ALL`].
pub const REGISTER_COUNT: usize = 20;

/// MAX17263 register map (UG6597).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Alert threshold flags, battery insertion/removal and POR
    Status = 0x00,
    /// Reported remaining capacity
    RepCap = 0x05,
    /// Reported state of charge
    RepSoc = 0x06,
    /// Temperature
    Temp = 0x08,
    /// Voltage between BATT and CSP
    VCell = 0x09,
    /// Voltage across the sense resistor (CSP - CSN)
    Current = 0x0A,
    /// Average of Current readings
    AvgCurrent = 0x0B,
    /// Estimated time to empty
    TimeToEmpty = 0x11,
    /// Design capacity of the cell
    DesignCap = 0x18,
    /// Average of VCell readings
    AvgVCell = 0x19,
    /// Charge termination current
    IChgTerm = 0x1E,
    /// Miscellaneous configuration
    MiscCfg = 0x2B,
    /// LED configuration 3
    LedCfg3 = 0x37,
    /// Empty and recovery voltage targets
    VEmpty = 0x3A,
    /// Status of the ModelGauge m5 algorithm
    FStat = 0x3D,
    /// LED configuration 1
    LedCfg1 = 0x40,
    /// LED configuration 2
    LedCfg2 = 0x4B,
    /// Custom LED pattern
    CustLed = 0x64,
    /// Hibernate mode configuration
    HibCfg = 0xBA,
    /// EZ model configuration
    ModelCfg = 0xDB,
}

impl Register {
    /// Every mapped register, in address order.
    pub const ALL: [Register; REGISTER_COUNT] = [
        Register::Status,
        Register::RepCap,
        Register::RepSoc,
        Register::Temp,
        Register::VCell,
        Register::Current,
        Register::AvgCurrent,
        Register::TimeToEmpty,
        Register::DesignCap,
        Register::AvgVCell,
        Register::IChgTerm,
        Register::MiscCfg,
        Register::LedCfg3,
        Register::VEmpty,
        Register::FStat,
        Register::LedCfg1,
        Register::LedCfg2,
        Register::CustLed,
        Register::HibCfg,
        Register::ModelCfg,
    ];

    pub const fn address(self) -> u8 {
        self as u8
    }

    /// Datasheet name of the register.
    pub const fn name(self) -> &'static str {
        match self {
            Register::Status => "Status",
            Register::RepCap => "RepCap",
            Register::RepSoc => "RepSOC",
            Register::Temp => "Temp",
            Register::VCell => "VCell",
            Register::Current => "Current",
            Register::AvgCurrent => "AvgCurrent",
            Register::TimeToEmpty => "TTE",
            Register::DesignCap => "DesignCap",
            Register::AvgVCell => "AvgVCell",
            Register::IChgTerm => "IChgTerm",
            Register::MiscCfg => "MiscCfg",
            Register::LedCfg3 => "LedCfg3",
            Register::VEmpty => "VEmpty",
            Register::FStat => "FStat",
            Register::LedCfg1 => "LedCfg1",
            Register::LedCfg2 => "LedCfg2",
            Register::CustLed => "CustLED",
            Register::HibCfg => "HibCfg",
            Register::ModelCfg => "ModelCfg",
        }
    }
}

/// Looks a register up by address; an unmapped address is handed back as the error.
impl TryFrom<u8> for Register {
    type Error = u8;

    fn try_from(address: u8) -> Result<Self, Self::Error> {
        Register::ALL
            .iter()
            .copied()
            .find(|reg| reg.address() == address)
            .ok_or(address)
    }
}

// Status register bit masks
pub const STATUS_POR: u16 = 1 << 1;
pub const STATUS_IMN: u16 = 1 << 2;
pub const STATUS_BST: u16 = 1 << 3;
pub const STATUS_IMX: u16 = 1 << 6;
pub const STATUS_DSOCI: u16 = 1 << 7;
pub const STATUS_VMN: u16 = 1 << 8;
pub const STATUS_TMN: u16 = 1 << 9;
pub const STATUS_SMN: u16 = 1 << 10;
pub const STATUS_BI: u16 = 1 << 11;
pub const STATUS_VMX: u16 = 1 << 12;
pub const STATUS_TMX: u16 = 1 << 13;
pub const STATUS_SMX: u16 = 1 << 14;
pub const STATUS_BR: u16 = 1 << 15;

// FStat register bit masks
pub const FSTAT_DNR: u16 = 1 << 0;
pub const FSTAT_RELDT2: u16 = 1 << 6;
pub const FSTAT_FQ: u16 = 1 << 7;
pub const FSTAT_EDET: u16 = 1 << 8;
pub const FSTAT_RELDT: u16 = 1 << 9;

// ModelCfg register bit masks
pub const MODEL_CFG_REFRESH: u16 = 1 << 15;
pub const MODEL_CFG_R100: u16 = 1 << 13;
pub const MODEL_CFG_VCHG: u16 = 1 << 10;
pub const MODEL_CFG_MODEL_ID_SHIFT: u16 = 4;
pub const MODEL_CFG_MODEL_ID: u16 = 0b1111 << MODEL_CFG_MODEL_ID_SHIFT;

// HibCfg register bit masks
pub const HIB_CFG_EN_HIB: u16 = 1 << 15;
/// HibCfg value with hibernate disabled.
pub const HIB_CFG_DISABLED: u16 = 0x0000;

// VEmpty register layout: VE in bits 15:7 (10 mV/LSB), VR in bits 6:0 (40 mV/LSB)
pub const VEMPTY_VE_SHIFT: u16 = 7;
pub const VEMPTY_VE_MAX: u16 = 0x1FF;
pub const VEMPTY_VR_MAX: u16 = 0x7F;
