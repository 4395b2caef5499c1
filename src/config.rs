//! Configuration register fields and typed settings.
//!
//! The configuration register is a 16-bit word read and written as two bytes,
//! most significant first:
//!
//! ```text
//! byte 0:  -  -  -  -  -  HYST HYST SHDN
//! byte 1:  CRIT_LOCK WIN_LOCK INT_CLEAR ALERT_STAT ALERT_CNT ALERT_SEL ALERT_POL ALERT_MOD
//! ```
//!
//! Each [`ConfigField`] maps to a [`FieldSpec`] describing where its bits
//! live and how large a value it accepts. Updates are read-modify-write: the
//! bits of one field are replaced and every other bit is written back as read.
//!
//! # Hardware locks
//!
//! The sensor ignores some writes while `CRIT_LOCK` or `WIN_LOCK` is set (or,
//! for some bits, while shut down). These rules are not checked here; a write
//! the device refuses simply leaves the register unchanged.

/// Location and legal range of one configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldSpec {
    /// 0 for the most significant byte, 1 for the least.
    pub byte_index: usize,
    /// Bits of that byte occupied by the field.
    pub mask: u8,
    /// Position of the field's least significant bit within the byte.
    pub shift: u8,
    /// Largest value the field accepts.
    pub max: u8,
    /// `false` for status bits the host cannot set.
    pub writable: bool,
}

impl FieldSpec {
    const fn new(byte_index: usize, mask: u8, shift: u8) -> Self {
        Self {
            byte_index,
            mask,
            shift,
            max: mask >> shift,
            writable: true,
        }
    }

    const fn read_only(self) -> Self {
        Self {
            writable: false,
            ..self
        }
    }

    /// Value of this field within a raw register pair.
    pub fn extract(&self, raw: [u8; 2]) -> u8 {
        (raw[self.byte_index] & self.mask) >> self.shift
    }

    /// `raw` with this field replaced by `value`; all other bits unchanged.
    ///
    /// Bits of `value` beyond the field width are dropped. Callers validate
    /// against [`max`](Self::max) first.
    pub fn insert(&self, raw: [u8; 2], value: u8) -> [u8; 2] {
        let mut out = raw;
        out[self.byte_index] =
            (raw[self.byte_index] & !self.mask) | ((value << self.shift) & self.mask);
        out
    }
}

/// Independently addressable fields of the configuration register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigField {
    /// T_UPPER/T_LOWER hysteresis, 2 bits. See [`Hysteresis`].
    Hysteresis,
    /// Low-power shutdown. Cannot be set while either lock bit is set.
    Shutdown,
    /// Locks T_CRIT. Cleared only by power cycle.
    CriticalLock,
    /// Locks T_UPPER and T_LOWER. Cleared only by power cycle.
    WindowLock,
    /// Clears an interrupt-mode alert. Always reads 0.
    InterruptClear,
    /// Current state of the alert output. Read-only.
    AlertStatus,
    /// Alert output enable.
    AlertControl,
    /// See [`AlertSelect`].
    AlertSelect,
    /// See [`AlertPolarity`].
    AlertPolarity,
    /// See [`AlertMode`].
    AlertMode,
}

impl ConfigField {
    /// Every field, most significant first.
    pub const ALL: [ConfigField; 10] = [
        ConfigField::Hysteresis,
        ConfigField::Shutdown,
        ConfigField::CriticalLock,
        ConfigField::WindowLock,
        ConfigField::InterruptClear,
        ConfigField::AlertStatus,
        ConfigField::AlertControl,
        ConfigField::AlertSelect,
        ConfigField::AlertPolarity,
        ConfigField::AlertMode,
    ];

    pub fn spec(self) -> FieldSpec {
        match self {
            ConfigField::Hysteresis => FieldSpec::new(0, 0b0000_0110, 1),
            ConfigField::Shutdown => FieldSpec::new(0, 0b0000_0001, 0),
            ConfigField::CriticalLock => FieldSpec::new(1, 0b1000_0000, 7),
            ConfigField::WindowLock => FieldSpec::new(1, 0b0100_0000, 6),
            ConfigField::InterruptClear => FieldSpec::new(1, 0b0010_0000, 5),
            ConfigField::AlertStatus => FieldSpec::new(1, 0b0001_0000, 4).read_only(),
            ConfigField::AlertControl => FieldSpec::new(1, 0b0000_1000, 3),
            ConfigField::AlertSelect => FieldSpec::new(1, 0b0000_0100, 2),
            ConfigField::AlertPolarity => FieldSpec::new(1, 0b0000_0010, 1),
            ConfigField::AlertMode => FieldSpec::new(1, 0b0000_0001, 0),
        }
    }
}

// ---------------------------------------------------------------------------
// Typed field values
// ---------------------------------------------------------------------------

/// Hysteresis applied to T_UPPER and T_LOWER as temperature falls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hysteresis {
    /// 0 °C (power-on default)
    #[default]
    Deg0 = 0b00,
    /// +1.5 °C
    Deg1_5 = 0b01,
    /// +3.0 °C
    Deg3 = 0b10,
    /// +6.0 °C
    Deg6 = 0b11,
}

impl Hysteresis {
    fn from_field(value: u8) -> Self {
        match value & 0b11 {
            0b01 => Hysteresis::Deg1_5,
            0b10 => Hysteresis::Deg3,
            0b11 => Hysteresis::Deg6,
            _ => Hysteresis::Deg0,
        }
    }

    pub fn celsius(&self) -> f32 {
        match self {
            Hysteresis::Deg0 => 0.0,
            Hysteresis::Deg1_5 => 1.5,
            Hysteresis::Deg3 => 3.0,
            Hysteresis::Deg6 => 6.0,
        }
    }
}

/// Which conditions drive the alert output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertSelect {
    /// T_UPPER, T_LOWER and T_CRIT all assert the output.
    #[default]
    AllLimits = 0,
    /// Only T_A > T_CRIT asserts the output.
    CriticalOnly = 1,
}

/// Electrical polarity of the alert output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertPolarity {
    /// Requires a pull-up.
    #[default]
    ActiveLow = 0,
    ActiveHigh = 1,
}

/// How the alert output follows the alert condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertMode {
    /// Output tracks the condition.
    #[default]
    Comparator = 0,
    /// Output latches until cleared with [`ConfigField::InterruptClear`].
    Interrupt = 1,
}

/// Snapshot of every field of the configuration register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    pub hysteresis: Hysteresis,
    pub shutdown: bool,
    pub critical_lock: bool,
    pub window_lock: bool,
    pub interrupt_clear: bool,
    pub alert_status: bool,
    pub alert_output: bool,
    pub alert_select: AlertSelect,
    pub alert_polarity: AlertPolarity,
    pub alert_mode: AlertMode,
}

impl Configuration {
    /// Decode a raw configuration word. Reserved bits 15:11 are ignored.
    pub fn from_bits(bits: u16) -> Self {
        let raw = bits.to_be_bytes();
        let flag = |field: ConfigField| field.spec().extract(raw) != 0;

        Self {
            hysteresis: Hysteresis::from_field(ConfigField::Hysteresis.spec().extract(raw)),
            shutdown: flag(ConfigField::Shutdown),
            critical_lock: flag(ConfigField::CriticalLock),
            window_lock: flag(ConfigField::WindowLock),
            interrupt_clear: flag(ConfigField::InterruptClear),
            alert_status: flag(ConfigField::AlertStatus),
            alert_output: flag(ConfigField::AlertControl),
            alert_select: if flag(ConfigField::AlertSelect) {
                AlertSelect::CriticalOnly
            } else {
                AlertSelect::AllLimits
            },
            alert_polarity: if flag(ConfigField::AlertPolarity) {
                AlertPolarity::ActiveHigh
            } else {
                AlertPolarity::ActiveLow
            },
            alert_mode: if flag(ConfigField::AlertMode) {
                AlertMode::Interrupt
            } else {
                AlertMode::Comparator
            },
        }
    }

    /// Encode into a raw configuration word with reserved bits clear.
    pub fn to_bits(&self) -> u16 {
        let fields = [
            (ConfigField::Hysteresis, self.hysteresis as u8),
            (ConfigField::Shutdown, self.shutdown as u8),
            (ConfigField::CriticalLock, self.critical_lock as u8),
            (ConfigField::WindowLock, self.window_lock as u8),
            (ConfigField::InterruptClear, self.interrupt_clear as u8),
            (ConfigField::AlertStatus, self.alert_status as u8),
            (ConfigField::AlertControl, self.alert_output as u8),
            (ConfigField::AlertSelect, self.alert_select as u8),
            (ConfigField::AlertPolarity, self.alert_polarity as u8),
            (ConfigField::AlertMode, self.alert_mode as u8),
        ];

        let raw = fields
            .iter()
            .fold([0u8; 2], |raw, (field, value)| field.spec().insert(raw, *value));
        u16::from_be_bytes(raw)
    }
}

// ---------------------------------------------------------------------------
// Resolution register
// ---------------------------------------------------------------------------

/// Measurement resolution, stored in bits 1:0 of the resolution register.
///
/// Finer resolution lengthens the conversion time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 0.5 °C, 30 ms
    Half = 0b00,
    /// 0.25 °C, 65 ms
    Quarter = 0b01,
    /// 0.125 °C, 130 ms
    Eighth = 0b10,
    /// 0.0625 °C, 250 ms (power-on default)
    #[default]
    Sixteenth = 0b11,
}

impl Resolution {
    pub fn celsius_per_count(&self) -> f32 {
        match self {
            Resolution::Half => 0.5,
            Resolution::Quarter => 0.25,
            Resolution::Eighth => 0.125,
            Resolution::Sixteenth => 0.0625,
        }
    }

    /// Typical time for one conversion, in milliseconds.
    pub fn conversion_time_ms(&self) -> u32 {
        match self {
            Resolution::Half => 30,
            Resolution::Quarter => 65,
            Resolution::Eighth => 130,
            Resolution::Sixteenth => 250,
        }
    }
}

impl TryFrom<u8> for Resolution {
    type Error = ();

    fn try_from(value: u8) -> Result<Resolution, ()> {
        match value {
            0b00 => Ok(Resolution::Half),
            0b01 => Ok(Resolution::Quarter),
            0b10 => Ok(Resolution::Eighth),
            0b11 => Ok(Resolution::Sixteenth),
            _ => Err(()),
        }
    }
}
