use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not},
    str::FromStr,
};

/// Error returned when a day or shift token is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseScheduleError {
    UnknownDay(String),
    UnknownShift(String),
}

impl Display for ParseScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::UnknownDay(token) => write!(f, "Unknown day code: {token}"),
            Self::UnknownShift(token) => write!(f, "Unknown shift: {token}"),
        }
    }
}

impl std::error::Error for ParseScheduleError {}

/// Implements the bitwise operators for a `u8`-backed flag set with `$mask` valid bits
macro_rules! flag_set_ops {
    ($ty:ident, $mask:expr) => {
        impl BitOr for $ty {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self::Output {
                $ty(self.0 | rhs.0)
            }
        }

        impl BitAnd for $ty {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self::Output {
                $ty(self.0 & rhs.0)
            }
        }

        impl Not for $ty {
            type Output = Self;

            fn not(self) -> Self::Output {
                $ty((!self.0) & $mask)
            }
        }

        impl BitOrAssign for $ty {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl BitAndAssign for $ty {
            fn bitand_assign(&mut self, rhs: Self) {
                self.0 &= rhs.0;
            }
        }
    };
}

/// The teaching days (Monday to Saturday) an offering runs on or an interest asks for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct DaySet(u8);

impl DaySet {
    pub const MONDAY: Self = DaySet(1 << 0);
    pub const TUESDAY: Self = DaySet(1 << 1);
    pub const WEDNESDAY: Self = DaySet(1 << 2);
    pub const THURSDAY: Self = DaySet(1 << 3);
    pub const FRIDAY: Self = DaySet(1 << 4);
    pub const SATURDAY: Self = DaySet(1 << 5);

    pub const WEEKDAYS: Self = DaySet(0b011111);
    pub const ALL: Self = DaySet(0b111111);
    pub const NONE: Self = DaySet(0);

    /// Day-to-code mapping, in the order used by the flag arrays
    const DAY_CODES: [(Self, &'static str); 6] = [
        (Self::MONDAY, "SEG"),
        (Self::TUESDAY, "TER"),
        (Self::WEDNESDAY, "QUA"),
        (Self::THURSDAY, "QUI"),
        (Self::FRIDAY, "SEX"),
        (Self::SATURDAY, "SAB"),
    ];

    pub fn new() -> Self {
        Self::NONE
    }

    /// Builds a set from six Monday-to-Saturday flags
    pub fn from_flags(flags: [bool; 6]) -> Self {
        let mut result = Self::NONE;
        for (&(day, _), flag) in Self::DAY_CODES.iter().zip(flags) {
            result.set(day, flag);
        }
        result
    }

    /// Returns the six Monday-to-Saturday flags
    pub fn flags(self) -> [bool; 6] {
        Self::DAY_CODES.map(|(day, _)| self.contains(day))
    }

    pub fn contains(self, day: Self) -> bool {
        (self & day) == day
    }

    pub fn set(&mut self, day: Self, value: bool) {
        if value {
            *self |= day;
        } else {
            *self &= !day;
        }
    }

    pub fn add(&mut self, day: Self) {
        *self |= day;
    }

    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }

    /// True when at least one of the six day flags has the same value on both sides.
    ///
    /// Two days that are both unset count as agreement, so an offering with no
    /// days agrees with any interest that leaves at least one day unset.
    pub fn agrees_with(self, other: Self) -> bool {
        (!(self.0 ^ other.0) & Self::ALL.0) != 0
    }
}

impl FromStr for DaySet {
    type Err = ParseScheduleError;

    /// Parses dash-separated day codes such as `"SEG - QUA - SEX"`
    fn from_str(days: &str) -> Result<Self, Self::Err> {
        let mut result = Self::NONE;

        for token in days.split('-').map(str::trim).filter(|t| !t.is_empty()) {
            let token = token.to_uppercase();
            let (day, _) = Self::DAY_CODES
                .iter()
                .find(|(_, code)| *code == token)
                .ok_or_else(|| ParseScheduleError::UnknownDay(token.clone()))?;
            result |= *day;
        }

        Ok(result)
    }
}

impl Display for DaySet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let codes: Vec<&str> = Self::DAY_CODES
            .iter()
            .filter(|(day, _)| self.contains(*day))
            .map(|(_, code)| *code)
            .collect();

        write!(f, "{}", codes.join("-"))
    }
}

flag_set_ops!(DaySet, 0x3F);

/// The shifts (morning, afternoon, evening) an offering runs in or an interest asks for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct ShiftSet(u8);

impl ShiftSet {
    pub const MORNING: Self = ShiftSet(1 << 0);
    pub const AFTERNOON: Self = ShiftSet(1 << 1);
    pub const EVENING: Self = ShiftSet(1 << 2);

    pub const ALL: Self = ShiftSet(0b111);
    pub const NONE: Self = ShiftSet(0);

    /// Shift names as they appear in offering schedules
    const SHIFT_NAMES: [(Self, &'static str); 4] = [
        (Self::MORNING, "DIURNO"),
        (Self::AFTERNOON, "VESPERTINO"),
        (Self::EVENING, "NOTURNO"),
        (Self::ALL, "INTEGRAL"),
    ];

    pub fn new() -> Self {
        Self::NONE
    }

    /// Builds a set from morning, afternoon and evening flags
    pub fn from_flags([morning, afternoon, evening]: [bool; 3]) -> Self {
        let mut result = Self::NONE;
        result.set(Self::MORNING, morning);
        result.set(Self::AFTERNOON, afternoon);
        result.set(Self::EVENING, evening);
        result
    }

    pub fn flags(self) -> [bool; 3] {
        [
            self.contains(Self::MORNING),
            self.contains(Self::AFTERNOON),
            self.contains(Self::EVENING),
        ]
    }

    pub fn contains(self, shift: Self) -> bool {
        (self & shift) == shift
    }

    pub fn set(&mut self, shift: Self, value: bool) {
        if value {
            *self |= shift;
        } else {
            *self &= !shift;
        }
    }

    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }

    /// True when at least one of the three shift flags has the same value on both sides
    pub fn agrees_with(self, other: Self) -> bool {
        (!(self.0 ^ other.0) & Self::ALL.0) != 0
    }
}

impl FromStr for ShiftSet {
    type Err = ParseScheduleError;

    /// Parses a shift description; every known shift name found in the text is set.
    /// An empty description yields an empty set.
    fn from_str(shift: &str) -> Result<Self, Self::Err> {
        let shift = shift.trim().to_uppercase();
        if shift.is_empty() {
            return Ok(Self::NONE);
        }

        let result = Self::SHIFT_NAMES
            .iter()
            .filter(|(_, name)| shift.contains(*name))
            .fold(Self::NONE, |acc, (set, _)| acc | *set);

        if result.is_empty() {
            Err(ParseScheduleError::UnknownShift(shift))
        } else {
            Ok(result)
        }
    }
}

impl Display for ShiftSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let names: Vec<&str> = Self::SHIFT_NAMES[..3]
            .iter()
            .filter(|(shift, _)| self.contains(*shift))
            .map(|(_, name)| *name)
            .collect();

        write!(f, "{}", names.join("|"))
    }
}

flag_set_ops!(ShiftSet, 0x07);

/// Day and shift flags of an offering or an interest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Schedule {
    pub days: DaySet,
    pub shifts: ShiftSet,
}

impl Schedule {
    pub fn new(days: DaySet, shifts: ShiftSet) -> Self {
        Self { days, shifts }
    }

    pub fn matches_days(&self, other: &Schedule) -> bool {
        self.days.agrees_with(other.days)
    }

    pub fn matches_shifts(&self, other: &Schedule) -> bool {
        self.shifts.agrees_with(other.shifts)
    }

    /// No day and no shift set
    pub fn is_unspecified(&self) -> bool {
        self.days.is_empty() && self.shifts.is_empty()
    }
}
