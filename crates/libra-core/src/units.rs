//! Physical quantities with explicit units.
//!
//! Activities and relative times never travel as bare numbers: every value
//! carries its unit tag so that downstream consumers cannot confuse Bq with
//! kBq or hours with days.

use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Sub};

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Units of radioactivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActivityUnit {
    /// One decay per second.
    #[default]
    #[serde(rename = "Bq")]
    Becquerel,
    /// 10^3 Bq.
    #[serde(rename = "kBq")]
    Kilobecquerel,
    /// 10^6 Bq.
    #[serde(rename = "MBq")]
    Megabecquerel,
    /// 3.7 x 10^4 Bq.
    #[serde(rename = "uCi")]
    Microcurie,
    /// 37 Bq.
    #[serde(rename = "nCi")]
    Nanocurie,
    /// 0.037 Bq.
    #[serde(rename = "pCi")]
    Picocurie,
}

impl ActivityUnit {
    /// Number of becquerel represented by one of this unit.
    pub fn becquerel_factor(self) -> f64 {
        match self {
            ActivityUnit::Becquerel => 1.0,
            ActivityUnit::Kilobecquerel => 1.0e3,
            ActivityUnit::Megabecquerel => 1.0e6,
            ActivityUnit::Microcurie => 3.7e4,
            ActivityUnit::Nanocurie => 37.0,
            ActivityUnit::Picocurie => 0.037,
        }
    }

    /// Conventional symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            ActivityUnit::Becquerel => "Bq",
            ActivityUnit::Kilobecquerel => "kBq",
            ActivityUnit::Megabecquerel => "MBq",
            ActivityUnit::Microcurie => "uCi",
            ActivityUnit::Nanocurie => "nCi",
            ActivityUnit::Picocurie => "pCi",
        }
    }
}

/// An activity magnitude tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    magnitude: f64,
    unit: ActivityUnit,
}

impl Activity {
    /// Creates an activity from a magnitude expressed in `unit`.
    pub const fn new(magnitude: f64, unit: ActivityUnit) -> Self {
        Self { magnitude, unit }
    }

    /// Shorthand for an activity in becquerel.
    pub const fn becquerel(magnitude: f64) -> Self {
        Self::new(magnitude, ActivityUnit::Becquerel)
    }

    /// The unit-preserving zero.
    pub const fn zero(unit: ActivityUnit) -> Self {
        Self::new(0.0, unit)
    }

    /// Magnitude in [`Activity::unit`].
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Unit of the magnitude.
    pub fn unit(&self) -> ActivityUnit {
        self.unit
    }

    /// Converts to another unit.
    pub fn to(&self, unit: ActivityUnit) -> Self {
        if unit == self.unit {
            return *self;
        }
        let bq = self.magnitude * self.unit.becquerel_factor();
        Self::new(bq / unit.becquerel_factor(), unit)
    }

    /// Magnitude expressed in `unit`.
    pub fn magnitude_in(&self, unit: ActivityUnit) -> f64 {
        self.to(unit).magnitude
    }

    /// Returns `true` for strictly negative magnitudes.
    pub fn is_negative(&self) -> bool {
        self.magnitude < 0.0
    }
}

impl Add for Activity {
    type Output = Activity;

    /// The sum is expressed in the unit of the left operand.
    fn add(self, rhs: Activity) -> Activity {
        Activity::new(self.magnitude + rhs.magnitude_in(self.unit), self.unit)
    }
}

impl AddAssign for Activity {
    fn add_assign(&mut self, rhs: Activity) {
        *self = *self + rhs;
    }
}

impl Sub for Activity {
    type Output = Activity;

    /// The difference is expressed in the unit of the left operand.
    fn sub(self, rhs: Activity) -> Activity {
        Activity::new(self.magnitude - rhs.magnitude_in(self.unit), self.unit)
    }
}

impl Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit.symbol())
    }
}

/// Units of elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    /// SI second.
    Second,
    /// 60 s.
    Minute,
    /// 3600 s.
    Hour,
    /// 86400 s.
    #[default]
    Day,
}

impl TimeUnit {
    /// Number of seconds in one of this unit.
    pub fn seconds(self) -> f64 {
        match self {
            TimeUnit::Second => 1.0,
            TimeUnit::Minute => 60.0,
            TimeUnit::Hour => 3_600.0,
            TimeUnit::Day => 86_400.0,
        }
    }

    /// Conventional symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            TimeUnit::Second => "s",
            TimeUnit::Minute => "min",
            TimeUnit::Hour => "h",
            TimeUnit::Day => "d",
        }
    }
}

/// A relative time expressed in an explicit unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Elapsed {
    magnitude: f64,
    unit: TimeUnit,
}

impl Elapsed {
    /// Creates an elapsed time from a magnitude expressed in `unit`.
    pub const fn new(magnitude: f64, unit: TimeUnit) -> Self {
        Self { magnitude, unit }
    }

    /// Converts a [`chrono::Duration`] with millisecond resolution.
    pub fn from_duration(duration: Duration, unit: TimeUnit) -> Self {
        let seconds = duration.num_milliseconds() as f64 / 1_000.0;
        Self::new(seconds / unit.seconds(), unit)
    }

    /// Magnitude in [`Elapsed::unit`].
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Unit of the magnitude.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Converts to another unit.
    pub fn to(&self, unit: TimeUnit) -> Self {
        Self::new(self.magnitude * self.unit.seconds() / unit.seconds(), unit)
    }
}

impl Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit.symbol())
    }
}
