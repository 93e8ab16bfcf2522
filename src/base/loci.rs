//! The locus partition: how the genome splits into driver, other-driver and
//! passenger regions.
//!
//! Loci are numbered 1..=D. The last `passengers` loci form the passenger
//! region; the rest is the driver region, whose tail of `other_drivers` loci
//! carries its own selection coefficient. Each mutation class draws uniformly
//! from its own window.

use crate::base::LocusId;
use crate::errors::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Category of a locus under the fitness schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocusClass {
    /// Ordinary driver: contributes a (1+s) fitness factor.
    Driver,
    /// Other driver: contributes a (1+s1) fitness factor.
    OtherDriver,
    /// Passenger: no fitness contribution.
    Passenger,
}

/// An inclusive range of loci a mutation class draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocusWindow {
    lo: LocusId,
    hi: LocusId,
}

impl LocusWindow {
    /// Number of loci in the window; zero when the window is empty.
    pub fn len(&self) -> u64 {
        if self.hi < self.lo {
            0
        } else {
            u64::from(self.hi - self.lo) + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Draw one locus uniformly from the window.
    ///
    /// # Panics
    /// Panics if the window is empty; callers skip empty classes.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> LocusId {
        rng.random_range(self.lo..=self.hi)
    }
}

/// Partition of the locus space into driver, other-driver and passenger
/// regions, fixed for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocusPartition {
    /// Total number of loci D
    total: u32,
    /// Passenger loci d0 (the top of the locus range)
    passengers: u32,
    /// Other-driver loci d1 (the top of the driver range)
    other_drivers: u32,
}

impl LocusPartition {
    /// Build a partition, checking that the regions fit inside the genome.
    pub fn new(total: u32, passengers: u32, other_drivers: u32) -> Result<Self, ConfigError> {
        if total == 0 {
            return Err(ConfigError::NonPositive("total loci"));
        }
        if u64::from(passengers) + u64::from(other_drivers) > u64::from(total) {
            return Err(ConfigError::PartitionOverflow {
                passengers,
                other_drivers,
                total,
            });
        }
        Ok(Self {
            total,
            passengers,
            other_drivers,
        })
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn passengers(&self) -> u32 {
        self.passengers
    }

    pub fn other_drivers(&self) -> u32 {
        self.other_drivers
    }

    /// Driver mutations are drawn from [1, D - d0].
    pub fn driver_window(&self) -> LocusWindow {
        LocusWindow {
            lo: 1,
            hi: self.total - self.passengers,
        }
    }

    /// Passenger mutations are drawn from [D - d0 + 1, D].
    pub fn passenger_window(&self) -> LocusWindow {
        LocusWindow {
            lo: self.total - self.passengers + 1,
            hi: self.total,
        }
    }

    /// Classify a locus under the fitness schedule.
    pub fn classify(&self, locus: LocusId) -> LocusClass {
        let driver_end = self.total - self.passengers;
        if locus > driver_end {
            LocusClass::Passenger
        } else if locus > driver_end - self.other_drivers {
            LocusClass::OtherDriver
        } else {
            LocusClass::Driver
        }
    }
}
