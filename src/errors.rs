use std::error;
use std::fmt;
use std::io;

/// Errors detected while validating a run configuration.
///
/// All configuration problems are caught before any simulation work begins.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A size, count or cadence parameter that must be positive was zero.
    NonPositive(&'static str),
    /// A mutation rate was outside [0.0, 1.0).
    InvalidRate(&'static str, f64),
    /// A selection coefficient was negative.
    NegativeSelection(&'static str, f64),
    /// Passenger and other-driver locus counts exceed the total locus count.
    PartitionOverflow { passengers: u32, other_drivers: u32, total: u32 },
    /// The requested population size cannot be sampled exactly.
    PopulationTooLarge { requested: u64, max: u64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive(name) => write!(f, "Parameter {name} must be positive"),
            Self::InvalidRate(name, rate) => {
                write!(f, "Invalid mutation rate {name} = {rate} (must be in [0, 1))")
            }
            Self::NegativeSelection(name, s) => {
                write!(f, "Selection coefficient {name} = {s} must be non-negative")
            }
            Self::PartitionOverflow {
                passengers,
                other_drivers,
                total,
            } => write!(
                f,
                "Locus partition overflow: {passengers} passengers + {other_drivers} other drivers > {total} loci"
            ),
            Self::PopulationTooLarge { requested, max } => write!(
                f,
                "Population size {requested} too large for the random number generator (max {max})"
            ),
        }
    }
}

impl error::Error for ConfigError {}

/// Error returned when an insertion would exceed the genotype store capacity.
///
/// This is a fatal run condition: the engine flushes current state to output
/// and the run terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    /// Live records at the time of the failed insertion
    pub live: usize,
    /// Records the operation wanted to add
    pub requested: usize,
    /// Hard capacity of the store
    pub capacity: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Too many genotypes: {} live + {} new exceeds capacity {}",
            self.live, self.requested, self.capacity
        )
    }
}

impl error::Error for CapacityError {}

/// Errors raised by the growth schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthError {
    /// The scheduled population size exceeded the hard ceiling.
    PopulationOverflow { size: u64, ceiling: u64 },
}

impl fmt::Display for GrowthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PopulationOverflow { size, ceiling } => {
                write!(f, "Population has grown too large: {size} exceeds ceiling {ceiling}")
            }
        }
    }
}

impl error::Error for GrowthError {}

/// Errors raised while drawing from sampling distributions.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingError {
    /// A selection weight was negative or not finite.
    InvalidWeight(f64),
    /// The weight vector summed to zero or was empty.
    DegenerateWeights,
    /// A probability parameter was outside [0.0, 1.0].
    InvalidProbability(f64),
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWeight(w) => write!(f, "Invalid selection weight: {w}"),
            Self::DegenerateWeights => write!(f, "Selection weights sum to zero"),
            Self::InvalidProbability(p) => {
                write!(f, "Invalid probability: {p} (must be between 0.0 and 1.0)")
            }
        }
    }
}

impl error::Error for SamplingError {}

/// Errors raised while writing simulation output.
#[derive(Debug)]
pub enum OutputError {
    /// The output file could not be created.
    Create(String, io::Error),
    /// A write to an already-open output file failed.
    Write(io::Error),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create(path, e) => write!(f, "Cannot open output file {path}: {e}"),
            Self::Write(e) => write!(f, "Failed to write output: {e}"),
        }
    }
}

impl error::Error for OutputError {}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        Self::Write(e)
    }
}

/// Aggregate error type for a simulation run.
///
/// Every variant is fatal for the run it occurs in; the driver flushes
/// best-effort output and terminates with a nonzero exit code.
#[derive(Debug)]
pub enum SimulationError {
    Config(ConfigError),
    Capacity(CapacityError),
    Growth(GrowthError),
    Sampling(SamplingError),
    Output(OutputError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Capacity(e) => write!(f, "{e}"),
            Self::Growth(e) => write!(f, "{e}"),
            Self::Sampling(e) => write!(f, "{e}"),
            Self::Output(e) => write!(f, "{e}"),
        }
    }
}

impl error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Capacity(e) => Some(e),
            Self::Growth(e) => Some(e),
            Self::Sampling(e) => Some(e),
            Self::Output(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<CapacityError> for SimulationError {
    fn from(e: CapacityError) -> Self {
        Self::Capacity(e)
    }
}

impl From<GrowthError> for SimulationError {
    fn from(e: GrowthError) -> Self {
        Self::Growth(e)
    }
}

impl From<SamplingError> for SimulationError {
    fn from(e: SamplingError) -> Self {
        Self::Sampling(e)
    }
}

impl From<OutputError> for SimulationError {
    fn from(e: OutputError) -> Self {
        Self::Output(e)
    }
}
