use std::fmt;

/// Errors raised while building components from configuration records
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required record field was absent
    MissingField {
        index: usize,
        field: &'static str,
    },
    /// A tolerance pair with `min > max` (or a non-finite bound)
    InvalidTolerance { min: f64, max: f64 },
    /// Sigma must be strictly positive
    InvalidSigma(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingField { index, field } => {
                write!(f, "component record {index} is missing required field `{field}`")
            }
            ConfigError::InvalidTolerance { min, max } => {
                write!(f, "invalid tolerance range ({min}%, {max}%): min must not exceed max")
            }
            ConfigError::InvalidSigma(sigma) => {
                write!(f, "invalid sigma {sigma}: must be greater than zero")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors related to component lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    ComponentNotFound(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::ComponentNotFound(symbol) => {
                write!(f, "component with symbol {symbol} not found")
            }
        }
    }
}

impl std::error::Error for LookupError {}

/// Errors raised by user formulas
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaError {
    /// A denominator evaluated to zero
    DivisionByZero,
    /// Any other domain failure (negative square root, log of zero, ...)
    Domain(String),
    /// The formula asked for a value that was not supplied
    MissingValue(String),
}

impl FormulaError {
    /// Whether a Monte Carlo run may drop the trial that raised this error.
    ///
    /// Only division by zero qualifies; every other kind aborts the run.
    #[must_use]
    pub fn is_skippable(&self) -> bool {
        matches!(self, FormulaError::DivisionByZero)
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaError::DivisionByZero => write!(f, "division by zero"),
            FormulaError::Domain(msg) => write!(f, "domain error: {msg}"),
            FormulaError::MissingValue(name) => write!(f, "no value supplied for {name}"),
        }
    }
}

impl std::error::Error for FormulaError {}

/// Errors from a single formula evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationError {
    Lookup(LookupError),
    Formula(FormulaError),
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::Lookup(e) => write!(f, "{e}"),
            EvaluationError::Formula(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EvaluationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvaluationError::Lookup(e) => Some(e),
            EvaluationError::Formula(e) => Some(e),
        }
    }
}

impl From<LookupError> for EvaluationError {
    fn from(err: LookupError) -> Self {
        EvaluationError::Lookup(err)
    }
}

impl From<FormulaError> for EvaluationError {
    fn from(err: FormulaError) -> Self {
        EvaluationError::Formula(err)
    }
}

/// Errors that end a Monte Carlo run without a report
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Lookup(LookupError),
    /// A formula error that is not eligible for skipping
    Formula(FormulaError),
    /// Every trial was skipped
    Exhausted { requested: usize },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Lookup(e) => write!(f, "{e}"),
            SimulationError::Formula(e) => write!(f, "{e}"),
            SimulationError::Exhausted { requested } => write!(
                f,
                "no valid output values could be calculated ({requested} trials requested)"
            ),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Lookup(e) => Some(e),
            SimulationError::Formula(e) => Some(e),
            SimulationError::Exhausted { .. } => None,
        }
    }
}

impl From<LookupError> for SimulationError {
    fn from(err: LookupError) -> Self {
        SimulationError::Lookup(err)
    }
}

impl From<FormulaError> for SimulationError {
    fn from(err: FormulaError) -> Self {
        SimulationError::Formula(err)
    }
}

impl From<EvaluationError> for SimulationError {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::Lookup(e) => SimulationError::Lookup(e),
            EvaluationError::Formula(e) => SimulationError::Formula(e),
        }
    }
}

/// Errors from local sensitivity analysis
#[derive(Debug, Clone, PartialEq)]
pub enum SensitivityError {
    Lookup(LookupError),
    Formula(FormulaError),
    /// The perturbation step must be finite and greater than zero
    InvalidDelta(f64),
}

impl fmt::Display for SensitivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensitivityError::Lookup(e) => write!(f, "{e}"),
            SensitivityError::Formula(e) => write!(f, "{e}"),
            SensitivityError::InvalidDelta(delta) => {
                write!(f, "invalid perturbation {delta}%: must be finite and greater than zero")
            }
        }
    }
}

impl std::error::Error for SensitivityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SensitivityError::Lookup(e) => Some(e),
            SensitivityError::Formula(e) => Some(e),
            SensitivityError::InvalidDelta(_) => None,
        }
    }
}

impl From<LookupError> for SensitivityError {
    fn from(err: LookupError) -> Self {
        SensitivityError::Lookup(err)
    }
}

impl From<FormulaError> for SensitivityError {
    fn from(err: FormulaError) -> Self {
        SensitivityError::Formula(err)
    }
}

impl From<EvaluationError> for SensitivityError {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::Lookup(e) => SensitivityError::Lookup(e),
            EvaluationError::Formula(e) => SensitivityError::Formula(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, EvaluationError>;
