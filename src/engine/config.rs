//! Engine configuration.
//!
//! [`EngineConfig`] holds the parameters fixed for the engine's lifetime;
//! [`EvolveOptions`] holds the per-call run budget.

use crate::error::{EvolveError, EvolveResult};
use std::time::Duration;

/// Configuration for the steady-state engine.
///
/// # Defaults
///
/// ```
/// use u_evolve::engine::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.population_size, 10_000);
/// assert_eq!(config.local_size, 10);
/// assert_eq!(config.tourney_size, 3);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evolve::engine::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_population_size(500)
///     .with_local_size(0)
///     .with_tourney_size(4)
///     .with_verbose(false)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Number of individuals in the population.
    ///
    /// Constant for the lifetime of the engine; a restart refills the
    /// population with the same number of fresh individuals.
    pub population_size: usize,

    /// Half-width of the tournament neighborhood.
    ///
    /// Competitors are drawn within `local_size` circular steps of a random
    /// midpoint. `0` draws competitors from the whole population.
    pub local_size: usize,

    /// Number of competitors per tournament (at least 2).
    ///
    /// The two best competitors become parents, the worst is replaced.
    pub tourney_size: usize,

    /// Whether new bests and restarts are logged at `info` level.
    ///
    /// When `false`, or when an observer is attached, they are logged at
    /// `debug` level.
    pub verbose: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 10_000,
            local_size: 10,
            tourney_size: 3,
            verbose: true,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the tournament neighborhood half-width (0 for global).
    pub fn with_local_size(mut self, n: usize) -> Self {
        self.local_size = n;
        self
    }

    /// Sets the number of competitors per tournament.
    pub fn with_tourney_size(mut self, n: usize) -> Self {
        self.tourney_size = n;
        self
    }

    /// Enables or disables verbose progress logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Iterations an epoch may run before a restart is considered,
    /// regardless of when its best was found.
    pub fn min_epoch_length(&self) -> u64 {
        10 * self.population_size as u64
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> EvolveResult<()> {
        if self.population_size == 0 {
            return Err(EvolveError::config("population_size must be at least 1"));
        }
        if self.tourney_size < 2 {
            return Err(EvolveError::config("tourney_size must be at least 2"));
        }
        Ok(())
    }
}

/// Budget and stopping rules for one call to
/// [`Engine::evolve`](super::Engine::evolve).
///
/// All limits are optional; with none set the run only stops when
/// cancelled.
///
/// ```
/// use std::time::Duration;
/// use u_evolve::engine::EvolveOptions;
///
/// let options = EvolveOptions::default()
///     .with_time_limit(Duration::from_secs(5))
///     .with_target_fitness(0.0)
///     .with_restarts(false);
/// assert_eq!(options.target_fitness, Some(0.0));
/// assert!(!options.use_restarts);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolveOptions<F> {
    /// Wall-clock budget. `None` is unbounded.
    pub time_limit: Option<Duration>,

    /// Stop once the best fitness is at or below this value.
    pub target_fitness: Option<F>,

    /// Whether stagnation restarts are enabled.
    pub use_restarts: bool,

    /// Maximum number of iterations this call may execute.
    pub max_iterations: Option<u64>,
}

impl<F> Default for EvolveOptions<F> {
    fn default() -> Self {
        Self {
            time_limit: None,
            target_fitness: None,
            use_restarts: true,
            max_iterations: None,
        }
    }
}

impl<F> EvolveOptions<F> {
    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the wall-clock budget in seconds.
    ///
    /// `0` or less, NaN, infinity, and values too large for a [`Duration`]
    /// are unbounded.
    pub fn with_seconds(mut self, seconds: f64) -> Self {
        self.time_limit = if seconds > 0.0 {
            Duration::try_from_secs_f64(seconds).ok()
        } else {
            None
        };
        self
    }

    /// Sets the early-stop fitness threshold.
    pub fn with_target_fitness(mut self, target: F) -> Self {
        self.target_fitness = Some(target);
        self
    }

    /// Enables or disables stagnation restarts.
    pub fn with_restarts(mut self, use_restarts: bool) -> Self {
        self.use_restarts = use_restarts;
        self
    }

    /// Sets the iteration budget for the call.
    pub fn with_max_iterations(mut self, n: u64) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Validates the options.
    pub fn validate(&self) -> EvolveResult<()> {
        if self.time_limit == Some(Duration::ZERO) {
            return Err(EvolveError::config("time_limit must be positive or None"));
        }
        Ok(())
    }
}
