//! Steady-state evolutionary loop.
//!
//! [`Engine`] owns the population and drives one replacement per iteration:
//! select a tournament → spawn a child from the two best competitors →
//! score it → overwrite the worst competitor. When an epoch stops
//! improving for long enough, the whole population is regenerated.

use super::cancel::CancelToken;
use super::config::{EngineConfig, EvolveOptions};
use super::observer::Observer;
use super::selection::TournamentSelection;
use crate::error::{EvolveError, EvolveResult};
use crate::genome::{Fitness, Genome};
use crate::random::rng_from_seed;
use rand::rngs::StdRng;
use std::cmp::Ordering;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// The external objective: lower is better.
///
/// Any closure `FnMut(&G) -> G::Fitness` is an infallible fitness
/// function. Implement the trait directly when scoring can fail; errors
/// are propagated to the caller unchanged and never retried.
pub trait FitnessFunction<G: Genome> {
    /// Scores one genome.
    fn evaluate(&mut self, genome: &G) -> EvolveResult<G::Fitness>;
}

impl<G, F> FitnessFunction<G> for F
where
    G: Genome,
    F: FnMut(&G) -> G::Fitness,
{
    fn evaluate(&mut self, genome: &G) -> EvolveResult<G::Fitness> {
        Ok(self(genome))
    }
}

/// Why a call to [`Engine::evolve`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The wall-clock budget elapsed.
    TimeLimit,
    /// The call's iteration budget was used up.
    IterationLimit,
    /// The cancellation token was set.
    Cancelled,
    /// The best fitness reached the target.
    TargetReached,
}

/// Result of one call to [`Engine::evolve`].
#[derive(Debug, Clone)]
pub struct EvolveOutcome<G: Genome> {
    /// The best individual found since the engine was created.
    pub best: G,

    /// Fitness of `best`.
    pub best_fitness: G::Fitness,

    /// Best fitness of the current epoch (since the last restart).
    pub epoch_best_fitness: G::Fitness,

    /// Iterations executed by this call.
    pub iterations: u64,

    /// Value of the engine's iteration counter on return.
    pub total_iterations: u64,

    /// Restarts performed by this call.
    pub restarts: u64,

    /// Why the call returned.
    pub termination: Termination,

    /// Wall-clock time spent in this call.
    pub elapsed: Duration,
}

/// One steady-state replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement<F> {
    /// Population slot that received the child.
    pub slot: usize,

    /// Slots of the best and second-best competitors.
    pub parents: (usize, usize),

    /// All competitors of the tournament, in draw order.
    pub competitors: Vec<usize>,

    /// Fitness of the new occupant.
    pub fitness: F,
}

/// Per-epoch bookkeeping, reset at every restart.
#[derive(Debug, Clone)]
struct Epoch<G> {
    /// Iteration at which the population was (re)generated.
    last_eden: u64,
    /// Iterations into the epoch at which `best` was found.
    best_found: u64,
    best: Option<G>,
}

impl<G> Epoch<G> {
    fn new(last_eden: u64) -> Self {
        Self {
            last_eden,
            best_found: 0,
            best: None,
        }
    }
}

/// Steady-state evolutionary engine.
///
/// # Usage
///
/// ```
/// use u_evolve::engine::{Engine, EngineConfig, EvolveOptions, Termination};
/// use u_evolve::fitness::inversions;
/// use u_evolve::genome::PermutationGenome;
///
/// type Perm = PermutationGenome<u32, f64>;
///
/// let template: Perm = PermutationGenome::new((0..6).collect());
/// let config = EngineConfig::default()
///     .with_population_size(100)
///     .with_verbose(false)
///     .with_seed(42);
///
/// let mut engine = Engine::new(template, |g: &Perm| inversions(g.genes()) as f64, config)?;
/// let outcome = engine.evolve(&EvolveOptions::default().with_target_fitness(0.0))?;
///
/// assert_eq!(outcome.termination, Termination::TargetReached);
/// assert_eq!(outcome.best.genes(), &[0, 1, 2, 3, 4, 5]);
/// # Ok::<(), u_evolve::EvolveError>(())
/// ```
pub struct Engine<G: Genome, E> {
    config: EngineConfig,
    selection: TournamentSelection,
    fitness_fn: E,
    template: G,
    population: Vec<G>,
    epoch: Epoch<G>,
    best: G,
    iteration: u64,
    restarts: u64,
    rng: StdRng,
    cancel: Option<CancelToken>,
    observer: Option<Box<dyn Observer<G>>>,
}

impl<G: Genome, E: FitnessFunction<G>> Engine<G, E> {
    /// Creates an engine and scores its initial population.
    ///
    /// # Errors
    /// - `InvalidConfiguration` if `config` or the template's operator
    ///   table is invalid.
    /// - `Fitness` if the fitness function fails on an initial individual.
    pub fn new(template: G, fitness_fn: E, config: EngineConfig) -> EvolveResult<Self> {
        Self::build(template, fitness_fn, config, None)
    }

    /// Creates an engine with `observer` attached before the initial
    /// population is scored, so the first epoch's improvements are
    /// reported too.
    ///
    /// # Errors
    /// Same as [`new`](Self::new).
    pub fn new_with_observer(
        template: G,
        fitness_fn: E,
        config: EngineConfig,
        observer: impl Observer<G> + 'static,
    ) -> EvolveResult<Self> {
        Self::build(template, fitness_fn, config, Some(Box::new(observer)))
    }

    fn build(
        template: G,
        mut fitness_fn: E,
        config: EngineConfig,
        observer: Option<Box<dyn Observer<G>>>,
    ) -> EvolveResult<Self> {
        config.validate()?;
        template.operators().validate()?;

        let mut rng = rng_from_seed(config.seed);
        let population =
            score_population(&template, &mut fitness_fn, &mut rng, config.population_size)?;
        let best = population[0].clone();

        let mut engine = Self {
            selection: TournamentSelection::from(&config),
            config,
            fitness_fn,
            template,
            population,
            epoch: Epoch::new(0),
            best,
            iteration: 0,
            restarts: 0,
            rng,
            cancel: None,
            observer,
        };
        engine.track_all();

        debug!(
            population = engine.population.len(),
            best_fitness = engine.best_fitness().to_f64(),
            "initial population scored"
        );
        Ok(engine)
    }

    /// Attaches a progress observer.
    ///
    /// Improvements made while scoring the initial population are not
    /// replayed; use [`new_with_observer`](Self::new_with_observer) to see
    /// them.
    pub fn with_observer(mut self, observer: impl Observer<G> + 'static) -> Self {
        self.set_observer(observer);
        self
    }

    /// Replaces the progress observer.
    pub fn set_observer(&mut self, observer: impl Observer<G> + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Installs the token polled by [`evolve`](Self::evolve), returning the
    /// previously installed one.
    pub fn set_cancel_token(&mut self, token: Option<CancelToken>) -> Option<CancelToken> {
        std::mem::replace(&mut self.cancel, token)
    }

    /// The currently installed cancellation token.
    pub fn cancel_token(&self) -> Option<&CancelToken> {
        self.cancel.as_ref()
    }

    /// Whether the installed token requests cancellation.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The tournament shape derived from the configuration.
    pub fn selection(&self) -> TournamentSelection {
        self.selection
    }

    /// The template used to seed every epoch.
    pub fn template(&self) -> &G {
        &self.template
    }

    /// The current population.
    pub fn population(&self) -> &[G] {
        &self.population
    }

    /// Total iterations executed. Never reset.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Iteration at which the current epoch began.
    pub fn last_eden(&self) -> u64 {
        self.epoch.last_eden
    }

    /// Iterations into the current epoch at which its best was found.
    pub fn best_found(&self) -> u64 {
        self.epoch.best_found
    }

    /// Number of restarts performed.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Best individual of the current epoch.
    pub fn epoch_best(&self) -> Option<&G> {
        self.epoch.best.as_ref()
    }

    /// Best fitness of the current epoch, or [`Fitness::worst`] if none.
    pub fn epoch_best_fitness(&self) -> G::Fitness {
        self.epoch
            .best
            .as_ref()
            .and_then(Genome::fitness)
            .unwrap_or_else(G::Fitness::worst)
    }

    /// Best individual found since the engine was created.
    pub fn best(&self) -> &G {
        &self.best
    }

    /// Fitness of [`best`](Self::best).
    pub fn best_fitness(&self) -> G::Fitness {
        fitness_or_worst(&self.best)
    }

    /// Regenerates the whole population and starts a new epoch.
    ///
    /// The new population is scored before anything is replaced; if the
    /// fitness function fails, the current population and epoch are kept.
    pub fn restart(&mut self) -> EvolveResult<()> {
        self.start_state()?;
        self.restarts += 1;

        if self.logs_progress() {
            info!(iteration = self.iteration, restarts = self.restarts, "restart");
        } else {
            debug!(iteration = self.iteration, restarts = self.restarts, "restart");
        }
        if let Some(observer) = self.observer.as_mut() {
            observer.on_restart(self.iteration, self.restarts);
        }
        Ok(())
    }

    /// Draws tournament competitors from the population.
    pub fn select_competitors(&mut self) -> Vec<usize> {
        self.selection.select(self.population.len(), &mut self.rng)
    }

    /// Runs one iteration: select a tournament, then reproduce and replace.
    ///
    /// On error nothing is replaced and the iteration counter is unchanged.
    pub fn step(&mut self) -> EvolveResult<Replacement<G::Fitness>> {
        let competitors = self.select_competitors();
        self.reproduce_and_replace(competitors)
    }

    /// Spawns a child from the two best `competitors` and puts it in the
    /// slot of the worst one.
    ///
    /// Competitors are ranked by `(fitness, index)` ascending. The child is
    /// `pop[best].spawn(&pop[second])`, and it is scored before it replaces
    /// anything. Exactly one slot changes per call.
    ///
    /// # Errors
    /// - `InvalidConfiguration` if fewer than two competitors are given or
    ///   an index is out of range.
    /// - Any error from `spawn` or the fitness function; the population is
    ///   then untouched.
    pub fn reproduce_and_replace(
        &mut self,
        competitors: Vec<usize>,
    ) -> EvolveResult<Replacement<G::Fitness>> {
        if competitors.len() < 2 {
            return Err(EvolveError::config("a tournament needs at least two competitors"));
        }
        if let Some(&bad) = competitors.iter().find(|&&i| i >= self.population.len()) {
            return Err(EvolveError::config(format!(
                "competitor {bad} outside population of {}",
                self.population.len()
            )));
        }

        let mut ranked: Vec<(G::Fitness, usize)> = competitors
            .iter()
            .map(|&i| (fitness_or_worst(&self.population[i]), i))
            .collect();
        ranked.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });

        let parents = (ranked[0].1, ranked[1].1);
        let slot = ranked[ranked.len() - 1].1;

        let mut child =
            self.population[parents.0].spawn(&self.population[parents.1], &mut self.rng)?;
        let fitness = self.fitness_fn.evaluate(&child)?;
        child.set_fitness(fitness);

        self.iteration += 1;
        self.population[slot] = child;
        self.track(slot);

        trace!(
            iteration = self.iteration,
            slot,
            fitness = fitness.to_f64(),
            "replaced"
        );
        Ok(Replacement {
            slot,
            parents,
            competitors,
            fitness,
        })
    }

    /// Runs the evolutionary loop until a stopping rule fires.
    ///
    /// Before each iteration the loop checks, in order: the time limit, the
    /// iteration budget, the installed cancellation token, and the target
    /// fitness. It then restarts the population if restarts are enabled
    /// and the epoch has stagnated (more than
    /// `max(2 * best_found, 10 * population_size)` iterations old).
    ///
    /// Calls resume from the engine's current population and counters.
    ///
    /// # Errors
    /// `InvalidConfiguration` for invalid options; any fitness or spawn
    /// error. Improvements found before an error stay recorded in
    /// [`best`](Self::best).
    pub fn evolve(
        &mut self,
        options: &EvolveOptions<G::Fitness>,
    ) -> EvolveResult<EvolveOutcome<G>> {
        options.validate()?;

        let start = Instant::now();
        let start_iteration = self.iteration;
        let start_restarts = self.restarts;
        debug!(
            iteration = self.iteration,
            time_limit = ?options.time_limit,
            target = ?options.target_fitness,
            use_restarts = options.use_restarts,
            "evolve started"
        );

        let termination = loop {
            if let Some(reason) = self.termination(options, start, start_iteration) {
                break reason;
            }
            if options.use_restarts && self.stagnated() {
                self.restart()?;
            }
            self.step()?;
        };

        let outcome = EvolveOutcome {
            best: self.best.clone(),
            best_fitness: self.best_fitness(),
            epoch_best_fitness: self.epoch_best_fitness(),
            iterations: self.iteration - start_iteration,
            total_iterations: self.iteration,
            restarts: self.restarts - start_restarts,
            termination,
            elapsed: start.elapsed(),
        };
        debug!(
            termination = ?outcome.termination,
            iterations = outcome.iterations,
            best_fitness = outcome.best_fitness.to_f64(),
            "evolve finished"
        );
        Ok(outcome)
    }

    /// Runs [`evolve`](Self::evolve) with `token` installed for the
    /// duration of the call.
    ///
    /// The previously installed token is restored before returning, on
    /// success, on error, and when the fitness function panics.
    pub fn evolve_with_cancel(
        &mut self,
        options: &EvolveOptions<G::Fitness>,
        token: CancelToken,
    ) -> EvolveResult<EvolveOutcome<G>> {
        let previous = self.set_cancel_token(Some(token));
        let mut scope = CancelScope {
            engine: self,
            previous,
        };
        scope.engine.evolve(options)
    }

    /// The first stopping rule that applies, if any.
    fn termination(
        &self,
        options: &EvolveOptions<G::Fitness>,
        start: Instant,
        start_iteration: u64,
    ) -> Option<Termination> {
        if options.time_limit.is_some_and(|limit| start.elapsed() >= limit) {
            return Some(Termination::TimeLimit);
        }
        if options
            .max_iterations
            .is_some_and(|n| self.iteration - start_iteration >= n)
        {
            return Some(Termination::IterationLimit);
        }
        if self.is_cancelled() {
            return Some(Termination::Cancelled);
        }
        if let Some(target) = options.target_fitness {
            if self.best_fitness() <= target {
                return Some(Termination::TargetReached);
            }
        }
        None
    }

    /// Whether new bests and restarts are logged at `info` level. An
    /// attached observer takes over that reporting.
    fn logs_progress(&self) -> bool {
        self.config.verbose && self.observer.is_none()
    }

    /// Whether the current epoch has run long enough without improving.
    fn stagnated(&self) -> bool {
        let epoch_age = self.iteration - self.epoch.last_eden;
        let max_inactive = (2 * self.epoch.best_found).max(self.config.min_epoch_length());
        epoch_age > max_inactive
    }

    /// Scores a fresh population and commits it as a new epoch.
    fn start_state(&mut self) -> EvolveResult<()> {
        let population = score_population(
            &self.template,
            &mut self.fitness_fn,
            &mut self.rng,
            self.config.population_size,
        )?;
        self.population = population;
        self.epoch = Epoch::new(self.iteration);
        self.track_all();
        Ok(())
    }

    fn track_all(&mut self) {
        for slot in 0..self.population.len() {
            self.track(slot);
        }
    }

    /// Records the individual in `slot` as the epoch best (and all-time
    /// best) if it beats them.
    fn track(&mut self, slot: usize) {
        let genome = &self.population[slot];
        let Some(fitness) = genome.fitness() else {
            return;
        };

        let epoch_improved = match self.epoch.best.as_ref().and_then(Genome::fitness) {
            Some(best) => fitness < best,
            None => true,
        };
        if epoch_improved {
            self.epoch.best = Some(genome.clone());
            self.epoch.best_found = self.iteration - self.epoch.last_eden;

            if self.logs_progress() {
                info!(iteration = self.iteration, fitness = fitness.to_f64(), "new best");
            } else {
                debug!(iteration = self.iteration, fitness = fitness.to_f64(), "new best");
            }
            if let Some(observer) = self.observer.as_mut() {
                observer.on_improvement(genome, fitness, self.iteration);
            }
        }

        if fitness < fitness_or_worst(&self.best) {
            self.best = genome.clone();
        }
    }
}

/// Puts the previously installed cancellation token back when dropped.
struct CancelScope<'a, G: Genome, E> {
    engine: &'a mut Engine<G, E>,
    previous: Option<CancelToken>,
}

impl<G: Genome, E> Drop for CancelScope<'_, G, E> {
    fn drop(&mut self) {
        self.engine.cancel = self.previous.take();
    }
}

/// Creates and scores `n` fresh individuals from `template`.
fn score_population<G, E>(
    template: &G,
    fitness_fn: &mut E,
    rng: &mut StdRng,
    n: usize,
) -> EvolveResult<Vec<G>>
where
    G: Genome,
    E: FitnessFunction<G>,
{
    let mut population = Vec::with_capacity(n);
    for _ in 0..n {
        let mut genome = template.fresh(rng);
        let fitness = fitness_fn.evaluate(&genome)?;
        genome.set_fitness(fitness);
        population.push(genome);
    }
    Ok(population)
}

fn fitness_or_worst<G: Genome>(genome: &G) -> G::Fitness {
    genome.fitness().unwrap_or_else(G::Fitness::worst)
}

// ============================================================================
// Tests
// ============================================================================
