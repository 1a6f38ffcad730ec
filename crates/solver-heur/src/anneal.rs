use crate::moves::{random_move, MoveKind};
use rand::Rng;
use sched_core::{check_hard, AnnealParams, Objective, SchedError, Solution, TimetableData};
use tracing::{debug, info};

/// Rejects schedules that could not cool or would never start.
pub fn check_params(p: &AnnealParams) -> Result<(), SchedError> {
    let mut errors = Vec::new();
    if !(p.initial_temperature > 0.0 && p.initial_temperature.is_finite()) {
        errors.push(format!(
            "initial temperature must be positive, got {}",
            p.initial_temperature
        ));
    }
    if !(p.final_temperature > 0.0 && p.final_temperature < p.initial_temperature) {
        errors.push(format!(
            "final temperature must lie in (0, {}), got {}",
            p.initial_temperature, p.final_temperature
        ));
    }
    if !(p.alpha > 0.0 && p.alpha < 1.0) {
        errors.push(format!("alpha must lie in (0, 1), got {}", p.alpha));
    }
    if p.max_iterations == 0 {
        errors.push("max iterations must be positive".into());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchedError::InvalidParams(errors.join("; ")))
    }
}

/// Checks every schedule of a portfolio and splits off the first run.
pub fn check_portfolio(
    runs: &[AnnealParams],
) -> Result<(&AnnealParams, &[AnnealParams]), SchedError> {
    for run in runs {
        check_params(run)?;
    }
    runs.split_first()
        .ok_or_else(|| SchedError::InvalidParams("at least one annealing run is required".into()))
}

/// Metropolis rule: improvements always pass, anything else passes when
/// `draw < exp(delta / temperature)`.
#[inline]
pub fn metropolis(delta: f64, temperature: f64, draw: f64) -> bool {
    delta > 0.0 || draw < (delta / temperature).exp()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Improved,
    Accepted,
    Rejected,
    Infeasible,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Improved | Verdict::Accepted)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Step {
    pub iteration: u64,
    pub temperature: f64,
    pub kind: MoveKind,
    pub verdict: Verdict,
    /// `None` when the candidate broke a hard constraint.
    pub candidate: Option<f64>,
    /// Fitness of the current schedule before this step.
    pub previous: f64,
    pub current: f64,
    pub best: f64,
}

pub trait AnnealMonitor {
    fn on_step(&mut self, step: &Step);
}

impl AnnealMonitor for () {
    fn on_step(&mut self, _step: &Step) {}
}

/// Logs new bests and a progress line every `every` iterations.
#[derive(Debug)]
pub struct TracingMonitor {
    run: usize,
    every: u64,
    last_best: f64,
}

impl TracingMonitor {
    pub fn new(run: usize, every: u64) -> Self {
        Self {
            run,
            every: every.max(1),
            last_best: f64::NEG_INFINITY,
        }
    }
}

impl AnnealMonitor for TracingMonitor {
    fn on_step(&mut self, step: &Step) {
        if step.best > self.last_best {
            if self.last_best.is_finite() {
                debug!(
                    run = self.run,
                    iteration = step.iteration,
                    best = step.best,
                    kind = step.kind.as_str(),
                    "new best"
                );
            }
            self.last_best = step.best;
        }
        if step.iteration % self.every == 0 {
            debug!(
                run = self.run,
                iteration = step.iteration,
                temperature = step.temperature,
                current = step.current,
                best = step.best,
                "annealing progress"
            );
        }
    }
}

#[derive(Clone, Debug)]
pub struct AnnealOutcome {
    pub best: Solution,
    pub best_fitness: f64,
    pub start_fitness: f64,
    pub iterations: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub infeasible: u64,
    pub final_temperature: f64,
}

pub struct Annealer<'a, O: Objective + ?Sized> {
    data: &'a TimetableData,
    objective: &'a O,
    params: AnnealParams,
}

impl<'a, O: Objective + ?Sized> Annealer<'a, O> {
    pub fn new(
        data: &'a TimetableData,
        objective: &'a O,
        params: AnnealParams,
    ) -> Result<Self, SchedError> {
        check_params(&params)?;
        Ok(Self {
            data,
            objective,
            params,
        })
    }

    /// Runs while `temperature > final_temperature` OR
    /// `iteration < max_iterations`; both must be exhausted to stop.
    pub fn run<R, M>(
        &self,
        start: Solution,
        rng: &mut R,
        monitor: &mut M,
    ) -> Result<AnnealOutcome, SchedError>
    where
        R: Rng + ?Sized,
        M: AnnealMonitor + ?Sized,
    {
        check_hard(&start, self.data)?;

        let p = self.params;
        let mut current = start;
        let mut current_fit = self.objective.score(&current, self.data);
        let start_fitness = current_fit;
        let mut best = current.clone();
        let mut best_fit = current_fit;

        let mut temperature = p.initial_temperature;
        let mut iteration = 0u64;
        let (mut accepted, mut rejected, mut infeasible) = (0u64, 0u64, 0u64);

        while temperature > p.final_temperature || iteration < p.max_iterations {
            let mv = random_move(&current, rng);
            let candidate_fit = match check_hard(&mv.candidate, self.data) {
                Ok(()) => Some(self.objective.score(&mv.candidate, self.data)),
                Err(_) => None,
            };

            let verdict = match candidate_fit {
                None => Verdict::Infeasible,
                Some(f) => {
                    let delta = f - current_fit;
                    if delta > 0.0 {
                        Verdict::Improved
                    } else if metropolis(delta, temperature, rng.gen::<f64>()) {
                        Verdict::Accepted
                    } else {
                        Verdict::Rejected
                    }
                }
            };

            let previous = current_fit;
            match (verdict, candidate_fit) {
                (Verdict::Improved | Verdict::Accepted, Some(f)) => {
                    accepted += 1;
                    current = mv.candidate;
                    current_fit = f;
                    if current_fit > best_fit {
                        best = current.clone();
                        best_fit = current_fit;
                    }
                }
                (Verdict::Infeasible, _) => infeasible += 1,
                _ => rejected += 1,
            }

            monitor.on_step(&Step {
                iteration,
                temperature,
                kind: mv.kind,
                verdict,
                candidate: candidate_fit,
                previous,
                current: current_fit,
                best: best_fit,
            });

            temperature *= p.alpha;
            iteration += 1;
        }

        info!(
            iterations = iteration,
            accepted,
            rejected,
            infeasible,
            start = start_fitness,
            best = best_fit,
            "annealing finished"
        );

        Ok(AnnealOutcome {
            best,
            best_fitness: best_fit,
            start_fitness,
            iterations: iteration,
            accepted,
            rejected,
            infeasible,
            final_temperature: temperature,
        })
    }
}
