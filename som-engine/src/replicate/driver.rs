//! Replicate driver: seeds, runs and collects Monte-Carlo replicates.
//!
//! Replicate `i` draws from `StdRng::seed_from_u64(base.wrapping_add(i))`,
//! so any single replicate can be reproduced in isolation. Replicates share
//! the input tables read-only and run on a rayon pool when enabled.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use som_core::config::SomConfig;
use som_core::errors::{InputError, ReplicateError, RunResult, SomErrorCode};
use som_core::types::{Case, Link};
use tracing::{debug, info, warn};

use super::inputs::InputTables;
use super::sample::ReplicateSample;
use crate::propagation::{ChangePropagator, PropagationInputs, PropagationOutput};

type Outcome = (u32, Result<ReplicateOutput, ReplicateError>);

/// One successful replicate.
#[derive(Debug, Clone)]
pub struct ReplicateOutput {
    pub replicate: u32,
    pub seed: u64,
    /// Links with the reductions sampled for this replicate.
    pub links: Vec<Link>,
    pub cases: Vec<Case>,
    pub propagation: PropagationOutput,
}

#[derive(Debug, Clone)]
pub struct ReplicateDriver {
    config: SomConfig,
    propagator: ChangePropagator,
}

impl ReplicateDriver {
    pub fn new(config: SomConfig) -> Self {
        let propagator = ChangePropagator::from_config(&config);
        Self { config, propagator }
    }

    pub fn with_propagator(mut self, propagator: ChangePropagator) -> Self {
        self.propagator = propagator;
        self
    }

    pub fn config(&self) -> &SomConfig {
        &self.config
    }

    /// Run one replicate with its own RNG.
    pub fn run_replicate(
        &self,
        replicate: u32,
        seed: u64,
        inputs: &InputTables,
    ) -> Result<ReplicateOutput, ReplicateError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let sample = ReplicateSample::draw(inputs, &self.config, &mut rng)?;
        debug!(
            replicate,
            links = sample.links.len(),
            cases = sample.cases.len(),
            "replicate sampled"
        );

        let pressures = inputs.pressure_ids();
        let states = inputs.state_ids();
        let areas = inputs.area_ids();

        let propagation = self.propagator.run(&PropagationInputs {
            pressures: &pressures,
            states: &states,
            areas: &areas,
            links: &sample.links,
            cases: &sample.cases,
            overlaps: &inputs.overlaps,
            subpressures: &inputs.subpressures,
            activity_contributions: &sample.activity_contributions,
            pressure_contributions: &sample.pressure_contributions,
            thresholds: &sample.thresholds,
        })?;

        Ok(ReplicateOutput {
            replicate,
            seed,
            links: sample.links.into_links(),
            cases: sample.cases,
            propagation,
        })
    }

    /// Run every configured replicate.
    ///
    /// The input tables are validated first; a validation failure is fatal
    /// and no replicate runs. Failed replicates are logged and recorded in
    /// the result's `errors`; successful ones are returned in replicate order.
    pub fn run(&self, inputs: &InputTables) -> Result<RunResult<Vec<ReplicateOutput>>, InputError> {
        if let Err(error) = inputs.validate() {
            warn!(code = error.error_code(), %error, "input tables rejected");
            return Err(error);
        }

        let simulations = self.config.simulation.effective_simulations();
        let base_seed = self
            .config
            .simulation
            .random_seed
            .unwrap_or_else(|| rand::thread_rng().next_u64());

        info!(simulations, base_seed, "starting replicates");

        let completed = AtomicU64::new(0);
        let run_one = |i: u32| {
            let outcome = self.run_replicate(i, base_seed.wrapping_add(u64::from(i)), inputs);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % 100 == 0 {
                info!(done, simulations, "replicate progress");
            }
            (i, outcome)
        };

        let outcomes: Vec<Outcome> =
            if self.config.simulation.effective_use_parallel() {
                let threads = self.config.simulation.effective_threads();
                let run_all = || -> Vec<Outcome> {
                    (0..simulations).into_par_iter().map(run_one).collect()
                };
                if threads > 0 {
                    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                        Ok(pool) => pool.install(run_all),
                        Err(e) => {
                            warn!(threads, error = %e, "cannot build thread pool, using global pool");
                            run_all()
                        }
                    }
                } else {
                    run_all()
                }
            } else {
                (0..simulations).map(run_one).collect()
            };

        let mut result = RunResult::new(Vec::with_capacity(outcomes.len()));
        for (i, outcome) in outcomes {
            match outcome {
                Ok(output) => result.data.push(output),
                Err(error) => {
                    warn!(replicate = i, code = error.error_code(), %error, "replicate failed");
                    result.add_error(i, error);
                }
            }
        }

        info!(
            succeeded = result.data.len(),
            failed = result.error_count(),
            "replicates complete"
        );
        Ok(result)
    }
}
