use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::config::constants::{CHUNK_SEED_STRIDE, SAMPLER_CHUNK_SIZE};
use crate::config::parameters::{ParameterSet, SampleRange};
use crate::error::{Result, SimulationError};
use crate::models::result_table::{ResultTable, ResultTableBuilder};
use crate::models::sample::{Sample, TrialInputs};
use crate::utils::logging::{self, OperationCategory, SamplingType};

/// Independent RNG stream for one chunk of a seeded run.
pub fn chunk_rng(seed: u64, chunk_index: usize) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add((chunk_index as u64).wrapping_mul(CHUNK_SEED_STRIDE)))
}

fn uniform(range: &SampleRange) -> Uniform<f64> {
    Uniform::new(range.min, range.max)
}

/// Draws trials from a validated parameter set.
pub struct MonteCarloSampler<'a> {
    params: &'a ParameterSet,
    illumination: Uniform<f64>,
    quality: Uniform<f64>,
    sensitivity: Uniform<f64>,
    aperture: Uniform<f64>,
}

impl<'a> MonteCarloSampler<'a> {
    pub fn new(params: &'a ParameterSet) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            illumination: uniform(&params.ranges.illumination),
            quality: uniform(&params.ranges.quality),
            sensitivity: uniform(&params.ranges.sensitivity),
            aperture: uniform(&params.ranges.aperture),
        })
    }

    /// One trial. The four draws are taken in a fixed order from the same
    /// stream so a trial never interleaves with another.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Sample {
        let inputs = TrialInputs {
            illumination: self.illumination.sample(rng),
            quality: self.quality.sample(rng),
            sensitivity: self.sensitivity.sample(rng),
            aperture: self.aperture.sample(rng),
        };
        Sample::new(inputs, &self.params.coefficients)
    }

    /// Runs `count` trials sequentially against a caller-owned random source.
    pub fn run<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<ResultTable> {
        if count == 0 {
            return Err(SimulationError::InvalidSimulationCount);
        }
        let _timing = logging::start_timing("sampler_run",
            OperationCategory::Sampling { subcategory: SamplingType::Sequential });

        let mut builder = ResultTableBuilder::with_capacity(count);
        for _ in 0..count {
            builder.push(self.draw(rng));
        }
        Ok(builder.finish())
    }

    /// Seeded run split into fixed-size chunks, each with its own stream.
    ///
    /// The output depends only on `seed` and `count`: sequential and parallel
    /// execution yield identical tables.
    pub fn run_seeded(&self, count: usize, seed: u64, parallel: bool) -> Result<ResultTable> {
        self.run_seeded_with_progress(count, seed, parallel, |_| {})
    }

    /// Same as [`run_seeded`](Self::run_seeded), reporting the size of every
    /// finished chunk to `on_chunk`.
    pub fn run_seeded_with_progress<F>(
        &self,
        count: usize,
        seed: u64,
        parallel: bool,
        on_chunk: F,
    ) -> Result<ResultTable>
    where
        F: Fn(usize) + Sync,
    {
        if count == 0 {
            return Err(SimulationError::InvalidSimulationCount);
        }

        let chunk_count = count.div_ceil(SAMPLER_CHUNK_SIZE);
        let chunk_len = |index: usize| SAMPLER_CHUNK_SIZE.min(count - index * SAMPLER_CHUNK_SIZE);
        let run_chunk = |index: usize| {
            let samples = self.sample_chunk(seed, index, chunk_len(index));
            on_chunk(samples.len());
            samples
        };

        debug!(count, chunk_count, seed, parallel, "sampling trials");

        let partials: Vec<Vec<Sample>> = if parallel {
            let _timing = logging::start_timing("sampler_run_seeded",
                OperationCategory::Sampling { subcategory: SamplingType::Parallel });
            (0..chunk_count).into_par_iter().map(run_chunk).collect()
        } else {
            let _timing = logging::start_timing("sampler_run_seeded",
                OperationCategory::Sampling { subcategory: SamplingType::Sequential });
            (0..chunk_count).map(run_chunk).collect()
        };

        let mut builder = ResultTableBuilder::with_capacity(count);
        for partial in partials {
            builder.append(partial);
        }
        Ok(builder.finish())
    }

    fn sample_chunk(&self, seed: u64, chunk_index: usize, len: usize) -> Vec<Sample> {
        let mut rng = chunk_rng(seed, chunk_index);
        (0..len).map(|_| self.draw(&mut rng)).collect()
    }
}
