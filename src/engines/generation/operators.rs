use crate::config::CrossoverMethod;
use crate::data::LegalFields;
use crate::engines::generation::genome::{Gene, TriggerRole, CLAUSES_PER_GENE};
use crate::engines::generation::trigger::CLAUSES_PER_TRIGGER;
use crate::error::{Result, TradegeneError};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Fitness-proportionate sampler built once per generation.
///
/// Negative fitnesses shift the whole wheel by `-min` so the worst gene
/// gets weight zero. A wheel with no usable weight (all equal, zero total
/// or non-finite total) picks uniformly.
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    cumulative: Vec<f64>,
    uniform: bool,
}

impl RouletteWheel {
    pub fn new(fitnesses: &[f64]) -> Result<Self> {
        if fitnesses.is_empty() {
            return Err(TradegeneError::Generation(
                "Cannot select from an empty population".to_string(),
            ));
        }

        let shift = negative_shift(fitnesses);
        let mut total = 0.0;
        let cumulative: Vec<f64> = fitnesses
            .iter()
            .map(|f| {
                total += f + shift;
                total
            })
            .collect();

        let uniform = !total.is_finite() || total <= 0.0 || all_equal(fitnesses);
        Ok(Self { cumulative, uniform })
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    pub fn is_uniform(&self) -> bool {
        self.uniform
    }

    pub fn spin<R: Rng>(&self, rng: &mut R) -> usize {
        let last = self.cumulative.len() - 1;
        if self.uniform {
            return rng.gen_range(0..=last);
        }
        let total = self.cumulative[last];
        let u = rng.gen_range(0.0..total);
        self.cumulative.partition_point(|&c| c <= u).min(last)
    }
}

/// Single roulette draw over `fitnesses` whose plain sum is `fitness_sum`.
pub fn selection<R: Rng>(fitness_sum: f64, fitnesses: &[f64], rng: &mut R) -> Result<usize> {
    if fitnesses.is_empty() {
        return Err(TradegeneError::Generation(
            "Cannot select from an empty population".to_string(),
        ));
    }

    let shift = negative_shift(fitnesses);
    let total = fitness_sum + shift * fitnesses.len() as f64;
    if !total.is_finite() || total <= 0.0 || all_equal(fitnesses) {
        return Ok(rng.gen_range(0..fitnesses.len()));
    }

    let mut spin = rng.gen_range(0.0..total);
    let mut fallback = 0;
    for (index, fitness) in fitnesses.iter().enumerate() {
        let weight = fitness + shift;
        if weight > 0.0 {
            fallback = index;
        }
        if spin < weight {
            return Ok(index);
        }
        spin -= weight;
    }

    // Rounding in the running subtraction
    Ok(fallback)
}

/// Two children from two parents over the eight flattened clauses.
pub fn crossover<R: Rng>(
    parent1: &Gene,
    parent2: &Gene,
    method: CrossoverMethod,
    rng: &mut R,
) -> (Gene, Gene) {
    let mut child1 = parent1.clauses();
    let mut child2 = parent2.clauses();

    match method {
        CrossoverMethod::SinglePoint => {
            let point = rng.gen_range(1..CLAUSES_PER_GENE);
            child1[point..].copy_from_slice(&parent2.clauses()[point..]);
            child2[point..].copy_from_slice(&parent1.clauses()[point..]);
        }
        CrossoverMethod::Uniform => {
            for i in 0..CLAUSES_PER_GENE {
                if rng.gen_bool(0.5) {
                    std::mem::swap(&mut child1[i], &mut child2[i]);
                }
            }
        }
    }

    (Gene::from_clauses(child1), Gene::from_clauses(child2))
}

/// Perturb `n_mutations` genes of `population` in place.
///
/// Slots are drawn with replacement from `protected..len`. Each draw adds
/// `Normal(0, mutation_std)` to the coefficient of one random clause and,
/// with probability `field_redraw_probability`, gives that clause a new
/// random field.
pub fn mutation<R: Rng>(
    population: &mut [Gene],
    n_mutations: usize,
    mutation_std: f64,
    protected: usize,
    fields: &LegalFields,
    field_redraw_probability: f64,
    rng: &mut R,
) -> Result<()> {
    if !(mutation_std > 0.0 && mutation_std.is_finite()) {
        return Err(TradegeneError::Configuration(format!(
            "mutation_std must be positive and finite, got {}",
            mutation_std
        )));
    }
    if n_mutations == 0 || protected >= population.len() {
        return Ok(());
    }

    let noise = Normal::new(0.0, mutation_std).map_err(|e| {
        TradegeneError::Configuration(format!("Invalid mutation_std {}: {}", mutation_std, e))
    })?;

    for _ in 0..n_mutations {
        let slot = rng.gen_range(protected..population.len());
        let role = TriggerRole::ALL[rng.gen_range(0..TriggerRole::ALL.len())];
        let position = rng.gen_range(0..CLAUSES_PER_TRIGGER);

        let clause = &mut population[slot].trigger_mut(role).clauses[position];
        clause.coefficient += noise.sample(rng);
        if rng.gen::<f64>() < field_redraw_probability {
            clause.field = fields.random(rng);
        }
    }

    Ok(())
}

fn negative_shift(fitnesses: &[f64]) -> f64 {
    let min = fitnesses.iter().copied().fold(f64::INFINITY, f64::min);
    if min < 0.0 {
        -min
    } else {
        0.0
    }
}

fn all_equal(fitnesses: &[f64]) -> bool {
    fitnesses.windows(2).all(|w| w[0] == w[1])
}
