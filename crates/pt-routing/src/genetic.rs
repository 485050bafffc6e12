//! Genetic refinement of a finished tour.
//!
//! - **Population**: the input tour plus `population - 1` copies with one
//!   random interior swap each.
//! - **Selection**: each generation keeps the `elite` cheapest tours as-is
//!   and fills the rest with children of two distinct parents drawn from the
//!   `parent_pool` cheapest.
//! - **Crossover**: order crossover.  A contiguous interior slice is copied
//!   from the first parent; the remaining interior slots are filled with the
//!   second parent's pickups in their order, skipping those already placed.
//! - **Mutation**: with probability `mutation_rate`, swap two interior
//!   positions.
//!
//! The depot stays at both ends of every individual, and elitism means the
//! result is never worse than the input.

use pt_core::StreamRng;

use crate::matrix::DistanceMatrix;
use crate::tour::{Tour, DEPOT};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeneticParams {
    pub population:    usize,
    pub generations:   usize,
    pub mutation_rate: f64,
    pub elite:         usize,
    pub parent_pool:   usize,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population:    20,
            generations:   30,
            mutation_rate: 0.1,
            elite:         5,
            parent_pool:   10,
        }
    }
}

struct Individual {
    order: Vec<usize>,
    cost:  f64,
}

pub fn genetic_refine(
    tour: &Tour,
    m: &DistanceMatrix,
    params: GeneticParams,
    rng: &mut StreamRng,
) -> Tour {
    let n = tour.len();
    // Crossover and mutation both need two interior positions.
    if n < 4 || params.population < 2 {
        return tour.clone();
    }
    let interior = 1..n - 1;

    let eval = |order: Vec<usize>| Individual { cost: m.path_cost(&order), order };

    let mut population: Vec<Individual> = Vec::with_capacity(params.population);
    population.push(eval(tour.as_slice().to_vec()));
    while population.len() < params.population {
        let mut order = tour.as_slice().to_vec();
        let (i, j) = rng.distinct_pair(interior.clone());
        order.swap(i, j);
        population.push(eval(order));
    }

    let elite = params.elite.clamp(1, params.population);
    for _ in 0..params.generations {
        // Stable: equal-cost individuals keep their order.
        population.sort_by(|a, b| a.cost.total_cmp(&b.cost));

        let pool = params.parent_pool.clamp(2, population.len());
        let mut next: Vec<Individual> = population.drain(..elite).collect();
        while next.len() < params.population {
            let (pa, pb) = rng.distinct_pair(0..pool);
            let (p1, p2) = if rng.gen_bool(0.5) { (pa, pb) } else { (pb, pa) };
            let child = breed(
                parent(&next, &population, elite, p1),
                parent(&next, &population, elite, p2),
                params.mutation_rate,
                rng,
            );
            next.push(eval(child));
        }
        population = next;
    }

    population.sort_by(|a, b| a.cost.total_cmp(&b.cost));
    match population.into_iter().next() {
        Some(best) => Tour::from_vec(best.order),
        None => tour.clone(),
    }
}

/// Rank `r` of the sorted previous generation, which was split into the
/// kept elite (`next[..elite]`) and the rest (`rest`).
fn parent<'a>(next: &'a [Individual], rest: &'a [Individual], elite: usize, r: usize) -> &'a [usize] {
    if r < elite { &next[r].order } else { &rest[r - elite].order }
}

/// One child: order crossover of `p1` and `p2`, then with probability
/// `mutation_rate` a swap of two interior positions.
pub(crate) fn breed(p1: &[usize], p2: &[usize], mutation_rate: f64, rng: &mut StreamRng) -> Vec<usize> {
    let mut child = order_crossover(p1, p2, rng);
    if rng.gen_bool(mutation_rate) {
        let (i, j) = rng.distinct_pair(1..child.len() - 1);
        child.swap(i, j);
    }
    child
}

/// Order crossover restricted to interior positions.
pub(crate) fn order_crossover(p1: &[usize], p2: &[usize], rng: &mut StreamRng) -> Vec<usize> {
    let n = p1.len();
    let (a, b) = rng.distinct_pair(1..n - 1);

    let mut child = vec![usize::MAX; n];
    let mut placed = vec![false; n];
    child[0] = DEPOT;
    child[n - 1] = DEPOT;
    for pos in a..b {
        child[pos] = p1[pos];
        placed[p1[pos]] = true;
    }

    let mut fill = p2[1..n - 1].iter().copied().filter(|&x| !placed[x]);
    for pos in (1..n - 1).filter(|p| !(a..b).contains(p)) {
        if let Some(x) = fill.next() {
            child[pos] = x;
        }
    }
    child
}
