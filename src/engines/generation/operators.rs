use crate::engines::generation::genome::{Gene, Genotype};
use rand::seq::index;
use rand::Rng;

/// Tournament selection: pick best of K random candidates
pub fn tournament_selection<'a, R: Rng>(
    population: &'a [(Genotype, f64)],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Genotype {
    let mut best_idx = rng.gen_range(0..population.len());
    let mut best_fitness = population[best_idx].1;

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        if population[idx].1 > best_fitness {
            best_idx = idx;
            best_fitness = population[idx].1;
        }
    }

    &population[best_idx].0
}

/// Roulette wheel selection: probability proportional to fitness
pub fn roulette_selection<'a, R: Rng>(
    population: &'a [(Genotype, f64)],
    rng: &mut R,
) -> &'a Genotype {
    let total_fitness: f64 = population.iter().map(|(_, f)| f.max(0.0)).sum();

    if total_fitness <= 0.0 {
        // Every layout was rejected, pick uniformly
        return &population[rng.gen_range(0..population.len())].0;
    }

    let mut spin = rng.gen::<f64>() * total_fitness;

    for (genotype, fitness) in population {
        spin -= fitness.max(0.0);
        if spin <= 0.0 {
            return genotype;
        }
    }

    // Fallback
    &population[population.len() - 1].0
}

/// Top `count` genotypes by fitness, best first. Ties keep population order.
pub fn select_elites(population: &[(Genotype, f64)], count: usize) -> Vec<Genotype> {
    let mut ranked: Vec<&(Genotype, f64)> = population.iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
        .into_iter()
        .take(count)
        .map(|(genotype, _)| genotype.clone())
        .collect()
}

/// Double-point crossover: swap the segment between two cut points
pub fn double_point_crossover<R: Rng>(
    parent1: &Genotype,
    parent2: &Genotype,
    rng: &mut R,
) -> (Genotype, Genotype) {
    let len = parent1.len();
    if len < 2 || parent2.len() != len {
        return (parent1.clone(), parent2.clone());
    }

    // Cut points are in 1..len so neither parent is swapped wholesale
    let (start, end) = if len == 2 {
        (1, len)
    } else {
        let cuts = index::sample(rng, len - 1, 2);
        let (a, b) = (cuts.index(0) + 1, cuts.index(1) + 1);
        (a.min(b), a.max(b))
    };

    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    child1.genes_mut()[start..end].copy_from_slice(&parent2.genes()[start..end]);
    child2.genes_mut()[start..end].copy_from_slice(&parent1.genes()[start..end]);

    (child1, child2)
}

/// Copy of `genotype` with each gene independently redrawn with `probability`
pub fn mutate<R: Rng>(
    genotype: &Genotype,
    width: usize,
    height: usize,
    probability: f64,
    rng: &mut R,
) -> Genotype {
    let mut child = genotype.clone();
    mutate_in_place(&mut child, width, height, probability, rng);
    child
}

pub fn mutate_in_place<R: Rng>(
    genotype: &mut Genotype,
    width: usize,
    height: usize,
    probability: f64,
    rng: &mut R,
) {
    if width == 0 || height == 0 {
        return;
    }
    for gene in genotype.genes_mut() {
        if rng.gen::<f64>() < probability {
            *gene = random_geometry(gene, width as i32, height as i32, rng);
        }
    }
}

/// New position anywhere on the map; the extent is a coin flip between a
/// rightward run that stays on the map and a downward (non-positive) run.
fn random_geometry<R: Rng>(gene: &Gene, width: i32, height: i32, rng: &mut R) -> Gene {
    let x = rng.gen_range(0..width);
    let y = rng.gen_range(0..height);
    let z = if rng.gen_bool(0.5) {
        rng.gen_range(0..width - x)
    } else {
        rng.gen_range(-(height - y)..=0)
    };
    gene.with_coords(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::GenotypeLayout;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn numbered(len: usize, offset: i32) -> Genotype {
        Genotype::new(
            (0..len)
                .map(|i| Gene::Corridor { x: i as i32 + offset, y: 0, length: 0 })
                .collect(),
        )
    }

    #[test]
    fn test_crossover_swaps_one_segment() {
        let mut rng = StdRng::seed_from_u64(7);
        let p1 = numbered(31, 0);
        let p2 = numbered(31, 100);

        for _ in 0..50 {
            let (c1, c2) = double_point_crossover(&p1, &p2, &mut rng);
            assert_eq!(c1.len(), 31);
            assert_eq!(c2.len(), 31);

            // Each position comes from one parent and the children are complementary
            for i in 0..31 {
                let from_p1 = c1.get(i) == p1.get(i);
                assert!(from_p1 || c1.get(i) == p2.get(i));
                assert_eq!(from_p1, c2.get(i) == p2.get(i));
            }
            // Genes at index 0 are never swapped
            assert_eq!(c1.get(0), p1.get(0));
        }
    }

    #[test]
    fn test_crossover_short_genotypes() {
        let mut rng = StdRng::seed_from_u64(1);
        let (c1, c2) = double_point_crossover(&numbered(2, 0), &numbered(2, 10), &mut rng);
        assert_eq!(c1, Genotype::new(vec![
            Gene::Corridor { x: 0, y: 0, length: 0 },
            Gene::Corridor { x: 11, y: 0, length: 0 },
        ]));
        assert_eq!(c2.get(1), Some(&Gene::Corridor { x: 1, y: 0, length: 0 }));

        let single = numbered(1, 0);
        let (c1, _) = double_point_crossover(&single, &numbered(1, 5), &mut rng);
        assert_eq!(c1, single);
    }

    #[test]
    fn test_mutation_bounds_and_tags() {
        let mut rng = StdRng::seed_from_u64(42);
        let layout = GenotypeLayout::default();
        let original = layout.blank();

        let mutated = mutate(&original, 20, 30, 1.0, &mut rng);
        assert_eq!(mutated.len(), original.len());
        assert!(layout.matches(&mutated));

        for gene in mutated.iter() {
            let (x, y, z) = gene.coords();
            assert!((0..20).contains(&x));
            assert!((0..30).contains(&y));
            assert!(z < 20 - x);
            assert!(z >= -(30 - y));
        }
    }

    #[test]
    fn test_zero_probability_is_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        let original = numbered(31, 0);
        assert_eq!(mutate(&original, 20, 20, 0.0, &mut rng), original);
    }

    #[test]
    fn test_select_elites() {
        let population = vec![
            (numbered(3, 0), 0.2),
            (numbered(3, 10), 0.9),
            (numbered(3, 20), 0.5),
        ];
        let elites = select_elites(&population, 2);
        assert_eq!(elites, vec![numbered(3, 10), numbered(3, 20)]);
    }

    #[test]
    fn test_roulette_with_all_rejected() {
        let mut rng = StdRng::seed_from_u64(9);
        let population = vec![(numbered(3, 0), 0.0), (numbered(3, 10), 0.0)];
        let picked = roulette_selection(&population, &mut rng);
        assert!(picked == &population[0].0 || picked == &population[1].0);
    }

    #[test]
    fn test_tournament_prefers_fitter() {
        let mut rng = StdRng::seed_from_u64(11);
        let population = vec![(numbered(3, 0), 0.1), (numbered(3, 10), 0.8)];
        let wins = (0..200)
            .filter(|_| tournament_selection(&population, 3, &mut rng) == &population[1].0)
            .count();
        assert!(wins > 150);
    }
}
