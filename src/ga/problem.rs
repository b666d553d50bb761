//! Season scheduling as a GA problem.
//!
//! Binds the grid operators to a season: every individual it hands out has
//! been repaired and evaluated.

use rand::Rng;

use super::chromosome::Individual;
use super::operators::{row_cut_crossover, swap_mutation};
use crate::evaluation::RuleSet;
use crate::models::{Schedule, SeasonInstance};
use crate::repair::ScheduleRepairer;

/// GA problem definition for one season and rule set.
#[derive(Debug, Clone)]
pub struct SeasonProblem<'a> {
    repairer: ScheduleRepairer<'a>,
    rules: &'a RuleSet,
}

impl<'a> SeasonProblem<'a> {
    /// Creates a problem over `season` scored by `rules`.
    pub fn new(season: &'a SeasonInstance, rules: &'a RuleSet) -> Self {
        Self {
            repairer: ScheduleRepairer::new(season),
            rules,
        }
    }

    /// The season being scheduled.
    pub fn season(&self) -> &'a SeasonInstance {
        self.repairer.season()
    }

    /// The rule set scoring individuals.
    pub fn rules(&self) -> &'a RuleSet {
        self.rules
    }

    /// Fitness of a schedule.
    pub fn evaluate(&self, schedule: &Schedule) -> i64 {
        self.rules.fitness(self.season(), schedule)
    }

    /// A random, repaired and evaluated individual.
    pub fn create_individual<R: Rng>(&self, rng: &mut R) -> Individual {
        let schedule = self.repairer.random_schedule(rng);
        let fitness = self.evaluate(&schedule);
        Individual::new(schedule, fitness)
    }

    /// Row-cut crossover followed by full repair of both children.
    pub fn crossover<R: Rng>(&self, p1: &Individual, p2: &Individual, rng: &mut R) -> [Schedule; 2] {
        let (mut c1, mut c2) = row_cut_crossover(&p1.schedule, &p2.schedule, rng);
        self.repairer.repair(&mut c1);
        self.repairer.repair(&mut c2);
        [c1, c2]
    }

    /// Swap mutation followed by a repair starting at the mutated team.
    pub fn mutate<R: Rng>(&self, schedule: &mut Schedule, rng: &mut R) {
        let team = swap_mutation(schedule, rng);
        self.repairer.repair_from_team(schedule, team);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Rule;
    use crate::models::season::tests::round_robin_season;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_created_individuals_are_scored() {
        let season = round_robin_season(6);
        let rules = RuleSet::standard(&season);
        let problem = SeasonProblem::new(&season, &rules);
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..5 {
            let ind = problem.create_individual(&mut rng);
            assert_eq!(ind.fitness, rules.fitness(&season, &ind.schedule));
            assert!(ind.fitness <= rules.max_eval());
            assert!(ind.fitness >= 0);
        }
    }

    #[test]
    fn test_offspring_keep_row_contents() {
        let season = round_robin_season(6);
        let rules = RuleSet::new(&season, vec![Rule::WellFormed]).unwrap();
        let problem = SeasonProblem::new(&season, &rules);
        let mut rng = SmallRng::seed_from_u64(8);
        let p1 = problem.create_individual(&mut rng);
        let p2 = problem.create_individual(&mut rng);

        let [mut c1, c2] = problem.crossover(&p1, &p2, &mut rng);
        problem.mutate(&mut c1, &mut rng);

        for child in [&c1, &c2] {
            for team in season.teams() {
                let mut row: Vec<usize> = child.row(team.id).iter().map(|c| c.fixture).collect();
                row.sort_unstable();
                let mut expected = team.fixture_ids.clone();
                expected.push(season.bye());
                expected.sort_unstable();
                assert_eq!(row, expected);
            }
        }
    }
}
