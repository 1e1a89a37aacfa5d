//! Search configuration.

use std::time::Duration;

/// Each determinization gets at least this many iterations, regardless of
/// how thin the overall budget is spread.
pub const MIN_ITERATIONS_PER_DETERMINIZATION: u32 = 10;

/// How per-world action statistics are combined into a single decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    /// Pick the action with the most visits summed across worlds. Robust
    /// against a single optimistic world.
    #[default]
    Sum,
    /// Pick the action with the best mean reward across worlds.
    Average,
}

/// Configuration for a single-tree MCTS search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Maximum number of search iterations.
    pub iterations: u32,

    /// Wall-clock budget. `Duration::ZERO` means unbounded.
    pub time_limit: Duration,

    /// UCB1 exploration constant.
    pub exploration: f64,

    /// Maximum number of actions applied during one rollout.
    pub rollout_depth: u32,

    /// Reshuffle hidden zones into a random consistent world before
    /// searching. Disable when the caller already determinized.
    pub determinize: bool,

    /// Bias expansion order toward high-impact action categories.
    pub move_ordering: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            time_limit: Duration::ZERO,
            exploration: std::f64::consts::SQRT_2,
            rollout_depth: 20,
            determinize: true,
            move_ordering: false,
        }
    }
}

impl MctsConfig {
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_rollout_depth(mut self, rollout_depth: u32) -> Self {
        self.rollout_depth = rollout_depth;
        self
    }

    pub fn with_determinize(mut self, determinize: bool) -> Self {
        self.determinize = determinize;
        self
    }

    pub fn with_move_ordering(mut self, move_ordering: bool) -> Self {
        self.move_ordering = move_ordering;
        self
    }

    /// Fast config for unit tests.
    pub fn for_testing() -> Self {
        Self::default().with_iterations(50).with_rollout_depth(10)
    }
}

/// Configuration for an information-set search across determinized worlds.
#[derive(Debug, Clone)]
pub struct IsmctsConfig {
    /// Number of determinized worlds to search.
    pub determinizations: u32,

    /// Total iteration budget, split evenly across worlds.
    pub iterations: u32,

    /// Wall-clock budget for the whole search. `Duration::ZERO` means
    /// unbounded.
    pub time_limit: Duration,

    pub exploration: f64,
    pub rollout_depth: u32,
    pub move_ordering: bool,

    /// How per-world statistics are folded into the final choice.
    pub aggregation: Aggregation,
}

impl Default for IsmctsConfig {
    fn default() -> Self {
        Self {
            determinizations: 8,
            iterations: 1000,
            time_limit: Duration::ZERO,
            exploration: std::f64::consts::SQRT_2,
            rollout_depth: 20,
            move_ordering: true,
            aggregation: Aggregation::Sum,
        }
    }
}

impl IsmctsConfig {
    pub fn with_determinizations(mut self, determinizations: u32) -> Self {
        self.determinizations = determinizations.max(1);
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Iterations each world receives, never below the per-world floor.
    pub fn iterations_per_determinization(&self) -> u32 {
        (self.iterations / self.determinizations.max(1)).max(MIN_ITERATIONS_PER_DETERMINIZATION)
    }

    /// Fast config for unit tests.
    pub fn for_testing() -> Self {
        Self::default().with_determinizations(3).with_iterations(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MctsConfig::default();
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.time_limit, Duration::ZERO);
        assert!(config.determinize);
        assert!(!config.move_ordering);

        let ismcts = IsmctsConfig::default();
        assert_eq!(ismcts.determinizations, 8);
        assert_eq!(ismcts.aggregation, Aggregation::Sum);
        assert!(ismcts.move_ordering);
    }

    #[test]
    fn test_budget_split_has_floor() {
        let config = IsmctsConfig::default()
            .with_determinizations(8)
            .with_iterations(16);
        // 16 / 8 = 2, below the floor of 10.
        assert_eq!(config.iterations_per_determinization(), 10);

        let config = config.with_iterations(800);
        assert_eq!(config.iterations_per_determinization(), 100);
    }

    #[test]
    fn test_builders_chain() {
        let config = MctsConfig::default()
            .with_iterations(200)
            .with_exploration(0.7)
            .with_determinize(false);
        assert_eq!(config.iterations, 200);
        assert_eq!(config.exploration, 0.7);
        assert!(!config.determinize);
    }
}
