// Simulation Engine Module
// Monte Carlo game simulation from per-minute scoring rates and defensive ratings

pub mod random;
pub mod game;
pub mod aggregate;
pub mod live;
pub mod simulation_engine;

pub use random::{RandomSource, SequenceRandom};
pub use game::{break_tie, defense_factor, simulate_game, simulate_player_points, Matchup, RosterIndex, Side, REGULATION_MINUTES};
pub use aggregate::{run_multiple_simulations, run_multiple_simulations_parallel, AggregateResult, ScoreDistribution};
pub use live::{remaining_minutes, remaining_minutes_for_label, simulate_live_game, LiveWinProbability};
pub use simulation_engine::{ProgressSink, SimulationEngine};
