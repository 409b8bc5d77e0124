pub mod delivery;
pub mod live_state;
pub mod match_state;
pub mod stats;

pub use delivery::{BallHistory, BallType, Delivery, DismissalType};
pub use live_state::{LiveState, MatchPhase};
pub use match_state::{Match, MatchFormat, MatchStatus, TeamScore, TeamSide};
pub use stats::{BattingStat, BowlingStat};
