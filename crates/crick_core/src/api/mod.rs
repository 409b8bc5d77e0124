pub mod payloads;

pub use payloads::{
    CompleteMatchRequest, DeliveryPayload, LiveStateUpdate, MatchSnapshot, RecordBallRequest,
    ScoreSection, ScoreUpdate, StartSecondInningsRequest,
};
