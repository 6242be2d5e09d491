//! Service layer: note fan-out and the score library.

pub mod broadcaster;
pub mod score_store;

pub use broadcaster::{Broadcaster, DeliveryReport};
pub use score_store::{ScoreStore, ScoreSummary};
