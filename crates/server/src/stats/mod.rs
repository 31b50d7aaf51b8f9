mod rankings;
mod store;

pub use rankings::RankingBoard;
pub use store::{StatsError, StatsService};
