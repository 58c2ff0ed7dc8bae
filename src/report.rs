pub mod io;
pub mod leaderboard;
pub mod markdown;
pub mod performance;
pub mod summary;
