pub mod config;
pub mod demo_feed;
pub mod engine;
pub mod intensity;
pub mod scoreline;
pub mod signals;
pub mod snapshot;
pub mod staking;
pub mod state;
pub mod trend;
