pub mod action;
pub mod action_space;
pub mod config;
pub mod env;
pub mod ledger;
pub mod observation;
pub mod state;
pub mod types;
