use serde::{Deserialize, Serialize};

use crate::data::domain::Quantity;

/// Fixed-shape account snapshot attached to every executed step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub net_worth: f64,
    pub cash_balance: f64,
    pub position_size: Quantity,
}
