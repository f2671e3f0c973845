pub mod ledger;
pub mod portfolio;
pub mod reconcile;
pub mod risk;
pub mod schedule;
