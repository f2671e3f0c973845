//! Rent and utility ledger reconciliation core.
//!
//! Given property charge schedules, tenant occupancy windows, and an
//! append-only stream of payment records, this crate derives outstanding
//! balances, next-due dates, overdue risk, and portfolio-wide financial
//! aggregates. Everything is a pure function over snapshots the host
//! application supplies; persistence, transport, and rendering live with the
//! host.

pub mod error;
pub mod ingest;
pub mod schemas;
pub mod services;
