//! Postgres persistence for the complaint kernel: complaint records and
//! their state machine, the vote ledger, the action ledger, and discussion
//! comments.

pub mod actions;
pub mod comments;
pub mod complaints;
pub mod votes;

pub use actions::ActionLedger;
pub use complaints::{ComplaintFilter, ComplaintStore};
pub use votes::VoteLedger;
