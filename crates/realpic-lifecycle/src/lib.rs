//! RealPic Album Lifecycle
//!
//! Pure transition logic for album records, separated from the I/O that
//! carries it out:
//!
//! 1. **Decide**: [`decide`] validates an [`Action`] against the current
//!    [`Album`](realpic_album::Album) and yields a [`Decision`]
//! 2. **Settle**: for paid actions, [`settle`] turns the approved
//!    [`PaymentIntent`] into the [`AlbumPatch`](realpic_album::AlbumPatch) to write
//!
//! Status changes follow the table in [`transition`]:
//!
//! ```text
//! Active --(photos reach limit)--> ReadyToPrint
//! ReadyToPrint --(photo deleted below limit)--> Active
//! ReadyToPrint --(address submitted + payment)--> OnTheWay
//! OnTheWay --(operator)--> Arrived
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod action;
mod error;
mod fees;
mod machine;
pub mod transition;

pub use action::Action;
pub use error::LifecycleError;
pub use fees::FeeSchedule;
pub use machine::{decide, settle, Charge, Decision, GalleryAccess, PaymentIntent, Settlement};
pub use transition::{allowed_transitions, recompute_status, validate_transition};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
