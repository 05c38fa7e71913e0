//! Warden Tickets - capability tickets for the warden filesystem.
//!
//! This crate provides:
//! - [`Ticket`]: privilege level, per-group verb grants, accessible folders
//! - [`ZoneRules`]: the level each region of the namespace requires
//! - [`TicketEvaluator`]: the permission decision with a reason on refusal
//! - [`TicketAuthority`]: the evaluator plugged into a [`warden_vfs::Vfs`]
//!
//! # Example
//!
//! ```
//! use warden_core::VfsPath;
//! use warden_tickets::{Level, Ticket, TicketEvaluator, ZoneRules};
//!
//! let ticket = Ticket::builder(Level::User)
//!     .allow("file", "read")
//!     .folder("/users/alice")
//!     .build();
//! let evaluator = TicketEvaluator::new(ZoneRules::for_user("alice"));
//!
//! let own = VfsPath::parse("/users/alice/doc.txt");
//! let other = VfsPath::parse("/users/bob/doc.txt");
//! assert!(evaluator.is_allowed(&ticket, "file/read", Some(&own)));
//! assert!(!evaluator.is_allowed(&ticket, "file/read", Some(&other)));
//! assert!(!evaluator.is_allowed(&ticket, "file/write", Some(&own)));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod authority;
mod error;
mod evaluator;
mod ticket;
mod zone;

pub use authority::TicketAuthority;
pub use error::{TicketError, TicketResult};
pub use evaluator::TicketEvaluator;
pub use ticket::{Level, Ticket, TicketBuilder};
pub use zone::{Zone, ZoneRules};
