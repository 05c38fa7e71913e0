//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_tickets::prelude::*;` to import all essential types.

// Errors
pub use crate::{TicketError, TicketResult};

// Tickets
pub use crate::{Level, Ticket, TicketBuilder};

// Evaluation
pub use crate::{TicketAuthority, TicketEvaluator, Zone, ZoneRules};
