//! Coaching Command Handlers
//!
//! ## Commands
//! - `GetAdvice` - Decide whether to surface a coaching intervention for a
//!   window of conversation

mod get_advice;

pub use get_advice::{AdviceError, AdviceOutcome, GetAdviceCommand, GetAdviceHandler};
