//! Handoff between the landmark transport and the per-tick update pass.

mod mailbox;

pub use mailbox::{Delivery, FrameMailbox, MailboxStats};
