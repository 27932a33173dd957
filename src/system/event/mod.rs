pub mod session_events;

pub use session_events::{SessionBus, SessionEvent, SessionSubscription};
