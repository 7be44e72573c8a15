pub mod session;

pub use session::{AuthoringSession, SessionState};
