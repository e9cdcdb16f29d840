pub mod captcha_solver;
pub mod diff;
pub mod notifier;
pub mod page_parser;
pub mod query_session;
pub mod state_store;

pub use captcha_solver::{CaptchaSolver, LengthHint, PLATE_CAPTCHA_LENGTH};
pub use diff::new_plates;
pub use notifier::NotificationSink;
pub use query_session::{AttemptOutcome, QueryAttempt, QuerySession};
pub use state_store::{JsonFileStore, StateStore};
