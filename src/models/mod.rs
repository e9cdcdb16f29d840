pub mod plate;
pub mod query_form;

pub use plate::{Plate, ResultSet};
pub use query_form::{QueryForm, StationProfile};
