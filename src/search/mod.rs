pub mod form;
pub mod session;

pub use form::{EXAMPLE_SEARCHES, FormField, SearchForm, ValidationError};
pub use session::{RecentSearch, SessionState};
