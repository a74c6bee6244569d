//! Entity records and their exported forms.

mod errors;
mod export;
mod record;

pub use errors::Errors;
pub use export::{Export, ExportOptions};
pub use record::Entity;
