//! Authentication module: request extractors for human and machine
//! principals.

mod extractor;

pub use extractor::{ApiKeyAuth, CurrentUser};
