//! Application services for the subway network.
//!
//! Each operation resolves identifiers through the repository, applies the
//! change to the domain model and writes the result back. Mutations hold the
//! repository's write lock for the whole cycle, so concurrent edits to a line
//! are serialized and readers never observe a half-rewritten section set.

mod error;
mod subway;

pub use error::{ErrorKind, ServiceError};
pub use subway::{FareQuote, NewLine, NewSection, SubwayService};
