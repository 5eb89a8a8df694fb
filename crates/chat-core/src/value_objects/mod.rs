//! Value objects - immutable types that represent domain concepts

mod color;
mod row_id;

pub use color::{InvalidColor, MessageColor};
pub use row_id::{RowId, RowIdParseError};
