pub mod cell;
pub mod errors;
pub mod log;
pub mod records;
pub mod render;

pub use cell::{CellId, CellRef, CircularCell, Collection, Iter, Link};
pub use errors::{Capability, CellError, RecordError};
