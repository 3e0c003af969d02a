//! Page widgets re-initialized after every content swap.

mod library;
mod viewer;

pub use library::CaseLibrary;
pub use viewer::{CaseError, CaseRequest, CaseViewer, ViewerOutcome};
