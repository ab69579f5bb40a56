pub mod visit;

pub use visit::{NewVisit, RecordVisitRequest, VisitEvent};
