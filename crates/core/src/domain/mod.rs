// Domain Layer - Pure business logic and entities

pub mod cursor;
pub mod data_collection;
pub mod error;
pub mod observation;
pub mod status;
pub mod vettable;
pub mod work_unit;

// Re-exports
pub use cursor::CursorCollection;
pub use data_collection::{DataCollection, SourceUnderReview};
pub use error::DomainError;
pub use observation::{ParsedData, Reading, Source, SysHeader};
pub use status::VettingStatus;
pub use vettable::VettableItem;
pub use work_unit::{WorkItem, WorkUnit, WorkUnitKind};
