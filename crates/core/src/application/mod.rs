// Application Layer - Use Cases and Business Logic

pub mod builder;
pub mod constants;
pub mod provider;
pub mod session;

// Re-exports
pub use builder::{
    builder_for, CandidatesWorkUnitBuilder, RealsWorkUnitBuilder, WorkUnitBuilder,
};
pub use provider::WorkUnitProvider;
pub use session::{Release, WorkloadSession};
