mod engine;
mod renewal;
mod status;

pub use engine::*;
pub(crate) use status::RenewalFlag;
pub use status::GeneratorStatus;
