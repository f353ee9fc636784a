#[allow(clippy::module_inception)]
mod layout;
mod options;
#[cfg(test)]
mod tests;

pub use layout::*;
pub use options::*;
