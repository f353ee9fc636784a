mod func;
mod interface;
mod memory;
#[cfg(feature = "mysql")]
mod mysql;

pub use func::*;
pub use interface::*;
pub use memory::*;
#[cfg_attr(docsrs, doc(cfg(feature = "mysql")))]
#[cfg(feature = "mysql")]
pub use mysql::*;
