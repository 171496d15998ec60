pub mod error;
pub mod series;
pub mod stats;
pub mod traits;
pub mod types;

pub use error::*;
pub use traits::*;
pub use types::*;
