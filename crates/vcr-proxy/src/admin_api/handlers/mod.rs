pub mod mode;
pub mod recordings;
pub mod stats;
pub mod system;
