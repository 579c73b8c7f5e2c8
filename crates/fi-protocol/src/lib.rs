pub mod client;
pub mod clock;
pub mod compliance;
pub mod inspection;
pub mod job;

pub use client::*;
pub use clock::*;
pub use compliance::*;
pub use inspection::*;
pub use job::*;
