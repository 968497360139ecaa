pub mod caller;
pub mod identity;
pub mod policy;

pub use caller::Caller;
