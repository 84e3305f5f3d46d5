pub mod clock;
pub mod compute;
pub mod config;
pub mod entities;
pub mod factory;
pub mod input;
pub mod session;
pub mod snapshot;
