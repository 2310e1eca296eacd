pub mod config;
pub mod event;
pub mod signup;
pub mod squad;
