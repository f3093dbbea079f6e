pub mod allocation;
pub mod goals;
pub mod retirement;
