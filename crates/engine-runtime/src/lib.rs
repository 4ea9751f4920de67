pub mod error;
pub mod factory;
pub mod runner;
pub mod scheduler;
pub mod trigger;

#[cfg(test)]
mod tests;
