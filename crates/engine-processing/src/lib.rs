pub mod error;
pub mod reader;
pub mod retry;
pub mod sync;
pub mod transform;

#[cfg(test)]
mod tests;
