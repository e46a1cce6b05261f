pub mod error;
pub mod health;
pub mod peoples;

pub use error::AppError;
