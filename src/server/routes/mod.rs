mod categories;
mod questions;
mod quizzes;

pub use super::error::{ApiError, ApiResponse};
pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quiz_router;
