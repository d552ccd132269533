//! HTML page rendering for the survey forms and record list.

pub mod engine;

pub use engine::{render_page, TemplateError};

use crate::core::error::AppError;

impl From<TemplateError> for AppError {
    fn from(e: TemplateError) -> Self {
        AppError::Internal(e.to_string())
    }
}
