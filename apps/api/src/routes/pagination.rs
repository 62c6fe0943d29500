use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const MAX_LIMIT: i64 = 100;
const MAX_PAGE: i64 = 10_000;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub total: i64,
}

impl PageParams {
    /// Returns `(page, limit, offset)` after range checks. Pages start at 1.
    pub fn resolve(&self, default_limit: i64) -> Result<(i64, i64, i64), AppError> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(default_limit);

        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        if !(1..=MAX_PAGE).contains(&page) {
            return Err(AppError::Validation(format!(
                "page must be between 1 and {MAX_PAGE}"
            )));
        }
        Ok((page, limit, (page - 1) * limit))
    }
}
