//! contactid-errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: self.problem_type().to_string(),
            title: self.problem_title().to_string(),
            status: self.status_code(),
            detail: self.to_string(),
            instance: None,
        }
    }

    fn problem_type(&self) -> &'static str {
        match self {
            Self::Validation(_) => "/problems/validation",
            Self::Internal(_) => "/problems/internal",
        }
    }

    fn problem_title(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation Error",
            Self::Internal(_) => "Internal Server Error",
        }
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::validation("bad").status_code(), 400);
        assert_eq!(AppError::internal("boom").status_code(), 500);
    }

    #[test]
    fn test_problem_details_serialization() {
        let problem = AppError::validation("Email address is empty").to_problem_details();
        let json = serde_json::to_value(&problem).unwrap();

        assert_eq!(json["type"], "/problems/validation");
        assert_eq!(json["title"], "Validation Error");
        assert_eq!(json["status"], 400);
        assert_eq!(json["detail"], "Validation error: Email address is empty");
        assert!(json.get("instance").is_none());
    }
}
