//! 领域错误到应用错误的转换

use contactid_errors::AppError;

use crate::email::EmailAddressError;
use crate::phone::PhoneNumberError;

impl From<EmailAddressError> for AppError {
    fn from(err: EmailAddressError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<PhoneNumberError> for AppError {
    fn from(err: PhoneNumberError) -> Self {
        AppError::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::EmailAddress;

    #[test]
    fn test_email_error_is_validation() {
        let err: AppError = EmailAddress::from_string("noat").unwrap_err().into();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_string(),
            "Validation error: Email address is malformed: missing '@'"
        );
    }

    #[test]
    fn test_phone_error_problem_details() {
        let err: AppError = crate::phone::PhoneNumber::from_string("not a number")
            .unwrap_err()
            .into();
        let problem = err.to_problem_details();
        assert_eq!(problem.status, 400);
        assert_eq!(problem.title, "Validation Error");
        assert!(problem.detail.starts_with("Validation error: Failed to parse phone number"));
    }
}
