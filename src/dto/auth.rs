use crate::domain;
use serde::Deserialize;
use validator::Validate;

/// Body of the sign-in form
#[derive(Deserialize, Validate)]
#[cfg_attr(test, derive(serde::Serialize))]
pub struct LoginSubmission {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl From<LoginSubmission> for domain::session::Credentials {
    fn from(value: LoginSubmission) -> Self {
        domain::session::Credentials {
            email: value.email,
            password: value.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_login_data_gets_rejected() {
        let bad_login = LoginSubmission {
            email: "not-an-email".to_owned(),
            password: String::new(),
        };
        let validation_result = bad_login.validate();
        assert!(validation_result.is_err());
        let validation_errors = validation_result.unwrap_err();
        let field_validations = validation_errors.field_errors();
        assert!(field_validations.contains_key("email"));
        assert!(field_validations.contains_key("password"));
    }

    #[test]
    fn good_login_data_passes() {
        let login = LoginSubmission {
            email: "me@example.com".to_owned(),
            password: "hunter2".to_owned(),
        };
        assert!(login.validate().is_ok());
    }
}
