use crate::errors::{AppError, Result};
use regex::Regex;

pub struct Validator;

impl Validator {
    pub fn validate_email(email: &str) -> Result<()> {
        let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .map_err(|e| AppError::InternalError(format!("Regex error: {}", e)))?;

        if !email_regex.is_match(email) {
            return Err(AppError::ValidationError("Invalid email format".to_string()));
        }

        if email.len() > 254 {
            return Err(AppError::ValidationError("Email too long".to_string()));
        }

        Ok(())
    }

    pub fn validate_full_name(name: &str) -> Result<()> {
        let name = name.trim();
        if name.len() < 2 {
            return Err(AppError::ValidationError(
                "Name must be at least 2 characters long".to_string(),
            ));
        }
        if name.len() > 80 {
            return Err(AppError::ValidationError(
                "Name must be less than 80 characters".to_string(),
            ));
        }
        let name_regex = Regex::new(r"^[a-zA-ZÀ-ÿ' .-]+$")
            .map_err(|e| AppError::InternalError(format!("Regex error: {}", e)))?;
        if !name_regex.is_match(name) {
            return Err(AppError::ValidationError(
                "Name can only contain letters, spaces, apostrophes, and hyphens".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_password(password: &str) -> Result<()> {
        if password.len() < 8 {
            return Err(AppError::ValidationError(
                "Password must be at least 8 characters long".to_string(),
            ));
        }

        if password.len() > 128 {
            return Err(AppError::ValidationError(
                "Password must be less than 128 characters".to_string(),
            ));
        }

        let has_uppercase = password.chars().any(|c| c.is_uppercase());
        let has_lowercase = password.chars().any(|c| c.is_lowercase());
        let has_digit = password.chars().any(|c| c.is_numeric());

        if !has_uppercase {
            return Err(AppError::ValidationError(
                "Password must contain at least one uppercase letter".to_string(),
            ));
        }

        if !has_lowercase {
            return Err(AppError::ValidationError(
                "Password must contain at least one lowercase letter".to_string(),
            ));
        }

        if !has_digit {
            return Err(AppError::ValidationError(
                "Password must contain at least one digit".to_string(),
            ));
        }

        Ok(())
    }

    pub fn validate_phone(phone: &str) -> Result<()> {
        let phone = phone.trim();
        // E.164: +[country][number], or fallback to 8-15 digits
        let phone_regex = Regex::new(r"^(\+\d{8,15}|\d{8,15})$")
            .map_err(|e| AppError::InternalError(format!("Regex error: {}", e)))?;
        if !phone_regex.is_match(phone) {
            return Err(AppError::ValidationError(
                "Invalid phone number format. Use +countrycode and 8-15 digits.".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_city(city: &str) -> Result<()> {
        let city = city.trim();
        if city.is_empty() {
            return Err(AppError::ValidationError("City cannot be empty".to_string()));
        }
        if city.len() > 60 {
            return Err(AppError::ValidationError(
                "City must be less than 60 characters".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_listing_title(title: &str) -> Result<()> {
        let title = title.trim();
        if title.len() < 5 {
            return Err(AppError::ValidationError(
                "Title must be at least 5 characters long".to_string(),
            ));
        }
        if title.len() > 100 {
            return Err(AppError::ValidationError(
                "Title must be less than 100 characters".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_rent(rent: f64) -> Result<()> {
        if !rent.is_finite() || rent <= 0.0 {
            return Err(AppError::ValidationError(
                "Monthly rent must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_deposit(deposit: f64) -> Result<()> {
        if !deposit.is_finite() || deposit < 0.0 {
            return Err(AppError::ValidationError(
                "Security deposit cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_emails() {
        assert!(Validator::validate_email("student@uni.edu").is_ok());
        assert!(Validator::validate_email("not-an-email").is_err());
        assert!(Validator::validate_email("a@b").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(Validator::validate_password("Str0ngpass").is_ok());
        assert!(Validator::validate_password("short1A").is_err());
        assert!(Validator::validate_password("alllowercase1").is_err());
        assert!(Validator::validate_password("ALLUPPERCASE1").is_err());
        assert!(Validator::validate_password("NoDigitsHere").is_err());
    }

    #[test]
    fn listing_fields() {
        assert!(Validator::validate_listing_title("Sunny room near campus").is_ok());
        assert!(Validator::validate_listing_title("Flat").is_err());
        assert!(Validator::validate_rent(450.0).is_ok());
        assert!(Validator::validate_rent(0.0).is_err());
        assert!(Validator::validate_rent(-10.0).is_err());
        assert!(Validator::validate_deposit(0.0).is_ok());
        assert!(Validator::validate_deposit(-1.0).is_err());
    }
}
