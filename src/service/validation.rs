//! Input validation, run before any store call.

use crate::error::AppError;
use crate::model::{NewOwner, NewPet, OwnerChanges, PetChanges};
use regex::Regex;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

pub struct RequestValidator;

impl RequestValidator {
    pub fn new_owner(input: &NewOwner) -> Result<(), AppError> {
        required_text("name", &input.name)?;
        if let Some(email) = &input.email {
            email_format("email", email)?;
        }
        Ok(())
    }

    /// Only the fields present are checked.
    pub fn owner_changes(changes: &OwnerChanges) -> Result<(), AppError> {
        if let Some(name) = &changes.name {
            required_text("name", name)?;
        }
        if let Some(Some(email)) = &changes.email {
            email_format("email", email)?;
        }
        Ok(())
    }

    pub fn new_pet(input: &NewPet) -> Result<(), AppError> {
        required_text("name", &input.name)?;
        required_text("species", &input.species)?;
        if let Some(age) = input.age {
            minimum("age", age, 0)?;
        }
        Ok(())
    }

    pub fn pet_changes(changes: &PetChanges) -> Result<(), AppError> {
        if let Some(name) = &changes.name {
            required_text("name", name)?;
        }
        if let Some(species) = &changes.species {
            required_text("species", species)?;
        }
        if let Some(Some(age)) = changes.age {
            minimum("age", age, 0)?;
        }
        Ok(())
    }
}

fn required_text(field: &str, v: &str) -> Result<(), AppError> {
    if v.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be blank", field)));
    }
    Ok(())
}

fn email_format(field: &str, v: &str) -> Result<(), AppError> {
    let re = Regex::new(EMAIL_PATTERN).map_err(|_| AppError::Internal("invalid email pattern"))?;
    if !re.is_match(v) {
        return Err(AppError::Validation(format!("{} must be a valid email", field)));
    }
    Ok(())
}

fn minimum(field: &str, v: i32, min: i32) -> Result<(), AppError> {
    if v < min {
        return Err(AppError::Validation(format!("{} must be at least {}", field, min)));
    }
    Ok(())
}
