//! Customer form validation
//!
//! Runs before any network call. Fields are checked in form order (name,
//! phone, room) and the first failure is reported.

use crate::error::{CustomerField, KioskError};
use crate::types::{Customer, CustomerInput};

/// Validate raw form input into a [`Customer`]
///
/// Values are trimmed. The name must be ASCII letters and spaces, the phone
/// exactly ten ASCII digits, the room non-empty.
///
/// # Errors
///
/// Returns [`KioskError::Validation`] naming the first offending field.
pub fn validate_customer(input: &CustomerInput) -> Result<Customer, KioskError> {
    let name = input.name.trim();
    let phone = input.phone.trim();
    let room = input.room.trim();

    if name.is_empty() {
        return Err(KioskError::validation(CustomerField::Name, "Enter your name"));
    }
    if !name.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace()) {
        return Err(KioskError::validation(
            CustomerField::Name,
            "Name must contain only letters",
        ));
    }
    if phone.len() != 10 || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KioskError::validation(
            CustomerField::Phone,
            "Phone must be exactly 10 digits",
        ));
    }
    if room.is_empty() {
        return Err(KioskError::validation(CustomerField::Room, "Enter your room number"));
    }

    Ok(Customer {
        name: name.to_string(),
        phone: phone.to_string(),
        room: room.to_string(),
    })
}
