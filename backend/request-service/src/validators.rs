//! Input validation for client registration and password changes

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateEmail;

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MIN_CLIENT_AGE: i32 = 18;

static PASSWORD_SPECIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[@#$%&*!?/\\|_\-+=.]").expect("hardcoded special character regex is invalid")
});

static PASSWORD_FORBIDDEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[¨{}\[\]´`~^:;<>,“‘]").expect("hardcoded forbidden character regex is invalid")
});

static NAME_FORBIDDEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[@#$%&*!?/\\|_\-+=.¨{}\[\]´`~^:;<>,“‘\d]")
        .expect("hardcoded name regex is invalid")
});

pub fn validate_email(email: &str) -> bool {
    email.validate_email()
}

/// Validates password strength
/// Requirements:
/// - Minimum 6 characters
/// - At least one uppercase letter
/// - At least one number
/// - At least one special character from `@#$%&*!?/\|_-+=.`
/// - None of `¨{}[]´`~^:;<>,“‘`
///
/// On failure the message lists every unmet requirement.
pub fn validate_password(password: &str) -> Result<(), String> {
    let mut missing = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        missing.push("at least 6 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        missing.push("at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("at least one number");
    }
    if !PASSWORD_SPECIAL.is_match(password) {
        missing.push("a special character");
    }
    if PASSWORD_FORBIDDEN.is_match(password) {
        missing.push("no disallowed characters");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("Password must contain {}.", missing.join(", ")))
    }
}

/// Full name: at least two words, first word at least 2 characters, no digits or symbols
pub fn validate_full_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Full name is required.");
    }
    if NAME_FORBIDDEN.is_match(name) {
        return Err("Full name must not contain special characters or numbers.");
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() < 2 {
        return Err("Please enter at least two names.");
    }
    if words[0].chars().count() < 2 {
        return Err("First name must have at least 2 characters.");
    }
    Ok(())
}

/// Strip a CPF down to its 11 digits, rejecting anything that fails the check digits
pub fn normalize_cpf(cpf: &str) -> Option<String> {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return None;
    }

    let check_digit = |len: usize| -> u32 {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (len as u32 + 1 - i as u32))
            .sum();
        match (sum * 10) % 11 {
            10 => 0,
            r => r,
        }
    };

    if check_digit(9) != digits[9] || check_digit(10) != digits[10] {
        return None;
    }

    Some(digits.iter().map(|d| char::from_digit(*d, 10).unwrap_or('0')).collect())
}

/// Accepts `DD/MM/YYYY` (form input) or `YYYY-MM-DD`
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// Completed years between `birth` and `today`
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}
