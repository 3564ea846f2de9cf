//! Shared values used by fixtures so tests can log in as the users they insert.

/// Plain-text password of every user inserted through the fixtures.
pub static TEST_PASSWORD: &str = "correct-horse-battery";

/// Saudi mobile number accepted by the phone validation rules.
pub static TEST_PHONE_NUMBER: &str = "0512345678";

pub static TEST_REGION: &str = "riyadh";

pub static TEST_CITY: &str = "riyadh";
