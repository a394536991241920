//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Returns the content hash for app.js.
///
/// Usage in templates: `{{ ""|js_hash }}`
#[askama::filter_fn]
pub fn js_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("JS_HASH"))
}

/// Formats a `YYYY-MM-DD` date as e.g. `Sat 28 Feb 2026`.
///
/// Anything that does not parse as a date is rendered unchanged.
///
/// Usage in templates: `{{ list.list_date|long_date }}`
#[askama::filter_fn]
pub fn long_date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    Ok(chrono::NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_or(raw, |d| d.format("%a %-d %b %Y").to_string()))
}

/// Human-readable text for a toast code from `?error=` / `?success=`.
///
/// Usage in templates: `{{ code|toast_message }}`
#[askama::filter_fn]
pub fn toast_message(code: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(message_for(&code.to_string()))
}

fn message_for(code: &str) -> &'static str {
    match code {
        // Auth
        "invalid_credentials" => "Wrong email or password.",
        "invalid_email" => "That email address doesn't look right.",
        "email_taken" => "An account with this email already exists.",
        "weak_password" => "Passwords need at least 8 characters.",
        "password_mismatch" => "The passwords don't match.",
        "invalid_name" => "Names can be at most 100 characters.",
        "session" => "Couldn't start your session. Please try again.",
        "registered" => "Welcome! Your account is ready.",
        "logged_out" => "You have been logged out.",
        // Lists
        "list_closed" => "That list is completed and can't be changed.",
        "invalid_input" => "Please check what you entered.",
        "invalid_price" => "Prices must be a number like 2.49 or 2,49.",
        "invalid_quantity" => "Quantities must be a number greater than zero.",
        "item_saved" => "Item saved.",
        "item_deleted" => "Item removed.",
        "list_finished" => "List completed. Unpriced items moved to your new list.",
        "list_deleted" => "List deleted.",
        // History
        "invalid_snapshot" => "That file isn't a Basket history export.",
        "import_too_large" => "That file is too large to import.",
        "missing_file" => "Choose a file to import.",
        "imported" => "History imported.",
        "imported_partial" => "History imported. Some lists could not be read and were skipped.",
        // Sharing
        "unknown_user" => "No account uses that email.",
        "self_share" => "You can't share with yourself.",
        "shared" => "Your lists are now shared.",
        "revoked" => "Access removed.",
        // Admin
        "category_saved" => "Category saved.",
        "category_deleted" => "Category deleted.",
        "category_exists" => "A category with that name already exists.",
        "reclassified" => "Uncategorized products were reclassified.",
        // Generic
        "forbidden" => "You don't have access to that.",
        "not_found" => "That no longer exists.",
        _ => "Something went wrong. Please try again.",
    }
}
