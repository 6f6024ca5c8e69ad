//! Helpers for classifying PostgreSQL errors.

/// Name of the unique constraint on `links.code`.
pub const LINKS_CODE_CONSTRAINT: &str = "links_code_key";

/// Returns true if `e` is a unique violation on the short code constraint.
///
/// Other unique violations are left to the generic database error path.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(LINKS_CODE_CONSTRAINT))
}
