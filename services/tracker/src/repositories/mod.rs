//! Repositories for the tracker tables
//!
//! Every function takes a `&mut SqliteConnection` so the services can run
//! several of them inside one transaction.

pub mod assignments;
pub mod bugs;
pub mod users;

pub use bugs::BugFilter;
pub use users::UserSortKey;

/// Escape `%`, `_` and `\` so `value` matches literally inside a
/// `LIKE ... ESCAPE '\'` pattern
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("login"), "login");
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
    }
}
