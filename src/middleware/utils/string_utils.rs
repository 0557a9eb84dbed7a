use crate::middleware::error::{AppError, AppResult};
use surrealdb::sql::Thing;

pub fn get_str_thing(value: &str) -> AppResult<Thing> {
    if value.is_empty() || !value.contains(":") {
        return Err(AppError::Generic {
            description: format!("{value} is not a record id"),
        });
    }
    Thing::try_from(value).map_err(|_| AppError::Generic {
        description: "error into Thing".to_string(),
    })
}

/// Accepts either a bare id (`abc`) or a full record id (`table:abc`) of `table`.
pub fn record_id(table: &str, value: &str) -> AppResult<Thing> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Generic {
            description: "Empty record id".to_string(),
        });
    }
    match value.split_once(":") {
        Some((tb, _)) => {
            let thing = get_str_thing(value)?;
            if tb != table {
                return Err(AppError::EntityFailIdNotFound {
                    ident: value.to_string(),
                });
            }
            Ok(thing)
        }
        None => Ok(Thing::from((table, value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_accepts_bare_and_full_ids() {
        let bare = record_id("task", "abc").unwrap();
        let full = record_id("task", "task:abc").unwrap();
        assert_eq!(bare, full);
        assert_eq!(full.id.to_raw(), "abc");
    }

    #[test]
    fn record_id_rejects_other_tables() {
        assert!(matches!(
            record_id("task", "rating:abc"),
            Err(AppError::EntityFailIdNotFound { .. })
        ));
        assert!(record_id("task", " ").is_err());
    }
}
