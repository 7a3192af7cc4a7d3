use crate::{
    db::{
        error::{DbError, DbResult},
        query::{EntityQuery, Join},
    },
    identifiers::{Identifier, ResolvedIdentifiers},
};

/// Credentials of the app aliased `a`.
pub const APP_CREDENTIALS: Join = Join::new(
    "c",
    "JOIN credentials c ON c.tenant_id = a.tenant_id AND c.app_id = a.id",
);

/// Developer owning the app aliased `a`.
pub const APP_DEVELOPER: Join = Join::new(
    "ad",
    "JOIN developers ad ON ad.tenant_id = a.tenant_id AND ad.id = a.developer_id",
);

/// Company owning the app aliased `a`.
pub const APP_COMPANY: Join = Join::new(
    "ac",
    "JOIN companies ac ON ac.tenant_id = a.tenant_id AND ac.id = a.company_id",
);

/// Parse a JSON array column. Empty text is treated as an empty list.
pub fn parse_string_list(raw: &str) -> DbResult<Vec<String>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(raw)?)
}

/// Narrow a query over the app aliased `a` by the lookup's owner secondary.
///
/// `apiresource` is left for the caller since it filters products, not apps.
pub fn filter_app_owner(query: EntityQuery, lookup: &ResolvedIdentifiers) -> DbResult<EntityQuery> {
    let Some((secondary, value)) = &lookup.secondary else {
        return Ok(query);
    };
    match secondary {
        Identifier::ApiResource => Ok(query),
        Identifier::DeveloperId => Ok(query.filter_eq("a.developer_id", value.as_str())),
        Identifier::DeveloperEmail => Ok(query
            .join(APP_DEVELOPER)
            .filter_eq("ad.email", value.as_str())),
        Identifier::CompanyName => Ok(query
            .join(APP_COMPANY)
            .filter_eq("ac.name", value.as_str())),
        other => Err(unsupported(lookup, *other)),
    }
}

/// Error for an identifier the repository has no query for.
pub fn unsupported(lookup: &ResolvedIdentifiers, identifier: Identifier) -> DbError {
    DbError::Validation(format!(
        "{identifier} is not supported for {} lookups",
        lookup.endpoint
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_list() {
        assert_eq!(parse_string_list("").unwrap(), Vec::<String>::new());
        assert_eq!(parse_string_list("[]").unwrap(), Vec::<String>::new());
        assert_eq!(
            parse_string_list(r#"["/a/**","/b"]"#).unwrap(),
            vec!["/a/**".to_string(), "/b".to_string()]
        );
        assert!(matches!(parse_string_list("/a"), Err(DbError::Json(_))));
    }
}
