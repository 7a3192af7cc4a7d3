//! Resolve supplied identifiers to a canonical (primary, secondary) pair.

use thiserror::Error;

use super::tree::{EntityEndpoint, Identifier};

/// Maximum number of identifiers a lookup may carry.
pub const MAX_IDENTIFIERS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("At most {MAX_IDENTIFIERS} identifiers may be supplied, got {0}")]
    TooMany(usize),

    #[error("Unknown entity endpoint '{0}'")]
    UnknownEndpoint(String),

    #[error("Identifier {secondary} cannot be combined with {primary} for {endpoint}")]
    Incompatible {
        endpoint: EntityEndpoint,
        primary: Identifier,
        secondary: Identifier,
    },

    #[error("None of the supplied identifiers can look up {0}")]
    NoPrimary(EntityEndpoint),
}

/// The canonical key pair for a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentifiers {
    pub endpoint: EntityEndpoint,
    pub primary: Identifier,
    pub primary_value: String,
    pub secondary: Option<(Identifier, String)>,
}

impl ResolvedIdentifiers {
    /// Secondary identifier name, or empty when there is none.
    pub fn secondary_type(&self) -> &'static str {
        self.secondary.as_ref().map_or("", |(i, _)| i.wire_name())
    }

    /// Secondary identifier value, or empty when there is none.
    pub fn secondary_value(&self) -> &str {
        self.secondary.as_ref().map_or("", |(_, v)| v.as_str())
    }

    pub fn secondary_identifier(&self) -> Option<Identifier> {
        self.secondary.as_ref().map(|(i, _)| *i)
    }
}

/// Parse raw query parameters into identifiers.
///
/// Names are lower-cased. Unknown names and empty values are dropped, so they
/// do not count toward [`MAX_IDENTIFIERS`].
pub fn parse_identifiers<I, K, V>(params: I) -> Vec<(Identifier, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    params
        .into_iter()
        .filter_map(|(name, value)| {
            let identifier = Identifier::parse(&name.as_ref().to_ascii_lowercase())?;
            let value = value.into();
            (!value.is_empty()).then_some((identifier, value))
        })
        .collect()
}

/// Resolve identifiers for an endpoint given by name.
pub fn resolve(
    endpoint: &str,
    supplied: &[(Identifier, String)],
) -> Result<ResolvedIdentifiers, IdentifierError> {
    if supplied.len() > MAX_IDENTIFIERS {
        return Err(IdentifierError::TooMany(supplied.len()));
    }
    let endpoint = endpoint
        .parse::<EntityEndpoint>()
        .map_err(|_| IdentifierError::UnknownEndpoint(endpoint.to_string()))?;
    resolve_for(endpoint, supplied)
}

/// Resolve identifiers against the rules of `endpoint`.
///
/// The first supplied identifier that is a primary for the endpoint wins. Its
/// compatible secondaries are tried in table order; a supplied one with a
/// non-empty value completes the pair. If nothing compatible was supplied
/// alongside a second identifier, the combination is rejected.
pub fn resolve_for(
    endpoint: EntityEndpoint,
    supplied: &[(Identifier, String)],
) -> Result<ResolvedIdentifiers, IdentifierError> {
    if supplied.len() > MAX_IDENTIFIERS {
        return Err(IdentifierError::TooMany(supplied.len()));
    }

    for (name, value) in supplied {
        let Some(rule) = endpoint.rule_for(*name) else {
            continue;
        };

        let secondary = rule.secondaries.iter().find_map(|candidate| {
            supplied
                .iter()
                .find(|(n, v)| n == candidate && !v.is_empty())
                .map(|(n, v)| (*n, v.clone()))
        });

        if secondary.is_none() && supplied.len() == MAX_IDENTIFIERS {
            let other = supplied
                .iter()
                .map(|(n, _)| *n)
                .find(|n| n != name)
                .unwrap_or(*name);
            return Err(IdentifierError::Incompatible {
                endpoint,
                primary: *name,
                secondary: other,
            });
        }

        return Ok(ResolvedIdentifiers {
            endpoint,
            primary: *name,
            primary_value: value.clone(),
            secondary,
        });
    }

    Err(IdentifierError::NoPrimary(endpoint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use Identifier::*;

    fn ids(items: &[(Identifier, &str)]) -> Vec<(Identifier, String)> {
        items.iter().map(|(i, v)| (*i, v.to_string())).collect()
    }

    #[test]
    fn test_primary_with_compatible_secondary() {
        let resolved = resolve("apps", &ids(&[(AppName, "x"), (DeveloperId, "y")])).unwrap();
        assert_eq!(resolved.primary, AppName);
        assert_eq!(resolved.primary_value, "x");
        assert_eq!(resolved.secondary, Some((DeveloperId, "y".to_string())));
        assert_eq!(resolved.secondary_type(), "developerId");
        assert_eq!(resolved.secondary_value(), "y");
    }

    #[test]
    fn test_secondary_supplied_first() {
        let resolved = resolve("apps", &ids(&[(DeveloperId, "y"), (AppName, "x")])).unwrap();
        assert_eq!(resolved.primary, AppName);
        assert_eq!(resolved.secondary_identifier(), Some(DeveloperId));
    }

    #[test]
    fn test_primary_alone() {
        let resolved = resolve("apps", &ids(&[(AppName, "x")])).unwrap();
        assert_eq!(resolved.primary, AppName);
        assert_eq!(resolved.primary_value, "x");
        assert_eq!(resolved.secondary, None);
        assert_eq!(resolved.secondary_type(), "");
        assert_eq!(resolved.secondary_value(), "");
    }

    #[test]
    fn test_incompatible_pair_rejected() {
        let err = resolve("apps", &ids(&[(AppId, "a"), (DeveloperId, "d")])).unwrap_err();
        assert_eq!(
            err,
            IdentifierError::Incompatible {
                endpoint: EntityEndpoint::Apps,
                primary: AppId,
                secondary: DeveloperId,
            }
        );
    }

    #[test]
    fn test_three_identifiers_rejected() {
        let err = resolve(
            "apiproducts",
            &ids(&[(AppName, "x"), (DeveloperId, "y"), (ApiResource, "/a")]),
        )
        .unwrap_err();
        assert_eq!(err, IdentifierError::TooMany(3));
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let err = resolve("widgets", &ids(&[(AppId, "a")])).unwrap_err();
        assert_eq!(err, IdentifierError::UnknownEndpoint("widgets".into()));
    }

    #[test]
    fn test_no_primary_rejected() {
        let err = resolve("apps", &ids(&[(DeveloperId, "d")])).unwrap_err();
        assert_eq!(err, IdentifierError::NoPrimary(EntityEndpoint::Apps));
        let err = resolve("apps", &[]).unwrap_err();
        assert_eq!(err, IdentifierError::NoPrimary(EntityEndpoint::Apps));
    }

    #[test]
    fn test_secondary_table_order() {
        // apiresource is tried before developeremail for apiproducts/appname
        let resolved = resolve(
            "apiproducts",
            &ids(&[(AppName, "x"), (ApiResource, "/a/**")]),
        )
        .unwrap();
        assert_eq!(resolved.secondary_identifier(), Some(ApiResource));
    }

    #[test]
    fn test_empty_secondary_value_not_used() {
        let err = resolve_for(
            EntityEndpoint::Apps,
            &ids(&[(AppName, "x"), (DeveloperId, "")]),
        )
        .unwrap_err();
        assert!(matches!(err, IdentifierError::Incompatible { .. }));
    }

    #[test]
    fn test_parse_identifiers_lowercases_and_filters() {
        let parsed = parse_identifiers(vec![
            ("AppName", "x"),
            ("organization", "org"),
            ("DEVELOPERID", "y"),
            ("companyName", ""),
        ]);
        assert_eq!(parsed, ids(&[(AppName, "x"), (DeveloperId, "y")]));
    }

    #[test]
    fn test_two_primaries_without_compatibility() {
        // Both are primaries for developers but neither lists the other
        let err = resolve(
            "developers",
            &ids(&[(DeveloperEmail, "a@b.c"), (DeveloperId, "d")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            IdentifierError::Incompatible {
                primary: DeveloperEmail,
                ..
            }
        ));
    }
}
