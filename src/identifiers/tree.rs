//! Static identifier compatibility table for entity lookups.
//!
//! Each endpoint lists the identifiers that can act as the primary key of a
//! lookup, and for each primary the secondary identifiers that may narrow it,
//! in the order they are tried.

use std::{fmt, str::FromStr};

use serde::Serialize;

/// Entity collections that can be looked up by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityEndpoint {
    ApiProducts,
    Apps,
    Companies,
    Developers,
    AppCredentials,
    CompanyDevelopers,
}

impl EntityEndpoint {
    pub const ALL: [EntityEndpoint; 6] = [
        Self::ApiProducts,
        Self::Apps,
        Self::Companies,
        Self::Developers,
        Self::AppCredentials,
        Self::CompanyDevelopers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApiProducts => "apiproducts",
            Self::Apps => "apps",
            Self::Companies => "companies",
            Self::Developers => "developers",
            Self::AppCredentials => "appcredentials",
            Self::CompanyDevelopers => "companydevelopers",
        }
    }

    /// Identifier rules for this endpoint, in table order.
    pub fn rules(&self) -> &'static [IdentifierRule] {
        match self {
            Self::ApiProducts => API_PRODUCT_RULES,
            Self::Apps => APP_RULES,
            Self::Companies => COMPANY_RULES,
            Self::Developers => DEVELOPER_RULES,
            Self::AppCredentials => APP_CREDENTIAL_RULES,
            Self::CompanyDevelopers => COMPANY_DEVELOPER_RULES,
        }
    }

    /// The rule whose primary is `identifier`, if it is a primary here.
    pub fn rule_for(&self, identifier: Identifier) -> Option<&'static IdentifierRule> {
        self.rules().iter().find(|r| r.primary == identifier)
    }
}

impl fmt::Display for EntityEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityEndpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("unknown entity endpoint '{s}'"))
    }
}

/// Identifier names accepted on entity lookups.
///
/// Names are compared in lower case; the request boundary lower-cases
/// query parameter names before parsing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identifier {
    AppId,
    ApiProductName,
    AppName,
    ApiResource,
    DeveloperId,
    DeveloperEmail,
    ConsumerKey,
    CompanyName,
}

impl Identifier {
    pub const ALL: [Identifier; 8] = [
        Self::AppId,
        Self::ApiProductName,
        Self::AppName,
        Self::ApiResource,
        Self::DeveloperId,
        Self::DeveloperEmail,
        Self::ConsumerKey,
        Self::CompanyName,
    ];

    /// Lower-case name used for matching.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppId => "appid",
            Self::ApiProductName => "apiproductname",
            Self::AppName => "appname",
            Self::ApiResource => "apiresource",
            Self::DeveloperId => "developerid",
            Self::DeveloperEmail => "developeremail",
            Self::ConsumerKey => "consumerkey",
            Self::CompanyName => "companyname",
        }
    }

    /// Name as written in requests and responses.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::AppId => "appId",
            Self::ApiProductName => "apiProductName",
            Self::AppName => "appName",
            Self::ApiResource => "apiResource",
            Self::DeveloperId => "developerId",
            Self::DeveloperEmail => "developerEmail",
            Self::ConsumerKey => "consumerKey",
            Self::CompanyName => "companyName",
        }
    }

    /// Parse an already lower-cased identifier name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_str() == name)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A primary identifier and the secondaries that may accompany it.
#[derive(Debug, PartialEq, Eq)]
pub struct IdentifierRule {
    pub primary: Identifier,
    pub secondaries: &'static [Identifier],
}

use Identifier::*;

const API_PRODUCT_RULES: &[IdentifierRule] = &[
    IdentifierRule {
        primary: ApiProductName,
        secondaries: &[],
    },
    IdentifierRule {
        primary: AppId,
        secondaries: &[ApiResource],
    },
    IdentifierRule {
        primary: AppName,
        secondaries: &[ApiResource, DeveloperEmail, DeveloperId, CompanyName],
    },
    IdentifierRule {
        primary: ConsumerKey,
        secondaries: &[ApiResource],
    },
];

const APP_RULES: &[IdentifierRule] = &[
    IdentifierRule {
        primary: AppId,
        secondaries: &[],
    },
    IdentifierRule {
        primary: AppName,
        secondaries: &[DeveloperEmail, DeveloperId, CompanyName],
    },
    IdentifierRule {
        primary: ConsumerKey,
        secondaries: &[],
    },
];

const COMPANY_RULES: &[IdentifierRule] = &[
    IdentifierRule {
        primary: AppId,
        secondaries: &[],
    },
    IdentifierRule {
        primary: CompanyName,
        secondaries: &[],
    },
    IdentifierRule {
        primary: ConsumerKey,
        secondaries: &[],
    },
];

const DEVELOPER_RULES: &[IdentifierRule] = &[
    IdentifierRule {
        primary: AppId,
        secondaries: &[],
    },
    IdentifierRule {
        primary: ConsumerKey,
        secondaries: &[],
    },
    IdentifierRule {
        primary: DeveloperEmail,
        secondaries: &[],
    },
    IdentifierRule {
        primary: DeveloperId,
        secondaries: &[],
    },
];

const APP_CREDENTIAL_RULES: &[IdentifierRule] = &[IdentifierRule {
    primary: ConsumerKey,
    secondaries: &[],
}];

const COMPANY_DEVELOPER_RULES: &[IdentifierRule] = &[IdentifierRule {
    primary: CompanyName,
    secondaries: &[],
}];
