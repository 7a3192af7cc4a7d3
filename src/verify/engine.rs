//! The validation state machine.
//!
//! `KeyLookup -> StatusChecks -> ProductResolution -> ContextValidation`,
//! ending in [`Decision::Authorized`] or the first [`Denial`] met on the way.

use std::{collections::HashMap, sync::Arc};

use super::{
    decision::{Decision, Denial},
    error::VerifyResult,
    matcher::{environment_matches, path_matches, proxy_matches},
    request::VerifyApiKey,
    response::{
        ApiProductDetails, AppDetails, ClientIdDetails, CompanyDetails, DeveloperDetails,
        PrincipalDetails, VerifyApiKeySuccessResponse,
    },
    shortlist::{RequestContext, shortlist},
};
use crate::{
    cipher::Cipher,
    db::{DbPool, DbSnapshot},
    models::{ApiProduct, App, AppOwner, Attribute, Credential, Principal, ProductBinding, kind},
};

/// Entities reached from a presented key.
struct KeyContext {
    credential: Credential,
    app: App,
    principal: Principal,
}

/// Verifies API keys against a data snapshot.
#[derive(Clone)]
pub struct Verifier {
    cipher: Arc<dyn Cipher>,
}

impl Verifier {
    pub fn new(cipher: Arc<dyn Cipher>) -> Self {
        Self { cipher }
    }

    /// Run the state machine for one request.
    ///
    /// Denials come back as `Ok(Decision::Denied(..))`. Errors are reserved
    /// for store and decryption failures.
    #[tracing::instrument(
        name = "verify.apikey",
        skip_all,
        fields(org = %request.organization, snapshot = %snapshot.version())
    )]
    pub async fn verify(
        &self,
        snapshot: &DbSnapshot,
        request: &VerifyApiKey,
    ) -> VerifyResult<Decision> {
        let db = snapshot.db();

        let Some(ctx) = lookup_key(db, request).await? else {
            return Ok(denied(Denial::invalid_api_key(
                &request.key,
                &request.organization,
            )));
        };

        if let Some(denial) = check_statuses(&ctx) {
            return Ok(denied(denial));
        }

        let tenant_id = ctx.credential.tenant_id.as_str();
        let entity_ids = [
            ctx.credential.id.as_str(),
            ctx.app.id.as_str(),
            ctx.principal.id(),
        ];
        let product_repo = db.api_products();
        let attribute_repo = db.attributes();
        let (bindings, attributes) = tokio::try_join!(
            product_repo.list_bindings(tenant_id, &ctx.credential.id),
            attribute_repo.list_for_entities(tenant_id, &entity_ids),
        )?;

        let Some(product) = resolve_product(&bindings, request) else {
            return Ok(denied(Denial::product_not_resolved()));
        };

        if request.enforce_context
            && let Some(denial) = validate_context(product, request)
        {
            return Ok(denied(denial));
        }

        let product_attributes = attribute_repo
            .list_for_entities(tenant_id, &[product.id.as_str()])
            .await?
            .remove(&product.id)
            .unwrap_or_default();

        let secret = self
            .cipher
            .decrypt(&request.organization, &ctx.credential.consumer_secret)
            .await?;

        let product_names = bindings.iter().map(|b| b.product.name.clone()).collect();
        let principal = match &ctx.principal {
            Principal::Developer(developer) => PrincipalDetails::Developer(DeveloperDetails::new(
                developer,
                attributes_for(&attributes, &developer.id, kind::DEVELOPER),
            )),
            Principal::Company(company) => PrincipalDetails::Company(CompanyDetails::new(
                company,
                attributes_for(&attributes, &company.id, kind::COMPANY),
            )),
        };

        let response = VerifyApiKeySuccessResponse {
            organization: request.organization.clone(),
            environment: request.environment.clone(),
            client_id: ClientIdDetails::new(
                &ctx.credential,
                secret,
                attributes_for(&attributes, &ctx.credential.id, kind::CREDENTIAL),
            ),
            principal,
            app: AppDetails::new(
                &ctx.app,
                product_names,
                attributes_for(&attributes, &ctx.app.id, kind::APP),
            ),
            api_product: ApiProductDetails::new(product, product_attributes),
        };

        tracing::debug!(
            key = %request.key,
            product = %product.name,
            "API key authorized"
        );
        Ok(Decision::Authorized(Box::new(response)))
    }
}

/// Find the credential, its app and the app's owner. Any missing link means
/// the key does not verify.
async fn lookup_key(db: &DbPool, request: &VerifyApiKey) -> VerifyResult<Option<KeyContext>> {
    let Some(credential) = db
        .credentials()
        .get_by_key_in_org(&request.key, &request.organization)
        .await?
    else {
        return Ok(None);
    };

    let tenant_id = credential.tenant_id.as_str();
    let Some(app) = db.apps().get_by_id(tenant_id, &credential.app_id).await? else {
        tracing::debug!(app_id = %credential.app_id, "Credential references a missing app");
        return Ok(None);
    };

    let principal = match &app.owner {
        AppOwner::Developer(id) => db
            .developers()
            .get_by_id(tenant_id, id)
            .await?
            .map(Principal::Developer),
        AppOwner::Company(id) => db
            .companies()
            .get_by_id(tenant_id, id)
            .await?
            .map(Principal::Company),
    };
    let Some(principal) = principal else {
        tracing::debug!(owner = %app.owner.id(), "App references a missing owner");
        return Ok(None);
    };

    Ok(Some(KeyContext {
        credential,
        app,
        principal,
    }))
}

/// Principal, then app, then credential. The first failure wins.
fn check_statuses(ctx: &KeyContext) -> Option<Denial> {
    if !ctx.principal.is_active() {
        return Some(match ctx.principal {
            Principal::Developer(_) => Denial::developer_not_active(),
            Principal::Company(_) => Denial::company_not_active(),
        });
    }
    if !ctx.app.is_approved() {
        return Some(Denial::app_not_approved());
    }
    if !ctx.credential.is_approved() {
        return Some(Denial::key_not_approved());
    }
    None
}

/// Pick the governing product among the approved bindings.
fn resolve_product<'b>(
    bindings: &'b [ProductBinding],
    request: &VerifyApiKey,
) -> Option<&'b ApiProduct> {
    let mut approved = bindings
        .iter()
        .filter(|b| b.is_approved())
        .map(|b| &b.product);

    if request.enforce_context {
        shortlist(
            approved,
            &RequestContext {
                environment: &request.environment,
                proxy: &request.proxy,
                path: &request.path,
            },
        )
    } else {
        approved.next()
    }
}

/// Check the resolved product against the request's path, environment and proxy.
pub fn validate_context(product: &ApiProduct, request: &VerifyApiKey) -> Option<Denial> {
    if !path_matches(&product.resources, &request.path) {
        return Some(Denial::path_mismatch(&product.resources, &request.path));
    }
    if !environment_matches(&product.environments, &request.environment) {
        return Some(Denial::environment_mismatch(
            &product.environments,
            &request.environment,
        ));
    }
    if !proxy_matches(&product.proxies, &request.proxy) {
        return Some(Denial::proxy_mismatch(&product.proxies, &request.proxy));
    }
    None
}

fn attributes_for(
    attributes: &HashMap<String, Vec<Attribute>>,
    entity_id: &str,
    entity_kind: &str,
) -> Vec<Attribute> {
    attributes
        .get(entity_id)
        .map(|attrs| {
            attrs
                .iter()
                .filter(|a| a.kind == entity_kind)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

fn denied(denial: Denial) -> Decision {
    tracing::debug!(code = %denial.code, message = %denial.message, "API key denied");
    Decision::Denied(denial)
}
