//! Narrow a credential's products to the one that governs a request.

use super::matcher::{environment_matches, path_matches, proxy_matches};
use crate::models::ApiProduct;

/// The parts of a request a product can restrict.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub environment: &'a str,
    pub proxy: &'a str,
    pub path: &'a str,
}

/// Whether `product` admits the request described by `ctx`.
pub fn is_admissible(product: &ApiProduct, ctx: &RequestContext<'_>) -> bool {
    environment_matches(&product.environments, ctx.environment)
        && proxy_matches(&product.proxies, ctx.proxy)
        && path_matches(&product.resources, ctx.path)
}

/// Return the first admissible product, keeping the candidates' order.
///
/// A product with no environment, proxy or resource restrictions admits
/// everything, so it wins whenever it comes first.
pub fn shortlist<'p, I>(candidates: I, ctx: &RequestContext<'_>) -> Option<&'p ApiProduct>
where
    I: IntoIterator<Item = &'p ApiProduct>,
{
    candidates.into_iter().find(|p| is_admissible(p, ctx))
}
