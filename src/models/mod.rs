mod api_product;
mod app;
mod attribute;
mod credential;
mod principal;
mod status;

pub use api_product::*;
pub use app::*;
pub use attribute::*;
pub use credential::*;
pub use principal::*;
pub use status::*;
