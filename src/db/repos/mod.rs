mod api_products;
mod apps;
mod attributes;
mod companies;
mod company_developers;
mod credentials;
mod data_scopes;
mod developers;

pub use api_products::*;
pub use apps::*;
pub use attributes::*;
pub use companies::*;
pub use company_developers::*;
pub use credentials::*;
pub use data_scopes::*;
pub use developers::*;
