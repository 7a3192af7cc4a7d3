mod api_products;
mod apps;
mod attributes;
mod common;
mod companies;
mod company_developers;
mod credentials;
mod data_scopes;
mod developers;

pub use api_products::SqliteApiProductRepo;
pub use apps::SqliteAppRepo;
pub use attributes::SqliteAttributeRepo;
pub use companies::SqliteCompanyRepo;
pub use company_developers::SqliteCompanyDeveloperRepo;
pub use credentials::SqliteCredentialRepo;
pub use data_scopes::SqliteDataScopeRepo;
pub use developers::SqliteDeveloperRepo;
