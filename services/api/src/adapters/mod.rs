pub mod db;
pub mod generator;
pub mod identity;

pub use db::DbAdapter;
pub use generator::HttpGeneratorAdapter;
pub use identity::FirebaseIdentityAdapter;
