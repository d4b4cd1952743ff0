pub mod resources;

pub use resources::{Account, AccountUser, ManagedCluster, SiteConfig, WebApp};
