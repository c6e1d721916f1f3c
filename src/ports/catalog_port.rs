//! Catalog loading port trait.

use crate::domain::catalog::Catalog;
use crate::domain::error::UnitfolioError;

/// Port for loading the strategy catalog (statistics + monthly returns).
pub trait CatalogPort {
    fn load_catalog(&self) -> Result<Catalog, UnitfolioError>;
}
