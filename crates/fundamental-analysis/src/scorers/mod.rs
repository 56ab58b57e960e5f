mod financial;
mod manufacturing;
mod pharma_innovation;
mod pharma_mature;
mod tech_mature;
mod tech_platform;

pub use financial::FinancialScorer;
pub use manufacturing::ManufacturingScorer;
pub use pharma_innovation::{PbBand, PharmaInnovationScorer};
pub use pharma_mature::PharmaMatureScorer;
pub use tech_mature::TechMatureScorer;
pub use tech_platform::{TechPlatformScorer, ValueCreation};
