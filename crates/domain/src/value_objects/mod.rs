/// Raw ledger amounts with their decimal scale.
pub mod amount;
/// Fractions expressed in basis points.
pub mod percentage;
/// Exchange rates.
pub mod price;
/// User slippage tolerance.
pub mod tolerance;

pub use amount::Amount;
pub use percentage::Percentage;
pub use price::Price;
pub use tolerance::SlippageTolerance;
