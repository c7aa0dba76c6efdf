pub mod pool;
pub mod position;
pub mod token;

// Re-export for easier access
pub use pool::{PoolSnapshot, SwapDirection};
pub use position::UserPosition;
pub use token::Token;
