use serde::{Deserialize, Serialize};

/// Symbol used when the registry has no entry for a mint.
pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";
/// Name used when the registry has no entry for a mint.
pub const UNKNOWN_NAME: &str = "Unknown Token";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub mint_address: String,
    pub symbol: String,
    pub decimals: u8,
    pub name: String,
    pub logo_uri: Option<String>,
}

impl Token {
    pub fn new(
        mint: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        name: impl Into<String>,
    ) -> Self {
        Self {
            mint_address: mint.into(),
            symbol: symbol.into(),
            decimals,
            name: name.into(),
            logo_uri: None,
        }
    }

    /// Placeholder descriptor for a mint without registry metadata.
    ///
    /// Decimals always come from the mint account, so they are known even here.
    pub fn unknown(mint: impl Into<String>, decimals: u8) -> Self {
        Self::new(mint, UNKNOWN_SYMBOL, decimals, UNKNOWN_NAME)
    }

    #[must_use]
    pub fn with_logo(mut self, logo_uri: Option<String>) -> Self {
        self.logo_uri = logo_uri;
        self
    }

    pub fn is_unknown(&self) -> bool {
        self.symbol == UNKNOWN_SYMBOL
    }
}
