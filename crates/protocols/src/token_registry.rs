//! Token metadata lookup.
//!
//! Metadata is cosmetic. A mint without an entry is still a valid token and
//! resolves to the placeholder descriptor.

use crate::error::LedgerError;
use cpamm_domain::entities::Token;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Chain id of devnet in the Solana token list.
pub const DEVNET_CHAIN_ID: u64 = 103;

/// One token list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub chain_id: u64,
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(rename = "logoURI", default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenList {
    tokens: Vec<TokenMetadata>,
}

/// Source of token metadata.
pub trait TokenRegistry: Send + Sync {
    fn lookup(&self, mint: &str) -> Option<TokenMetadata>;

    /// Token descriptor for `mint`. Decimals always come from the mint account.
    fn describe(&self, mint: &str, decimals: u8) -> Token {
        match self.lookup(mint) {
            Some(meta) => {
                Token::new(mint, meta.symbol, decimals, meta.name).with_logo(meta.logo_uri)
            }
            None => Token::unknown(mint, decimals),
        }
    }
}

/// In-memory registry, usually loaded from a token list file.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenRegistry {
    tokens: HashMap<String, TokenMetadata>,
}

impl StaticTokenRegistry {
    /// An empty registry; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = TokenMetadata>) -> Self {
        let tokens = entries
            .into_iter()
            .map(|meta| (meta.address.clone(), meta))
            .collect();
        Self { tokens }
    }

    /// Parses a token list document, keeping entries for `chain_id` only.
    pub fn from_json_str(json: &str, chain_id: u64) -> Result<Self, LedgerError> {
        let list: TokenList =
            serde_json::from_str(json).map_err(|e| LedgerError::Registry(e.to_string()))?;
        Ok(Self::from_entries(
            list.tokens.into_iter().filter(|t| t.chain_id == chain_id),
        ))
    }

    /// Loads a token list file.
    pub fn from_path(path: impl AsRef<Path>, chain_id: u64) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Registry(format!("{}: {e}", path.display())))?;
        let registry = Self::from_json_str(&json, chain_id)?;
        info!(path = %path.display(), chain_id, tokens = registry.len(), "Loaded token list");
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl TokenRegistry for StaticTokenRegistry {
    fn lookup(&self, mint: &str) -> Option<TokenMetadata> {
        self.tokens.get(mint).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LIST: &str = r#"{
        "name": "Solana Token List",
        "tokens": [
            {
                "chainId": 103,
                "address": "So11111111111111111111111111111111111111112",
                "symbol": "SOL",
                "name": "Wrapped SOL",
                "decimals": 9,
                "logoURI": "https://example.org/sol.png"
            },
            {
                "chainId": 101,
                "address": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
                "symbol": "USDC",
                "name": "USD Coin",
                "decimals": 6
            }
        ]
    }"#;

    #[test]
    fn test_filters_by_chain() {
        let registry = StaticTokenRegistry::from_json_str(LIST, DEVNET_CHAIN_ID).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(
            registry
                .lookup("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v")
                .is_none()
        );
    }

    #[test]
    fn test_describe_uses_metadata_or_placeholder() {
        let registry = StaticTokenRegistry::from_json_str(LIST, DEVNET_CHAIN_ID).unwrap();

        let sol = registry.describe("So11111111111111111111111111111111111111112", 9);
        assert_eq!(sol.symbol, "SOL");
        assert_eq!(sol.logo_uri.as_deref(), Some("https://example.org/sol.png"));

        let unknown = registry.describe("Mint1111111111111111111111111111111111111111", 4);
        assert_eq!(unknown.symbol, "UNKNOWN");
        assert_eq!(unknown.name, "Unknown Token");
        assert_eq!(unknown.decimals, 4);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LIST.as_bytes()).unwrap();

        let registry = StaticTokenRegistry::from_path(file.path(), 101).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(StaticTokenRegistry::from_path("/nonexistent/tokens.json", 101).is_err());
    }

    #[test]
    fn test_malformed_list() {
        assert!(matches!(
            StaticTokenRegistry::from_json_str("{", DEVNET_CHAIN_ID),
            Err(LedgerError::Registry(_))
        ));
    }
}
