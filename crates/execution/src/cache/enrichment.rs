//! Turns a pool record into a snapshot.

use chrono::Utc;
use cpamm_domain::entities::PoolSnapshot;
use cpamm_domain::value_objects::Amount;
use cpamm_protocols::LedgerError;
use cpamm_protocols::ledger::LedgerReader;
use cpamm_protocols::program::pool_account::PoolRecord;
use cpamm_protocols::token::TokenAccountInfo;
use cpamm_protocols::token_registry::TokenRegistry;
use solana_sdk::pubkey::Pubkey;

/// Reads both mints and both reserves of `record` concurrently and builds a snapshot.
///
/// Nothing is assembled until every read has succeeded. With `with_lp_supply`
/// the LP mint is read in the same join.
pub(crate) async fn enrich_pool(
    ledger: &dyn LedgerReader,
    registry: &dyn TokenRegistry,
    record: &PoolRecord,
    with_lp_supply: bool,
) -> Result<PoolSnapshot, LedgerError> {
    let lp_supply = async {
        if with_lp_supply {
            ledger.mint(&record.lp_mint).await.map(Some)
        } else {
            Ok(None)
        }
    };

    let (mint_a, mint_b, reserve_a, reserve_b, lp_mint) = tokio::try_join!(
        ledger.mint(&record.mint_a),
        ledger.mint(&record.mint_b),
        ledger.token_account(&record.reserve_a),
        ledger.token_account(&record.reserve_b),
        lp_supply,
    )?;

    ensure_reserve_mint(&reserve_a, &record.mint_a)?;
    ensure_reserve_mint(&reserve_b, &record.mint_b)?;

    let address_a = record.mint_a.to_string();
    let address_b = record.mint_b.to_string();

    Ok(PoolSnapshot {
        address: record.address.to_string(),
        token_a: registry.describe(&address_a, mint_a.decimals),
        token_b: registry.describe(&address_b, mint_b.decimals),
        reserve_a: Amount::from_raw(reserve_a.amount, mint_a.decimals),
        reserve_b: Amount::from_raw(reserve_b.amount, mint_b.decimals),
        reserve_a_address: record.reserve_a.to_string(),
        reserve_b_address: record.reserve_b.to_string(),
        lp_mint: record.lp_mint.to_string(),
        lp_supply: lp_mint.map(|m| Amount::from_raw(m.supply, m.decimals)),
        fee_bps: record.fee_bps,
        fetched_at: Utc::now(),
    })
}

fn ensure_reserve_mint(reserve: &TokenAccountInfo, mint: &Pubkey) -> Result<(), LedgerError> {
    if reserve.mint != *mint {
        return Err(LedgerError::InvalidAccountData {
            address: reserve.address.to_string(),
            reason: format!("reserve holds {}, pool expects {mint}", reserve.mint),
        });
    }
    Ok(())
}
