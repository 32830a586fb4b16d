//! ABI and SDK smoke tests.

use alloy::dyn_abi::DynSolValue;

use crate::{
    abi::AbiStore,
    config::SmokeConfig,
    error::{AppError, Result},
    ethereum::{parse_address, ChainClient},
    retry::{safe_call, RetryPolicy},
    types::{AbiLoadResult, SmokeReport},
};

/// Try to load each named ABI; failures are reported per name.
pub fn abi_report<S: AsRef<str>>(store: &AbiStore, names: &[S]) -> Vec<AbiLoadResult> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            AbiLoadResult {
                name: name.to_string(),
                entries: store.load(name).map(|abi| abi.len()).map_err(|e| e.to_string()),
            }
        })
        .collect()
}

/// Bind the configured token with the `erc20` ABI and read `decimals` and
/// the test account's balance through the retry wrapper.
pub async fn sdk_smoke(
    client: &dyn ChainClient,
    store: &AbiStore,
    config: &SmokeConfig,
    policy: &RetryPolicy,
) -> Result<SmokeReport> {
    let token = store.get_contract(&config.weth_address, "erc20")?;
    let account = parse_address(&config.test_account)?;

    let decimals = safe_call(policy, || token.call(client, "decimals", &[])).await?;
    let decimals = first_uint(&decimals, "decimals")?;
    let decimals = u8::try_from(decimals)
        .map_err(|_| AppError::Abi(format!("decimals out of range: {}", decimals)))?;

    let args = [DynSolValue::Address(account)];
    let balance = safe_call(policy, || token.call(client, "balanceOf", &args)).await?;
    let balance = first_uint(&balance, "balanceOf")?;

    tracing::info!(
        token = %token.address(),
        account = %account,
        decimals = decimals,
        "Smoke test complete"
    );

    Ok(SmokeReport { token: token.address(), account, decimals, balance })
}

fn first_uint(values: &[DynSolValue], function: &str) -> Result<alloy::primitives::U256> {
    values
        .first()
        .and_then(DynSolValue::as_uint)
        .map(|(value, _)| value)
        .ok_or_else(|| AppError::Abi(format!("{} did not return a uint", function)))
}
