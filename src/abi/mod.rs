//! ABI loading and dynamic contract bindings.
//!
//! ABIs live as `<name>.json` files (a JSON list of descriptors) under one
//! directory and are memoized by name for the lifetime of the [`AbiStore`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt},
    json_abi::{Function, JsonAbi},
    primitives::{Address, Bytes},
    rpc::types::TransactionRequest,
};
use tracing::debug;

use crate::{
    error::{AppError, Result},
    ethereum::{parse_address, ChainClient},
};

/// Names loaded by the ABI smoke test.
pub const SMOKE_TEST_ABIS: [&str; 3] = ["erc20", "aave_pool", "aave_oracle"];

/// Loads ABI files by logical name, caching each successful load.
#[derive(Debug)]
pub struct AbiStore {
    dir: PathBuf,
    cache: Mutex<HashMap<String, Arc<JsonAbi>>>,
}

impl AbiStore {
    /// Create a store reading from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), cache: Mutex::new(HashMap::new()) }
    }

    /// Directory ABIs are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the ABI stored as `<dir>/<name>.json`.
    ///
    /// Repeated loads of the same name return the cached definition without
    /// touching the filesystem. Failed loads are not cached.
    pub fn load(&self, name: &str) -> Result<Arc<JsonAbi>> {
        if let Some(abi) = self.lock().get(name) {
            debug!(name = %name, "ABI cache hit");
            return Ok(abi.clone());
        }

        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(AppError::Abi(format!("invalid ABI name: {:?}", name)));
        }

        let path = self.dir.join(format!("{name}.json"));
        if !path.is_file() {
            return Err(AppError::AbiNotFound(path));
        }

        let raw = std::fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        if !value.is_array() {
            return Err(AppError::Abi(format!("{} must contain a JSON list", path.display())));
        }
        let abi: JsonAbi = serde_json::from_value(value)?;

        debug!(name = %name, path = %path.display(), entries = abi.len(), "ABI loaded");

        let abi = Arc::new(abi);
        Ok(self.lock().entry(name.to_string()).or_insert(abi).clone())
    }

    /// Bind the contract at `address` to the ABI called `abi_name`.
    ///
    /// The address is validated before the ABI is read.
    pub fn get_contract(&self, address: &str, abi_name: &str) -> Result<ContractBinding> {
        let address = parse_address(address)?;
        let abi = self.load(abi_name)?;
        Ok(ContractBinding::new(address, abi))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<JsonAbi>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A contract address paired with its ABI.
#[derive(Debug, Clone)]
pub struct ContractBinding {
    address: Address,
    abi: Arc<JsonAbi>,
}

impl ContractBinding {
    /// Create a binding.
    pub fn new(address: Address, abi: Arc<JsonAbi>) -> Self {
        Self { address, abi }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// First overload of function `name`.
    pub fn function(&self, name: &str) -> Result<&Function> {
        self.abi
            .function(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| AppError::Abi(format!("function {} not found in ABI", name)))
    }

    /// ABI-encode a call to `name` with `args`.
    pub fn encode_call(&self, name: &str, args: &[DynSolValue]) -> Result<Bytes> {
        Ok(self.function(name)?.abi_encode_input(args)?.into())
    }

    /// Execute `name(args)` via `eth_call` and decode the outputs.
    pub async fn call(
        &self,
        client: &dyn ChainClient,
        name: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>> {
        let function = self.function(name)?;
        let data = self.encode_call(name, args)?;
        let tx = TransactionRequest::default().to(self.address).input(data.into());
        let output = client.call(&tx).await?;
        Ok(function.abi_decode_output(&output)?)
    }
}
