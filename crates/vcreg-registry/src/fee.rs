//! # Fee Gate
//!
//! Charges the submitter of a mutating message before the mutation is
//! written. The debit capability is the [`BankKeeper`] trait, supplied by
//! the host's accounting module.
//!
//! [`StoreBank`] is a reference bank that keeps balances in the same
//! key-value store as the registry (prefix `0x10`). Because it writes
//! through the operation's write-set, a rejected operation also rolls back
//! its fee debit.

use thiserror::Error;

use vcreg_core::Did;
use vcreg_store::{KvStore, StoreError, Table};

use crate::error::RegistryError;
use crate::params::Coin;

/// Default account that collects registry fees.
pub const DEFAULT_FEE_POOL: &str = "vcreg/fee_pool";

const BALANCES: Table<u64> = Table::new(0x10, "balances");

/// Errors from a fee debit.
#[derive(Error, Debug)]
pub enum FeeError {
    /// The payer's balance is below the fee.
    #[error("{payer} has {available}{denom}, fee is {required}{denom}")]
    InsufficientFunds {
        /// Account charged.
        payer: String,
        /// Fee denomination.
        denom: String,
        /// Fee amount.
        required: u64,
        /// Payer balance.
        available: u64,
    },

    /// Crediting the pool would overflow its balance.
    #[error("balance overflow crediting {account} in {denom}")]
    BalanceOverflow {
        /// Account credited.
        account: String,
        /// Denomination.
        denom: String,
    },

    /// Store failure while reading or writing balances.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Account-debit capability consumed by the registry.
pub trait BankKeeper {
    /// Move `fee` from `payer` into the registry's pool account.
    fn charge_fee(&self, store: &mut dyn KvStore, payer: &Did, fee: &Coin) -> Result<(), FeeError>;
}

/// Balances kept inside the registry's own store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreBank {
    pool: String,
}

impl Default for StoreBank {
    fn default() -> Self {
        Self::new(DEFAULT_FEE_POOL)
    }
}

fn balance_key(account: &str, denom: &str) -> Vec<u8> {
    BALANCES.key().str(account).str(denom).finish()
}

impl StoreBank {
    /// A bank paying fees into `pool`.
    pub fn new(pool: impl Into<String>) -> Self {
        Self { pool: pool.into() }
    }

    /// The pool account.
    pub fn pool(&self) -> &str {
        &self.pool
    }

    /// Current balance, zero if never set.
    pub fn balance<S: KvStore + ?Sized>(
        &self,
        store: &S,
        account: &str,
        denom: &str,
    ) -> Result<u64, StoreError> {
        Ok(BALANCES
            .get(store, &balance_key(account, denom))?
            .unwrap_or(0))
    }

    /// Overwrite a balance. Used to seed accounts from configuration.
    pub fn set_balance<S: KvStore + ?Sized>(
        &self,
        store: &mut S,
        account: &str,
        denom: &str,
        amount: u64,
    ) -> Result<(), StoreError> {
        BALANCES.set(store, balance_key(account, denom), &amount)
    }
}

impl BankKeeper for StoreBank {
    fn charge_fee(&self, store: &mut dyn KvStore, payer: &Did, fee: &Coin) -> Result<(), FeeError> {
        let available = self.balance(&*store, payer.as_str(), &fee.denom)?;
        if available < fee.amount {
            return Err(FeeError::InsufficientFunds {
                payer: payer.to_string(),
                denom: fee.denom.clone(),
                required: fee.amount,
                available,
            });
        }
        if payer.as_str() == self.pool {
            return Ok(());
        }
        let pool_balance = self
            .balance(&*store, &self.pool, &fee.denom)?
            .checked_add(fee.amount)
            .ok_or_else(|| FeeError::BalanceOverflow {
                account: self.pool.clone(),
                denom: fee.denom.clone(),
            })?;
        self.set_balance(store, payer.as_str(), &fee.denom, available - fee.amount)?;
        self.set_balance(store, &self.pool, &fee.denom, pool_balance)?;
        Ok(())
    }
}

/// Wraps a [`BankKeeper`]; zero fees never reach the bank.
#[derive(Debug, Clone)]
pub struct FeeGate<B> {
    bank: B,
}

impl<B: BankKeeper> FeeGate<B> {
    /// Gate fees through `bank`.
    pub fn new(bank: B) -> Self {
        Self { bank }
    }

    /// The underlying bank.
    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// Charge `fee` to `payer`.
    pub fn charge(
        &self,
        store: &mut dyn KvStore,
        payer: &Did,
        fee: &Coin,
    ) -> Result<(), RegistryError> {
        if fee.is_zero() {
            return Ok(());
        }
        self.bank.charge_fee(store, payer, fee)?;
        tracing::debug!(payer = %payer, fee = %fee, "fee charged");
        Ok(())
    }
}
