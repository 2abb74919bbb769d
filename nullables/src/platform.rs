//! Nullable platform — serve balances from memory and record every call.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tally_platform::{
    Balance, FaucetTransaction, Platform, PlatformError, Trade, TradeRequest, Transaction,
    TransactionStatus, Transfer, TransferRequest,
};
use tally_types::{AddressId, Asset, AtomicAmount, Decimal, NetworkId, WalletId};

/// One call made against a [`NullPlatform`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlatformCall {
    GetBalance {
        network_id: NetworkId,
        address_id: AddressId,
        asset_id: String,
    },
    ListBalances {
        network_id: NetworkId,
        address_id: AddressId,
    },
    CreateTransfer(TransferRequest),
    BroadcastTransfer(Transfer),
    CreateTrade(TradeRequest),
    BroadcastTrade(Trade),
    ListTransfers {
        wallet_id: WalletId,
        address_id: AddressId,
    },
    ListTrades {
        wallet_id: WalletId,
        address_id: AddressId,
    },
    RequestFaucet {
        network_id: NetworkId,
        address_id: AddressId,
    },
}

type BalanceKey = (NetworkId, String, String);

#[derive(Clone, Copy)]
enum Held {
    Human(Decimal),
    Atomic(AtomicAmount),
}

#[derive(Default)]
struct State {
    calls: Vec<PlatformCall>,
    decimals: HashMap<String, u32>,
    balances: HashMap<BalanceKey, Held>,
    transfers: Vec<Transfer>,
    trades: Vec<Trade>,
    next_id: u64,
    trade_transactions: usize,
    fail_creates: Option<String>,
    fail_broadcasts: Option<String>,
}

/// A test platform that keeps balances in memory and records calls instead of
/// making requests.
///
/// Known assets start as `eth` (18 decimals) and `usdc` (6 decimals). Created
/// trades carry two transactions (approval, swap) unless configured otherwise.
pub struct NullPlatform {
    state: Mutex<State>,
}

impl NullPlatform {
    pub fn new() -> Self {
        let mut decimals = HashMap::new();
        decimals.insert("eth".to_string(), 18);
        decimals.insert("usdc".to_string(), 6);
        Self {
            state: Mutex::new(State {
                decimals,
                trade_transactions: 2,
                ..State::default()
            }),
        }
    }

    /// Register an asset with its decimals.
    pub fn with_asset(self, asset_id: &str, decimals: u32) -> Self {
        self.state().decimals.insert(asset_id.to_string(), decimals);
        self
    }

    /// Number of transactions each created trade carries.
    pub fn with_trade_transactions(self, count: usize) -> Self {
        self.state().trade_transactions = count;
        self
    }

    /// Set the human-denominated balance of an asset held by an address.
    pub fn set_balance(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
        asset_id: &str,
        amount: Decimal,
    ) {
        self.state()
            .balances
            .insert(balance_key(network_id, address_id, asset_id), Held::Human(amount));
    }

    /// Set the balance in atomic units, as the platform reports it.
    pub fn set_atomic_balance(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
        asset_id: &str,
        amount: AtomicAmount,
    ) {
        self.state()
            .balances
            .insert(balance_key(network_id, address_id, asset_id), Held::Atomic(amount));
    }

    /// Make every subsequent create call fail with a platform API error.
    pub fn fail_creates(&self, message: &str) {
        self.state().fail_creates = Some(message.to_string());
    }

    /// Make every subsequent broadcast call fail with a platform API error.
    pub fn fail_broadcasts(&self, message: &str) {
        self.state().fail_broadcasts = Some(message.to_string());
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state().calls.clone()
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&PlatformCall) -> bool) -> usize {
        self.state().calls.iter().filter(|c| predicate(c)).count()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NullPlatform {
    fn default() -> Self {
        Self::new()
    }
}

fn balance_key(network_id: NetworkId, address_id: &AddressId, asset_id: &str) -> BalanceKey {
    (
        network_id,
        address_id.as_str().to_ascii_lowercase(),
        asset_id.to_ascii_lowercase(),
    )
}

fn not_found(what: &str) -> PlatformError {
    PlatformError::Api {
        status: 404,
        code: "not_found".to_string(),
        message: what.to_string(),
    }
}

fn injected(message: &str) -> PlatformError {
    PlatformError::Api {
        status: 500,
        code: "internal".to_string(),
        message: message.to_string(),
    }
}

/// Deterministic, decodable payload unique to a resource and position.
fn payload(resource_id: &str, index: usize) -> String {
    hex::encode(format!("{resource_id}/{index}"))
}

fn pending_transaction(network_id: NetworkId, from: &AddressId, unsigned: String) -> Transaction {
    Transaction {
        network_id,
        from_address_id: from.clone(),
        unsigned_payload: unsigned,
        signed_payload: None,
        transaction_hash: None,
        status: TransactionStatus::Pending,
    }
}

fn mark_broadcast(tx: &mut Transaction, hash_seed: &str) {
    tx.status = TransactionStatus::Broadcast;
    tx.transaction_hash = Some(format!("0x{}", hex::encode(hash_seed)));
}

impl State {
    fn next_id(&mut self, kind: &str) -> String {
        self.next_id += 1;
        format!("{kind}-{}", self.next_id)
    }

    fn asset(&self, network_id: NetworkId, asset_id: &str) -> Result<Asset, PlatformError> {
        let id = asset_id.to_ascii_lowercase();
        let decimals = self
            .decimals
            .get(&id)
            .copied()
            .ok_or_else(|| not_found(&format!("unknown asset {asset_id}")))?;
        Ok(Asset::new(network_id, id, decimals))
    }

    fn balance(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
        asset_id: &str,
    ) -> Result<Balance, PlatformError> {
        let asset = self.asset(network_id, asset_id)?;
        let atomic = match self.balances.get(&balance_key(network_id, address_id, asset_id)) {
            Some(Held::Human(human)) => asset.to_atomic_amount(*human)?,
            Some(Held::Atomic(atomic)) => *atomic,
            None => AtomicAmount::zero(),
        };
        Ok(Balance::new(atomic, asset))
    }
}

#[async_trait]
impl Platform for NullPlatform {
    async fn get_balance(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
        asset_id: &str,
    ) -> Result<Balance, PlatformError> {
        let mut state = self.state();
        state.calls.push(PlatformCall::GetBalance {
            network_id,
            address_id: address_id.clone(),
            asset_id: asset_id.to_string(),
        });
        state.balance(network_id, address_id, asset_id)
    }

    async fn list_balances(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
    ) -> Result<Vec<Balance>, PlatformError> {
        let mut state = self.state();
        state.calls.push(PlatformCall::ListBalances {
            network_id,
            address_id: address_id.clone(),
        });
        let address = address_id.as_str().to_ascii_lowercase();
        let mut assets: Vec<String> = state
            .balances
            .keys()
            .filter(|(n, a, _)| *n == network_id && *a == address)
            .map(|(_, _, asset)| asset.clone())
            .collect();
        assets.sort();
        assets
            .iter()
            .map(|asset| state.balance(network_id, address_id, asset))
            .collect()
    }

    async fn create_transfer(&self, request: TransferRequest) -> Result<Transfer, PlatformError> {
        let mut state = self.state();
        state.calls.push(PlatformCall::CreateTransfer(request.clone()));
        if let Some(message) = &state.fail_creates {
            return Err(injected(message));
        }
        state.asset(request.network_id, &request.asset_id)?;

        let id = state.next_id("transfer");
        let transfer = Transfer {
            transaction: pending_transaction(request.network_id, &request.address_id, payload(&id, 0)),
            id,
            network_id: request.network_id,
            wallet_id: request.wallet_id,
            address_id: request.address_id,
            destination: request.destination,
            asset_id: request.asset_id,
            amount: request.amount,
        };
        state.transfers.push(transfer.clone());
        Ok(transfer)
    }

    async fn broadcast_transfer(&self, transfer: &Transfer) -> Result<Transfer, PlatformError> {
        let mut state = self.state();
        state.calls.push(PlatformCall::BroadcastTransfer(transfer.clone()));
        if let Some(message) = &state.fail_broadcasts {
            return Err(injected(message));
        }
        if !transfer.is_signed() {
            return Err(PlatformError::InvalidRequest(format!(
                "transfer {} is not signed",
                transfer.id
            )));
        }

        let stored = state
            .transfers
            .iter_mut()
            .find(|t| t.id == transfer.id)
            .ok_or_else(|| not_found(&format!("transfer {}", transfer.id)))?;
        if stored.status() != TransactionStatus::Broadcast {
            *stored = transfer.clone();
            mark_broadcast(&mut stored.transaction, &transfer.id);
        }
        Ok(stored.clone())
    }

    async fn create_trade(&self, request: TradeRequest) -> Result<Trade, PlatformError> {
        let mut state = self.state();
        state.calls.push(PlatformCall::CreateTrade(request.clone()));
        if let Some(message) = &state.fail_creates {
            return Err(injected(message));
        }
        state.asset(request.network_id, &request.from_asset_id)?;
        state.asset(request.network_id, &request.to_asset_id)?;

        let id = state.next_id("trade");
        let transactions = (0..state.trade_transactions)
            .map(|i| pending_transaction(request.network_id, &request.address_id, payload(&id, i)))
            .collect();
        let trade = Trade {
            id,
            network_id: request.network_id,
            wallet_id: request.wallet_id,
            address_id: request.address_id,
            from_asset_id: request.from_asset_id,
            to_asset_id: request.to_asset_id,
            to_amount: request.amount.clone(),
            from_amount: request.amount,
            transactions,
        };
        state.trades.push(trade.clone());
        Ok(trade)
    }

    async fn broadcast_trade(&self, trade: &Trade) -> Result<Trade, PlatformError> {
        let mut state = self.state();
        state.calls.push(PlatformCall::BroadcastTrade(trade.clone()));
        if let Some(message) = &state.fail_broadcasts {
            return Err(injected(message));
        }
        if !trade.is_fully_signed() {
            return Err(PlatformError::InvalidRequest(format!(
                "trade {} is not fully signed",
                trade.id
            )));
        }

        let stored = state
            .trades
            .iter_mut()
            .find(|t| t.id == trade.id)
            .ok_or_else(|| not_found(&format!("trade {}", trade.id)))?;
        if stored.status() != TransactionStatus::Broadcast {
            *stored = trade.clone();
            for (i, tx) in stored.transactions.iter_mut().enumerate() {
                mark_broadcast(tx, &format!("{}/{i}", trade.id));
            }
        }
        Ok(stored.clone())
    }

    async fn list_transfers(
        &self,
        wallet_id: &WalletId,
        address_id: &AddressId,
    ) -> Result<Vec<Transfer>, PlatformError> {
        let mut state = self.state();
        state.calls.push(PlatformCall::ListTransfers {
            wallet_id: wallet_id.clone(),
            address_id: address_id.clone(),
        });
        Ok(state
            .transfers
            .iter()
            .filter(|t| &t.wallet_id == wallet_id && t.address_id.matches(address_id.as_str()))
            .cloned()
            .collect())
    }

    async fn list_trades(
        &self,
        wallet_id: &WalletId,
        address_id: &AddressId,
    ) -> Result<Vec<Trade>, PlatformError> {
        let mut state = self.state();
        state.calls.push(PlatformCall::ListTrades {
            wallet_id: wallet_id.clone(),
            address_id: address_id.clone(),
        });
        Ok(state
            .trades
            .iter()
            .filter(|t| &t.wallet_id == wallet_id && t.address_id.matches(address_id.as_str()))
            .cloned()
            .collect())
    }

    async fn request_faucet_funds(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
    ) -> Result<FaucetTransaction, PlatformError> {
        let mut state = self.state();
        state.calls.push(PlatformCall::RequestFaucet {
            network_id,
            address_id: address_id.clone(),
        });
        if !network_id.is_testnet() {
            return Err(PlatformError::Api {
                status: 400,
                code: "faucet_unavailable".to_string(),
                message: format!("no faucet on {}", network_id.as_str()),
            });
        }
        let id = state.next_id("faucet");
        Ok(FaucetTransaction {
            transaction_hash: format!("0x{}", hex::encode(id)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> AddressId {
        AddressId::new("0xAbC").unwrap()
    }

    fn transfer_request() -> TransferRequest {
        TransferRequest {
            address_id: address(),
            wallet_id: WalletId::new("w-1").unwrap(),
            network_id: NetworkId::BaseSepolia,
            asset_id: "eth".into(),
            amount: "5".into(),
            destination: "0xdef".into(),
        }
    }

    #[tokio::test]
    async fn serves_balances_in_atomic_units() {
        let platform = NullPlatform::new();
        platform.set_balance(NetworkId::BaseSepolia, &address(), "usdc", Decimal::new(25, 1));
        let balance = platform
            .get_balance(NetworkId::BaseSepolia, &AddressId::new("0xabc").unwrap(), "usdc")
            .await
            .unwrap();
        assert_eq!(balance.amount, "2500000");
        assert_eq!(balance.asset.decimals, 6);
    }

    #[tokio::test]
    async fn serves_atomic_balances_verbatim() {
        let platform = NullPlatform::new();
        platform.set_atomic_balance(NetworkId::BaseSepolia, &address(), "eth", AtomicAmount::MAX);
        let balance = platform
            .get_balance(NetworkId::BaseSepolia, &address(), "eth")
            .await
            .unwrap();
        assert_eq!(balance.amount, AtomicAmount::MAX.to_string());
    }

    #[tokio::test]
    async fn unset_balance_is_zero_and_unknown_asset_is_404() {
        let platform = NullPlatform::new();
        let eth = platform
            .get_balance(NetworkId::BaseSepolia, &address(), "eth")
            .await
            .unwrap();
        assert_eq!(eth.amount, "0");
        let err = platform
            .get_balance(NetworkId::BaseSepolia, &address(), "doge")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn created_payloads_are_hex_and_distinct() {
        let platform = NullPlatform::new();
        let a = platform.create_transfer(transfer_request()).await.unwrap();
        let b = platform.create_transfer(transfer_request()).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.transaction.unsigned_payload, b.transaction.unsigned_payload);
        assert!(a.transaction.payload_bytes().is_ok());
    }

    #[tokio::test]
    async fn broadcast_rejects_unsigned_transfer() {
        let platform = NullPlatform::new();
        let transfer = platform.create_transfer(transfer_request()).await.unwrap();
        let err = platform.broadcast_transfer(&transfer).await.unwrap_err();
        assert!(matches!(err, PlatformError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn injected_failures_are_recorded() {
        let platform = NullPlatform::new();
        platform.fail_creates("boom");
        assert!(platform.create_transfer(transfer_request()).await.is_err());
        assert_eq!(platform.count(|c| matches!(c, PlatformCall::CreateTransfer(_))), 1);
        let listed = platform
            .list_transfers(&WalletId::new("w-1").unwrap(), &address())
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn faucet_only_on_testnets() {
        let platform = NullPlatform::new();
        assert!(platform
            .request_faucet_funds(NetworkId::BaseSepolia, &address())
            .await
            .is_ok());
        let err = platform
            .request_faucet_funds(NetworkId::BaseMainnet, &address())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn trades_carry_configured_transaction_count() {
        let platform = NullPlatform::new().with_trade_transactions(3);
        let trade = platform
            .create_trade(TradeRequest {
                address_id: address(),
                wallet_id: WalletId::new("w-1").unwrap(),
                network_id: NetworkId::BaseSepolia,
                from_asset_id: "eth".into(),
                to_asset_id: "usdc".into(),
                amount: "10".into(),
            })
            .await
            .unwrap();
        assert_eq!(trade.transactions.len(), 3);
    }
}
