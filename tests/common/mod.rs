//! In-process mock PXE node shared by the integration tests.
//!
//! Speaks the same JSON-RPC methods as the real node, keeps an in-memory
//! token ledger and checks every authorization witness against the public
//! key registered for the account that produced it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use alloy::primitives::{keccak256, TxHash, B256, U256};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use pxe_wallet::account::{compute_auth_wit_message_hash, schnorr_account_artifact, AuthWitness, CompleteAddress, KeyPair};
use pxe_wallet::config::{AppConfig, WaitConfig};
use pxe_wallet::contract::{ContractArtifact, ContractInstance};
use pxe_wallet::pxe::{AztecAddress, ExtendedPublicLog, FunctionCall, LogFilter, NodeInfo, TxExecutionRequest, TxReceipt, TxStatus};

pub const MOCK_NODE_VERSION: &str = "mock-pxe-0.1.0";

type Shared = Arc<Mutex<MockState>>;

#[derive(Debug, Clone, Default)]
pub struct TokenLedger {
    pub admin: AztecAddress,
    pub private: HashMap<AztecAddress, u128>,
    pub public: HashMap<AztecAddress, u128>,
    pub total_supply: u128,
}

#[derive(Debug, Clone)]
struct RegisteredContract {
    instance: ContractInstance,
    artifact: ContractArtifact,
    initialized: bool,
}

/// Contract-side state; cloned before a transaction so reverts leave no trace.
#[derive(Debug, Clone, Default)]
struct World {
    contracts: HashMap<AztecAddress, RegisteredContract>,
    tokens: HashMap<AztecAddress, TokenLedger>,
    logs: Vec<ExtendedPublicLog>,
}

pub struct MockState {
    test_accounts: Vec<(CompleteAddress, KeyPair)>,
    accounts: Vec<CompleteAddress>,
    world: World,
    receipts: HashMap<TxHash, TxReceipt>,
    block_number: u64,
    /// Number of upcoming `pxe_getNodeInfo` calls to fail, to exercise readiness polling.
    pub unavailable_for: u32,
    /// Receipt polls each newly sent transaction reports `pending` for.
    pub pending_polls: u32,
    /// Receipt polls served so far.
    pub receipt_polls: u32,
    pending: HashMap<TxHash, u32>,
}

impl MockState {
    fn new(test_account_count: usize) -> Self {
        let artifact_hash = schnorr_account_artifact().hash();
        let test_accounts: Vec<_> = (0..test_account_count)
            .map(|i| {
                let keys = KeyPair::from_secret(&B256::repeat_byte(i as u8 + 1)).unwrap();
                let salt = B256::with_last_byte(i as u8);
                let address = CompleteAddress::from_artifact(keys.public_key(), &artifact_hash, &salt);
                (address, keys)
            })
            .collect();

        Self {
            accounts: test_accounts.iter().map(|(a, _)| *a).collect(),
            test_accounts,
            world: World::default(),
            receipts: HashMap::new(),
            block_number: 1,
            unavailable_for: 0,
            pending_polls: 0,
            receipt_polls: 0,
            pending: HashMap::new(),
        }
    }

    pub fn token(&self, address: &AztecAddress) -> Option<&TokenLedger> {
        self.world.tokens.get(address)
    }

    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn is_registered(&self, address: &AztecAddress) -> bool {
        self.accounts.iter().any(|a| a.address == *address)
    }

    fn account(&self, address: &AztecAddress) -> Option<&CompleteAddress> {
        self.accounts.iter().find(|a| a.address == *address)
    }
}

/// A running mock node.
pub struct MockPxe {
    pub url: String,
    pub state: Shared,
}

impl MockPxe {
    /// Start a node with `test_accounts` pre-funded, node-managed accounts.
    pub async fn start(test_accounts: usize) -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::new(test_accounts)));
        let app = Router::new()
            .route("/", post(handle_rpc))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    /// Config pointing at this node with fast polling and a private address book.
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.pxe.url = self.url.clone();
        config.pxe.request_timeout_secs = 5;
        config.wait = WaitConfig {
            ready_max_attempts: 5,
            ready_base_delay_ms: 10,
            ready_max_delay_ms: 50,
            tx_timeout_secs: 5,
            tx_poll_interval_ms: 10,
        };
        config.account.secret_key_env = format!("PXE_TEST_KEY_{}", uuid::Uuid::new_v4().simple());
        config.token.addresses_path = std::env::temp_dir()
            .join(format!("addresses-{}.json", uuid::Uuid::new_v4()))
            .display()
            .to_string();
        config
    }
}

struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn invalid_params(reason: impl std::fmt::Display) -> Self {
        Self::new(-32602, format!("invalid params: {}", reason))
    }
}

async fn handle_rpc(State(state): State<Shared>, Json(request): Json<Value>) -> Json<Value> {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request.get("method").and_then(Value::as_str).unwrap_or_default().to_string();
    let params = request.get("params").cloned().unwrap_or_else(|| json!([]));

    let mut state = state.lock().await;
    let response = match dispatch(&mut state, &method, &params).await {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(e) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": e.code, "message": e.message },
        }),
    };
    Json(response)
}

fn param<T: DeserializeOwned>(params: &Value, idx: usize) -> Result<T, RpcError> {
    serde_json::from_value(params.get(idx).cloned().unwrap_or(Value::Null)).map_err(RpcError::invalid_params)
}

async fn dispatch(state: &mut MockState, method: &str, params: &Value) -> Result<Value, RpcError> {
    match method {
        "pxe_getNodeInfo" => {
            if state.unavailable_for > 0 {
                state.unavailable_for -= 1;
                return Err(RpcError::new(-32603, "node is starting"));
            }
            Ok(json!(NodeInfo {
                node_version: MOCK_NODE_VERSION.to_string(),
                l1_chain_id: 31337,
                rollup_version: 1,
                enr: None,
            }))
        }
        "pxe_getBlockNumber" => Ok(json!(state.block_number)),
        "pxe_getRegisteredAccounts" => Ok(json!(state.accounts)),
        "pxe_getTestAccounts" => {
            let accounts: Vec<_> = state.test_accounts.iter().map(|(a, _)| *a).collect();
            Ok(json!(accounts))
        }
        "pxe_registerAccount" => {
            let account: CompleteAddress = param(params, 0)?;
            account
                .validate()
                .map_err(|e| RpcError::new(-32000, e.to_string()))?;
            if !state.is_registered(&account.address) {
                state.accounts.push(account);
            }
            Ok(Value::Null)
        }
        "pxe_registerContract" => {
            let instance: ContractInstance = param(params, 0)?;
            let artifact: ContractArtifact = param(params, 1)?;
            if artifact.hash() != instance.artifact_hash {
                return Err(RpcError::new(-32000, "artifact does not match instance"));
            }
            state
                .world
                .contracts
                .entry(instance.address)
                .or_insert(RegisteredContract {
                    instance,
                    artifact,
                    initialized: false,
                });
            Ok(Value::Null)
        }
        "pxe_getContractInstance" => {
            let address: AztecAddress = param(params, 0)?;
            Ok(json!(state.world.contracts.get(&address).map(|c| c.instance)))
        }
        "pxe_createAuthWit" => {
            let account: AztecAddress = param(params, 0)?;
            let message_hash: B256 = param(params, 1)?;
            let (_, keys) = state
                .test_accounts
                .iter()
                .find(|(a, _)| a.address == account)
                .ok_or_else(|| RpcError::new(-32003, format!("no keys held for account {}", account)))?;
            let signature = keys
                .sign(message_hash)
                .await
                .map_err(|e| RpcError::new(-32603, e.to_string()))?;
            Ok(json!(AuthWitness::from_signature(message_hash, &signature)))
        }
        "pxe_simulateTx" => {
            let _origin: AztecAddress = param(params, 0)?;
            let call: FunctionCall = param(params, 1)?;
            simulate(&state.world, &call)
        }
        "pxe_sendTx" => {
            let request: TxExecutionRequest = param(params, 0)?;
            send_tx(state, request)
        }
        "pxe_getTxReceipt" => {
            let tx_hash: TxHash = param(params, 0)?;
            state.receipt_polls += 1;
            if let Some(remaining) = state.pending.get_mut(&tx_hash) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Ok(json!(TxReceipt {
                        tx_hash,
                        status: TxStatus::Pending,
                        block_number: None,
                        error: None,
                    }));
                }
            }
            let receipt = state.receipts.get(&tx_hash).cloned().unwrap_or(TxReceipt {
                tx_hash,
                status: TxStatus::Dropped,
                block_number: None,
                error: None,
            });
            Ok(json!(receipt))
        }
        "pxe_getPublicLogs" => {
            let filter: LogFilter = param(params, 0)?;
            let logs: Vec<_> = state
                .world
                .logs
                .iter()
                .filter(|log| filter.from_block.map_or(true, |b| log.block_number >= b))
                .filter(|log| filter.to_block.map_or(true, |b| log.block_number < b))
                .filter(|log| filter.contract_address.map_or(true, |c| log.contract_address == c))
                .cloned()
                .collect();
            Ok(json!(logs))
        }
        other => Err(RpcError::new(-32601, format!("method not found: {}", other))),
    }
}

fn send_tx(state: &mut MockState, request: TxExecutionRequest) -> Result<Value, RpcError> {
    let origin = *state
        .account(&request.origin)
        .ok_or_else(|| RpcError::new(-32000, format!("unknown account {}", request.origin)))?;

    let payload_hash = request.payload.hash();
    let entrypoint_ok = request
        .auth_witnesses
        .first()
        .map_or(false, |w| w.request_hash == payload_hash && w.verify(&origin.public_key));
    if !entrypoint_ok {
        return Err(RpcError::new(-32001, "invalid entrypoint authorization"));
    }

    let is_test_account = state.test_accounts.iter().any(|(a, _)| a.address == origin.address);
    let self_deploys = request
        .payload
        .calls
        .iter()
        .any(|c| c.to == origin.address && c.name == "constructor");
    let deployed = state
        .world
        .contracts
        .get(&origin.address)
        .map_or(false, |c| c.initialized);
    if !is_test_account && !deployed && !self_deploys {
        return Err(RpcError::new(-32002, format!("account contract {} is not deployed", origin.address)));
    }

    let block_number = state.block_number + 1;
    let tx_hash = {
        let mut preimage = payload_hash.to_vec();
        preimage.extend_from_slice(&block_number.to_be_bytes());
        keccak256(&preimage)
    };

    let accounts = state.accounts.clone();
    let mut world = state.world.clone();
    let ctx = TxContext {
        origin: origin.address,
        accounts: &accounts,
        witnesses: &request.auth_witnesses[1..],
        tx_hash,
        block_number,
    };
    let result = request
        .payload
        .calls
        .iter()
        .try_for_each(|call| execute(&mut world, &ctx, call));

    let receipt = match result {
        Ok(()) => {
            state.world = world;
            TxReceipt {
                tx_hash,
                status: TxStatus::Success,
                block_number: Some(block_number),
                error: None,
            }
        }
        Err(reason) => TxReceipt {
            tx_hash,
            status: TxStatus::Reverted,
            block_number: Some(block_number),
            error: Some(reason),
        },
    };
    state.block_number = block_number;
    state.receipts.insert(tx_hash, receipt);
    if state.pending_polls > 0 {
        state.pending.insert(tx_hash, state.pending_polls);
    }
    Ok(json!(tx_hash))
}

struct TxContext<'a> {
    origin: AztecAddress,
    accounts: &'a [CompleteAddress],
    witnesses: &'a [AuthWitness],
    tx_hash: TxHash,
    block_number: u64,
}

impl TxContext<'_> {
    /// `from` approved `call` made by the origin, either by sending it or with a witness.
    fn authorized(&self, from: AztecAddress, call: &FunctionCall) -> bool {
        if from == self.origin {
            return true;
        }
        let Some(account) = self.accounts.iter().find(|a| a.address == from) else {
            return false;
        };
        let expected = compute_auth_wit_message_hash(self.origin, call);
        self.witnesses
            .iter()
            .any(|w| w.request_hash == expected && w.verify(&account.public_key))
    }
}

fn arg<T: DeserializeOwned>(call: &FunctionCall, idx: usize) -> Result<T, String> {
    let value = call
        .args
        .get(idx)
        .cloned()
        .ok_or_else(|| format!("{}: missing argument {}", call.name, idx))?;
    serde_json::from_value(value).map_err(|e| format!("{}: bad argument {}: {}", call.name, idx, e))
}

fn amount(call: &FunctionCall, idx: usize) -> Result<u128, String> {
    let raw: U256 = arg(call, idx)?;
    u128::try_from(raw).map_err(|_| format!("{}: amount overflows u128", call.name))
}

fn debit(balances: &mut HashMap<AztecAddress, u128>, owner: AztecAddress, amount: u128) -> Result<(), String> {
    let balance = balances.entry(owner).or_default();
    if *balance < amount {
        return Err("Balance too low".to_string());
    }
    *balance -= amount;
    Ok(())
}

fn execute(world: &mut World, ctx: &TxContext<'_>, call: &FunctionCall) -> Result<(), String> {
    let contract = world
        .contracts
        .get_mut(&call.to)
        .ok_or_else(|| format!("unknown contract {}", call.to))?;
    let is_initializer = contract
        .artifact
        .function(&call.name)
        .map_err(|e| e.to_string())?
        .is_initializer;

    if is_initializer {
        if contract.initialized {
            return Err(format!("contract {} already initialized", call.to));
        }
        contract.initialized = true;
        if contract.artifact.name == "Token" {
            let admin: AztecAddress = arg(call, 0)?;
            world.tokens.insert(
                call.to,
                TokenLedger {
                    admin,
                    ..TokenLedger::default()
                },
            );
        }
        return Ok(());
    }
    if !contract.initialized {
        return Err(format!("contract {} is not initialized", call.to));
    }

    let ledger = world
        .tokens
        .get_mut(&call.to)
        .ok_or_else(|| format!("{} is not callable on {}", call.name, call.to))?;

    match call.name.as_str() {
        "mint_to_private" => {
            let from: AztecAddress = arg(call, 0)?;
            let to: AztecAddress = arg(call, 1)?;
            let amount = amount(call, 2)?;
            if from != ledger.admin || !ctx.authorized(from, call) {
                return Err("caller is not minter".to_string());
            }
            *ledger.private.entry(to).or_default() += amount;
            ledger.total_supply += amount;
        }
        "mint_to_public" => {
            let to: AztecAddress = arg(call, 0)?;
            let amount = amount(call, 1)?;
            if ctx.origin != ledger.admin {
                return Err("caller is not minter".to_string());
            }
            *ledger.public.entry(to).or_default() += amount;
            ledger.total_supply += amount;
            world.logs.push(ExtendedPublicLog {
                block_number: ctx.block_number,
                tx_hash: ctx.tx_hash,
                contract_address: call.to,
                fields: vec![U256::from_be_slice(to.as_slice()), U256::from(amount)],
            });
        }
        "transfer" => {
            let to: AztecAddress = arg(call, 0)?;
            let amount = amount(call, 1)?;
            debit(&mut ledger.private, ctx.origin, amount)?;
            *ledger.private.entry(to).or_default() += amount;
        }
        "transfer_in_private" | "transfer_in_public" => {
            let from: AztecAddress = arg(call, 0)?;
            let to: AztecAddress = arg(call, 1)?;
            let amount = amount(call, 2)?;
            if !ctx.authorized(from, call) {
                return Err(format!("unauthorized transfer from {}", from));
            }
            let balances = if call.name == "transfer_in_private" {
                &mut ledger.private
            } else {
                &mut ledger.public
            };
            debit(balances, from, amount)?;
            *balances.entry(to).or_default() += amount;
        }
        other => return Err(format!("{} cannot be executed", other)),
    }
    Ok(())
}

fn simulate(world: &World, call: &FunctionCall) -> Result<Value, RpcError> {
    let ledger = world
        .tokens
        .get(&call.to)
        .ok_or_else(|| RpcError::new(-32000, format!("no token at {}", call.to)))?;
    let owner = || -> Result<AztecAddress, RpcError> {
        serde_json::from_value(call.args.first().cloned().unwrap_or(Value::Null)).map_err(RpcError::invalid_params)
    };

    let value = match call.name.as_str() {
        "balance_of_private" => ledger.private.get(&owner()?).copied().unwrap_or_default(),
        "balance_of_public" => ledger.public.get(&owner()?).copied().unwrap_or_default(),
        "total_supply" => ledger.total_supply,
        other => return Err(RpcError::new(-32000, format!("{} is not a view", other))),
    };
    Ok(json!(U256::from(value)))
}
