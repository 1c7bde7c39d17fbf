//! Fake JSON-RPC node for integration tests.
//!
//! Serves the handful of `eth_*` methods the client uses, backed by an
//! in-memory payroll contract. Writes are applied on submission; their
//! receipts appear after `receipt_delay` null polls.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use payroll_client::abi::{self, Token};
use payroll_client::{Address, Bytes, U256};
use serde_json::{json, Value};

pub const DEPLOYED_AT: Address = Address::from_bytes([0xcd; 20]);

pub struct NodeState {
    pub chain_id: u64,
    pub accounts: Vec<Address>,
    pub payroll: Address,
    pub token: Address,
    pub employees: Vec<(Address, U256, bool)>,
    pub balance: U256,
    pub supports_request_accounts: bool,
    pub receipt_delay: usize,
    pub revert_writes: bool,
    /// Calls served, keyed by method or by contract function signature.
    pub calls: HashMap<String, usize>,
    receipts: HashMap<String, (usize, Value)>,
    next_tx: u64,
}

impl NodeState {
    pub fn new(payroll: Address, token: Address) -> Self {
        Self {
            chain_id: 5_042_002,
            accounts: vec![Address::from_bytes([0x0a; 20])],
            payroll,
            token,
            employees: Vec::new(),
            balance: U256::zero(),
            supports_request_accounts: true,
            receipt_delay: 0,
            revert_writes: false,
            calls: HashMap::new(),
            receipts: HashMap::new(),
            next_tx: 0,
        }
    }

    pub fn calls_to(&self, key: &str) -> usize {
        self.calls.get(key).copied().unwrap_or(0)
    }

    fn bump(&mut self, key: &str) {
        *self.calls.entry(key.to_string()).or_default() += 1;
    }

    fn dispatch(&mut self, method: &str, params: &Value) -> Result<Value, (i64, String)> {
        self.bump(method);
        match method {
            "eth_chainId" => Ok(json!(format!("{:#x}", self.chain_id))),
            "eth_accounts" => Ok(json!(self.accounts)),
            "eth_requestAccounts" if self.supports_request_accounts => Ok(json!(self.accounts)),
            "eth_call" => self.eth_call(&params[0]),
            "eth_sendTransaction" => self.send_transaction(&params[0]),
            "eth_getTransactionReceipt" => Ok(self.receipt(&params[0])),
            _ => Err((-32601, format!("the method {method} does not exist/is not available"))),
        }
    }

    fn eth_call(&mut self, call: &Value) -> Result<Value, (i64, String)> {
        let to: Address = serde_json::from_value(call["to"].clone()).map_err(bad_params)?;
        let data = decode_data(&call["data"])?;
        let (selector, args) = data.split_at(4);

        let out = if to == self.token && selector == abi::selector(abi::BALANCE_OF) {
            self.bump(abi::BALANCE_OF);
            let owner = abi::decode_address(args, 0).map_err(bad_params)?;
            let balance = if owner == self.payroll {
                self.balance
            } else {
                U256::zero()
            };
            abi::encode_args(&[Token::Uint(balance)])
        } else if to != self.payroll {
            return Ok(json!("0x"));
        } else if selector == abi::selector(abi::GET_EMPLOYEE_COUNT) {
            self.bump(abi::GET_EMPLOYEE_COUNT);
            abi::encode_args(&[Token::Uint(U256::from(self.employees.len()))])
        } else if selector == abi::selector(abi::EMPLOYEE_ADDRESSES) {
            self.bump(abi::EMPLOYEE_ADDRESSES);
            let index = abi::decode_uint(args, 0).map_err(bad_params)?;
            let (wallet, _, _) = self
                .employees
                .get(index.low_u64() as usize)
                .ok_or((3, "execution reverted".to_string()))?;
            abi::encode_args(&[Token::Address(*wallet)])
        } else if selector == abi::selector(abi::EMPLOYEES) {
            self.bump(abi::EMPLOYEES);
            let wallet = abi::decode_address(args, 0).map_err(bad_params)?;
            let (w, salary, active) = self
                .employees
                .iter()
                .find(|(w, _, _)| *w == wallet)
                .copied()
                .unwrap_or((Address::ZERO, U256::zero(), false));
            abi::encode_args(&[Token::Address(w), Token::Uint(salary), Token::Bool(active)])
        } else if selector == abi::selector(abi::OWNER) {
            abi::encode_args(&[Token::Address(self.accounts[0])])
        } else if selector == abi::selector(abi::USDC_TOKEN) {
            abi::encode_args(&[Token::Address(self.token)])
        } else {
            return Err((3, "execution reverted: unknown selector".to_string()));
        };

        Ok(json!(format!("0x{}", hex::encode(out))))
    }

    fn send_transaction(&mut self, tx: &Value) -> Result<Value, (i64, String)> {
        let data = decode_data(&tx["data"])?;
        self.next_tx += 1;
        let hash = format!("0x{:064x}", self.next_tx);

        let creation = tx.get("to").map_or(true, Value::is_null);
        let ok = if creation {
            true
        } else {
            !self.revert_writes && self.apply(&data)
        };

        let receipt = json!({
            "transactionHash": hash,
            "blockNumber": format!("{:#x}", self.next_tx),
            "status": if ok { "0x1" } else { "0x0" },
            "contractAddress": if creation { json!(DEPLOYED_AT) } else { Value::Null },
        });
        self.receipts.insert(hash.clone(), (self.receipt_delay, receipt));
        Ok(json!(hash))
    }

    fn apply(&mut self, data: &[u8]) -> bool {
        let (selector, args) = data.split_at(4);
        if selector == abi::selector(abi::ADD_EMPLOYEE) {
            let (Ok(wallet), Ok(salary)) = (abi::decode_address(args, 0), abi::decode_uint(args, 1))
            else {
                return false;
            };
            if self.employees.iter().any(|(w, _, _)| *w == wallet) {
                return false;
            }
            self.employees.push((wallet, salary, true));
            true
        } else if selector == abi::selector(abi::REMOVE_EMPLOYEE) {
            let Ok(wallet) = abi::decode_address(args, 0) else {
                return false;
            };
            match self.employees.iter_mut().find(|(w, _, _)| *w == wallet) {
                Some(entry) if entry.2 => {
                    entry.2 = false;
                    true
                }
                _ => false,
            }
        } else if selector == abi::selector(abi::PAY_SALARIES) {
            let total = self
                .employees
                .iter()
                .filter(|(_, _, active)| *active)
                .fold(U256::zero(), |acc, (_, salary, _)| acc + *salary);
            if total > self.balance {
                return false;
            }
            self.balance -= total;
            true
        } else {
            false
        }
    }

    fn receipt(&mut self, hash: &Value) -> Value {
        let Some(hash) = hash.as_str() else {
            return Value::Null;
        };
        match self.receipts.get_mut(hash) {
            Some((0, receipt)) => receipt.clone(),
            Some((remaining, _)) => {
                *remaining -= 1;
                Value::Null
            }
            None => Value::Null,
        }
    }
}

fn decode_data(value: &Value) -> Result<Vec<u8>, (i64, String)> {
    let s = value.as_str().ok_or((-32602, "missing data".to_string()))?;
    Bytes::from_hex(s).map(Bytes::into_vec).map_err(bad_params)
}

fn bad_params(e: impl std::fmt::Display) -> (i64, String) {
    (-32602, format!("invalid params: {e}"))
}

pub type SharedNode = Arc<Mutex<NodeState>>;

async fn handle(State(node): State<SharedNode>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let result = node.lock().dispatch(&method, &request["params"]);

    Json(match result {
        Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
        Err((code, message)) => {
            json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}})
        }
    })
}

/// Serve `node` on an ephemeral port and return its URL.
pub async fn spawn_node(node: SharedNode) -> String {
    let app = Router::new().route("/", post(handle)).with_state(node);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn wallet(n: u8) -> Address {
    Address::from_bytes([n; 20])
}
