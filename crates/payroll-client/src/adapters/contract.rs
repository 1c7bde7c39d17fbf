//! Typed payroll contract adapter over a [`ChainProvider`].

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::abi::{self, Token};
use crate::domain::{
    Address, Bytes, CallRequest, EmployeeRecord, PayrollCall, ReadError, SubmitError,
    TokenAmount, TransactionRequest, TxHash, TxReceipt, U256,
};
use crate::ports::{ChainProvider, PayrollReader, PayrollWriter};

/// The payroll contract at `address`, paying out in `token`.
pub struct PayrollContract<P> {
    provider: P,
    address: Address,
    token: Address,
}

impl<P: ChainProvider> PayrollContract<P> {
    pub fn new(provider: P, address: Address, token: Address) -> Self {
        Self {
            provider,
            address,
            token,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn token(&self) -> Address {
        self.token
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn read(&self, to: Address, data: Bytes) -> Result<Bytes, ReadError> {
        let request = CallRequest {
            from: None,
            to,
            data,
        };
        Ok(self.provider.call(&request).await?)
    }

    /// `owner()`.
    pub async fn owner(&self) -> Result<Address, ReadError> {
        let out = self
            .read(self.address, abi::encode_call(abi::OWNER, &[]))
            .await?;
        Ok(abi::decode_address(out.as_slice(), 0)?)
    }

    /// `usdcToken()`: the token the contract was constructed with.
    pub async fn usdc_token(&self) -> Result<Address, ReadError> {
        let out = self
            .read(self.address, abi::encode_call(abi::USDC_TOKEN, &[]))
            .await?;
        Ok(abi::decode_address(out.as_slice(), 0)?)
    }
}

#[async_trait]
impl<P: ChainProvider> PayrollReader for PayrollContract<P> {
    async fn employee_count(&self) -> Result<U256, ReadError> {
        let out = self
            .read(self.address, abi::encode_call(abi::GET_EMPLOYEE_COUNT, &[]))
            .await?;
        Ok(abi::decode_uint(out.as_slice(), 0)?)
    }

    async fn employee_address(&self, index: U256) -> Result<Address, ReadError> {
        let data = abi::encode_call(abi::EMPLOYEE_ADDRESSES, &[Token::Uint(index)]);
        let out = self.read(self.address, data).await?;
        Ok(abi::decode_address(out.as_slice(), 0)?)
    }

    async fn employee(&self, wallet: Address) -> Result<EmployeeRecord, ReadError> {
        let data = abi::encode_call(abi::EMPLOYEES, &[Token::Address(wallet)]);
        let out = self.read(self.address, data).await?;
        Ok(abi::decode_employee(out.as_slice())?)
    }

    async fn contract_balance(&self) -> Result<TokenAmount, ReadError> {
        let data = abi::encode_call(abi::BALANCE_OF, &[Token::Address(self.address)]);
        let out = self.read(self.token, data).await?;
        Ok(TokenAmount::from_raw(abi::decode_uint(out.as_slice(), 0)?))
    }
}

#[async_trait]
impl<P: ChainProvider> PayrollWriter for PayrollContract<P> {
    async fn submit(&self, from: Address, call: PayrollCall) -> Result<TxHash, SubmitError> {
        let request = TransactionRequest {
            from,
            to: Some(self.address),
            data: call.encode(),
        };

        debug!(from = %from, action = ?call.kind(), "submitting transaction");

        match self.provider.send_transaction(&request).await {
            Ok(hash) => {
                info!(tx_hash = %hash, action = ?call.kind(), "transaction submitted");
                Ok(hash)
            }
            Err(e) => {
                warn!(error = %e, action = ?call.kind(), "transaction submission failed");
                Err(e.into())
            }
        }
    }

    async fn receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>, ReadError> {
        Ok(self.provider.transaction_receipt(hash).await?)
    }
}
