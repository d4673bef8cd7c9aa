use solana_sdk::{message::VersionedMessage, pubkey::Pubkey};
use thiserror::Error;

pub type SdkResult<T> = Result<T, SdkError>;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("http fail")]
    Http(#[from] reqwest::Error),
    #[error("rpc fail")]
    Rpc(#[from] solana_client::client_error::ClientError),
    #[error("indexer fail: {0}")]
    Indexer(String),
    #[error("invalid parameter: {0}")]
    Validation(&'static str),
    #[error("order not found")]
    OrderNotFound,
    #[error("no validity proof")]
    ProofUnavailable,
    #[error("buffer too short: {len} < {min}")]
    TooShort { len: usize, min: usize },
    #[error("malformed event payload")]
    InvalidEvent,
    #[error("error while deserializing")]
    Deserializing,
    #[error("tx message compile fail")]
    TxCompile,
    #[error("signing fail")]
    Signing(#[from] solana_sdk::signer::SignerError),
}

/// How a mint is represented on the transfer path.
///
/// Native SOL must be wrapped into its token-program form for the duration of
/// the transaction; standard tokens transfer as-is. Resolved once per build,
/// branched on explicitly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Native,
    Standard,
}

impl AssetKind {
    pub fn of(mint: &Pubkey) -> Self {
        if *mint == spl_token::native_mint::ID {
            Self::Native
        } else {
            Self::Standard
        }
    }
    pub fn is_native(self) -> bool {
        matches!(self, Self::Native)
    }
}

/// Caller intent for a new limit order
#[derive(Clone, Debug)]
pub struct NewOrder {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub input_token_program: Pubkey,
    pub output_token_program: Pubkey,
    pub making_amount: u64,
    pub taking_amount: u64,
    /// epoch seconds, 0 = never expires
    pub expired_at: i64,
}

impl NewOrder {
    /// New order intent selling `making_amount` of `input_mint` for
    /// `taking_amount` of `output_mint`, never expiring, both sides on the
    /// standard token program
    pub fn new(
        input_mint: Pubkey,
        output_mint: Pubkey,
        making_amount: u64,
        taking_amount: u64,
    ) -> Self {
        Self {
            input_mint,
            output_mint,
            input_token_program: spl_token::ID,
            output_token_program: spl_token::ID,
            making_amount,
            taking_amount,
            expired_at: 0,
        }
    }
    /// Set the token programs governing each side (token-2022 mints)
    pub fn token_programs(mut self, input: Pubkey, output: Pubkey) -> Self {
        self.input_token_program = input;
        self.output_token_program = output;
        self
    }
    /// Set order expiry as epoch seconds (0 = never)
    pub fn expires_at(mut self, expired_at: i64) -> Self {
        self.expired_at = expired_at;
        self
    }

    pub(crate) fn validate(&self) -> SdkResult<()> {
        if self.making_amount == 0 {
            return Err(SdkError::Validation("making_amount must be positive"));
        }
        if self.taking_amount == 0 {
            return Err(SdkError::Validation("taking_amount must be positive"));
        }
        if self.input_mint == self.output_mint {
            return Err(SdkError::Validation("input and output mints are equal"));
        }
        if self.expired_at < 0 {
            return Err(SdkError::Validation("expired_at before epoch"));
        }
        Ok(())
    }
}

/// Requested changes to an open order; `None` keeps the current value
#[derive(Copy, Clone, Debug, Default)]
pub struct OrderChanges {
    pub making_amount: Option<u64>,
    pub taking_amount: Option<u64>,
    pub expired_at: Option<i64>,
}

impl OrderChanges {
    pub(crate) fn validate(&self) -> SdkResult<()> {
        if self.making_amount.is_none()
            && self.taking_amount.is_none()
            && self.expired_at.is_none()
        {
            return Err(SdkError::Validation("no changes requested"));
        }
        if self.making_amount == Some(0) || self.taking_amount == Some(0) {
            return Err(SdkError::Validation("amounts must be positive"));
        }
        Ok(())
    }
}

/// Result of building an order initialization: the signable tx plus the
/// caller-derived identity of the order it will create
#[derive(Clone, Debug)]
pub struct InitOrder {
    pub tx: VersionedMessage,
    pub order_address: Pubkey,
    pub unique_id: u64,
}
