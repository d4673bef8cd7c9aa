//! Decoding of order events from historical transaction logs.
//!
//! The program emits four discriminator-tagged events as base64 `Program
//! data:` log lines. Unmatched lines are expected noise and skipped;
//! a matched discriminator with a truncated body is a protocol violation
//! and surfaces as an error.

use futures_util::{future::BoxFuture, FutureExt};
use log::{debug, warn};
use solana_client::{
    nonblocking::rpc_client::RpcClient, rpc_client::GetConfirmedSignaturesForAddress2Config,
};
use solana_sdk::{pubkey::Pubkey, signature::Signature, transaction::VersionedTransaction};
use solana_transaction_status::{
    option_serializer::OptionSerializer, EncodedConfirmedTransactionWithStatusMeta,
    UiTransactionEncoding,
};

use crate::{
    constants::PROGRAM_ID,
    types::{SdkError, SdkResult},
};

const LOG_TARGET: &str = "events";

const PROGRAM_LOG: &str = "Program log: ";
const PROGRAM_DATA: &str = "Program data: ";

pub const ORDER_INITIALIZED_DISCRIMINATOR: [u8; 8] = [180, 118, 44, 249, 166, 25, 40, 81];
pub const ORDER_CANCELLED_DISCRIMINATOR: [u8; 8] = [108, 56, 128, 68, 168, 113, 168, 239];
pub const ORDER_UPDATE_DISCRIMINATOR: [u8; 8] = [74, 87, 9, 53, 182, 80, 78, 75];
pub const FILL_DISCRIMINATOR: [u8; 8] = [13, 89, 41, 228, 105, 178, 45, 112];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FillKind {
    Full,
    Partial,
}

/// Raw decoded program event, field-for-field as emitted on-chain
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderEvent {
    Initialized {
        escrow_address: Pubkey,
        maker: Pubkey,
        unique_id: u64,
        input_mint: Pubkey,
        output_mint: Pubkey,
        input_mint_decimals: u8,
        output_mint_decimals: u8,
        making_amount: u64,
        taking_amount: u64,
        expired_at: i64,
    },
    Cancelled {
        escrow_address: Pubkey,
        maker: Pubkey,
        unique_id: u64,
        input_mint: Pubkey,
        output_mint: Pubkey,
        making_amount: u64,
        taking_amount: u64,
        is_expired: bool,
        cancelled_by: Pubkey,
        timestamp: i64,
    },
    Updated {
        escrow_address: Pubkey,
        maker: Pubkey,
        unique_id: u64,
        input_mint: Pubkey,
        output_mint: Pubkey,
        input_mint_decimals: u8,
        output_mint_decimals: u8,
        making_amount: u64,
        taking_amount: u64,
        expired_at: i64,
    },
    Fill {
        escrow_address: Pubkey,
        maker: Pubkey,
        input_mint: Pubkey,
        output_mint: Pubkey,
        unique_id: u64,
        in_amount: u64,
        out_amount: u64,
        fee_bps: u16,
        kind: FillKind,
    },
}

/// Activity kinds shown to users; cancel/fill sub-cases are collapsed here
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HistoryKind {
    Init,
    Fill,
    PartialFill,
    Cancel,
    Expire,
    Update,
}

impl HistoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Fill => "fill",
            Self::PartialFill => "partial fill",
            Self::Cancel => "cancel",
            Self::Expire => "expire",
            Self::Update => "update",
        }
    }
}

/// Normalized projection of one event for activity history
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRecord {
    pub kind: HistoryKind,
    pub signature: String,
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub making_amount: u64,
    pub taking_amount: u64,
    /// block time, epoch seconds
    pub timestamp: i64,
}

impl HistoryRecord {
    fn from_event(event: OrderEvent, signature: &str, timestamp: i64) -> Self {
        let signature = signature.to_string();
        match event {
            OrderEvent::Initialized {
                input_mint,
                output_mint,
                making_amount,
                taking_amount,
                ..
            } => Self {
                kind: HistoryKind::Init,
                signature,
                input_mint,
                output_mint,
                making_amount,
                taking_amount,
                timestamp,
            },
            OrderEvent::Cancelled {
                input_mint,
                output_mint,
                making_amount,
                taking_amount,
                is_expired,
                ..
            } => Self {
                kind: if is_expired {
                    HistoryKind::Expire
                } else {
                    HistoryKind::Cancel
                },
                signature,
                input_mint,
                output_mint,
                making_amount,
                taking_amount,
                timestamp,
            },
            OrderEvent::Updated {
                input_mint,
                output_mint,
                making_amount,
                taking_amount,
                ..
            } => Self {
                kind: HistoryKind::Update,
                signature,
                input_mint,
                output_mint,
                making_amount,
                taking_amount,
                timestamp,
            },
            OrderEvent::Fill {
                input_mint,
                output_mint,
                in_amount,
                out_amount,
                kind,
                ..
            } => Self {
                kind: match kind {
                    FillKind::Full => HistoryKind::Fill,
                    FillKind::Partial => HistoryKind::PartialFill,
                },
                signature,
                input_mint,
                output_mint,
                making_amount: in_amount,
                taking_amount: out_amount,
                timestamp,
            },
        }
    }
}

/// Try to decode an order event from one raw log line.
///
/// `Ok(None)` means the line is not an event of interest (the common case);
/// an `Err` means a recognized discriminator with a malformed body.
pub fn try_parse_log(raw: &str) -> SdkResult<Option<OrderEvent>> {
    let Some(encoded) = raw
        .strip_prefix(PROGRAM_DATA)
        .or_else(|| raw.strip_prefix(PROGRAM_LOG))
    else {
        return Ok(None);
    };

    let Ok(payload) = base64::decode(encoded) else {
        // plain-text program logs land here too
        return Ok(None);
    };
    if payload.len() < 8 {
        return Ok(None);
    }

    let (disc, body) = payload.split_at(8);
    match disc {
        d if d == ORDER_INITIALIZED_DISCRIMINATOR => decode_initialized(body).map(Some),
        d if d == ORDER_CANCELLED_DISCRIMINATOR => decode_cancelled(body).map(Some),
        d if d == ORDER_UPDATE_DISCRIMINATOR => decode_updated(body).map(Some),
        d if d == FILL_DISCRIMINATOR => decode_fill(body).map(Some),
        _ => Ok(None),
    }
}

fn decode_initialized(body: &[u8]) -> SdkResult<OrderEvent> {
    let mut c = Cursor::new(body);
    Ok(OrderEvent::Initialized {
        escrow_address: c.pubkey()?,
        maker: c.pubkey()?,
        unique_id: c.u64_le()?,
        input_mint: c.pubkey()?,
        output_mint: c.pubkey()?,
        input_mint_decimals: c.u8()?,
        output_mint_decimals: c.u8()?,
        making_amount: c.u64_le()?,
        taking_amount: c.u64_le()?,
        expired_at: c.i64_le()?,
    })
}

fn decode_cancelled(body: &[u8]) -> SdkResult<OrderEvent> {
    let mut c = Cursor::new(body);
    Ok(OrderEvent::Cancelled {
        escrow_address: c.pubkey()?,
        maker: c.pubkey()?,
        unique_id: c.u64_le()?,
        input_mint: c.pubkey()?,
        output_mint: c.pubkey()?,
        making_amount: c.u64_le()?,
        taking_amount: c.u64_le()?,
        is_expired: c.u8()? == 1,
        cancelled_by: c.pubkey()?,
        timestamp: c.i64_le()?,
    })
}

fn decode_updated(body: &[u8]) -> SdkResult<OrderEvent> {
    let mut c = Cursor::new(body);
    Ok(OrderEvent::Updated {
        escrow_address: c.pubkey()?,
        maker: c.pubkey()?,
        unique_id: c.u64_le()?,
        input_mint: c.pubkey()?,
        output_mint: c.pubkey()?,
        input_mint_decimals: c.u8()?,
        output_mint_decimals: c.u8()?,
        making_amount: c.u64_le()?,
        taking_amount: c.u64_le()?,
        expired_at: c.i64_le()?,
    })
}

fn decode_fill(body: &[u8]) -> SdkResult<OrderEvent> {
    let mut c = Cursor::new(body);
    Ok(OrderEvent::Fill {
        escrow_address: c.pubkey()?,
        maker: c.pubkey()?,
        input_mint: c.pubkey()?,
        output_mint: c.pubkey()?,
        unique_id: c.u64_le()?,
        in_amount: c.u64_le()?,
        out_amount: c.u64_le()?,
        fee_bps: c.u16_le()?,
        kind: if c.u8()? == 0 {
            FillKind::Full
        } else {
            FillKind::Partial
        },
    })
}

/// Sequential fixed-width reader over an event body
struct Cursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }
    fn take(&mut self, n: usize) -> SdkResult<&'a [u8]> {
        let end = self.offset + n;
        let slice = self.buf.get(self.offset..end).ok_or(SdkError::InvalidEvent)?;
        self.offset = end;
        Ok(slice)
    }
    fn pubkey(&mut self) -> SdkResult<Pubkey> {
        Ok(Pubkey::try_from(self.take(32)?).expect("32 byte slice"))
    }
    fn u64_le(&mut self) -> SdkResult<u64> {
        Ok(u64::from_le_bytes(
            self.take(8)?.try_into().expect("8 byte slice"),
        ))
    }
    fn i64_le(&mut self) -> SdkResult<i64> {
        Ok(i64::from_le_bytes(
            self.take(8)?.try_into().expect("8 byte slice"),
        ))
    }
    fn u16_le(&mut self) -> SdkResult<u16> {
        Ok(u16::from_le_bytes(
            self.take(2)?.try_into().expect("2 byte slice"),
        ))
    }
    fn u8(&mut self) -> SdkResult<u8> {
        Ok(self.take(1)?[0])
    }
}

/// RPC surface needed to reconstruct order history
pub trait EventRpcProvider: Send + Sync + 'static {
    /// Fetch recent tx signatures of `account`, newest first, at most `limit`
    fn get_tx_signatures(
        &self,
        account: Pubkey,
        limit: Option<usize>,
    ) -> BoxFuture<SdkResult<Vec<String>>>;
    /// Fetch tx with `signature`, with decoded log messages
    fn get_tx(
        &self,
        signature: Signature,
    ) -> BoxFuture<SdkResult<EncodedConfirmedTransactionWithStatusMeta>>;
}

impl EventRpcProvider for RpcClient {
    fn get_tx_signatures(
        &self,
        account: Pubkey,
        limit: Option<usize>,
    ) -> BoxFuture<SdkResult<Vec<String>>> {
        async move {
            let results = self
                .get_signatures_for_address_with_config(
                    &account,
                    GetConfirmedSignaturesForAddress2Config {
                        limit,
                        ..Default::default()
                    },
                )
                .await?;

            Ok(results.iter().map(|r| r.signature.clone()).collect())
        }
        .boxed()
    }
    fn get_tx(
        &self,
        signature: Signature,
    ) -> BoxFuture<SdkResult<EncodedConfirmedTransactionWithStatusMeta>> {
        async move {
            let result = self
                .get_transaction_with_config(
                    &signature,
                    solana_client::rpc_config::RpcTransactionConfig {
                        encoding: Some(UiTransactionEncoding::Base64),
                        max_supported_transaction_version: Some(0),
                        ..Default::default()
                    },
                )
                .await?;

            Ok(result)
        }
        .boxed()
    }
}

/// Reconstruct a maker's recent order activity from historical tx logs.
///
/// Scans at most `limit` recent transactions mentioning `maker`, keeping
/// only those that interacted with the order program. Events come back
/// oldest-last (RPC signature order, newest first).
pub async fn fetch_history(
    provider: &impl EventRpcProvider,
    maker: Pubkey,
    limit: usize,
) -> SdkResult<Vec<HistoryRecord>> {
    let signatures = provider.get_tx_signatures(maker, Some(limit)).await?;
    debug!(target: LOG_TARGET, "history scan: {} txs for {maker}", signatures.len());

    let mut records = Vec::new();
    for signature in signatures {
        let sig = signature
            .parse::<Signature>()
            .map_err(|_| SdkError::Deserializing)?;
        let tx = provider.get_tx(sig).await?;

        let Some(meta) = tx.transaction.meta else {
            continue;
        };
        // failed txs emit no effects worth reporting
        if meta.err.is_some() {
            continue;
        }

        if let Some(VersionedTransaction { message, .. }) = tx.transaction.transaction.decode() {
            if !message
                .static_account_keys()
                .iter()
                .any(|k| k == &PROGRAM_ID)
            {
                continue;
            }
        }

        let timestamp = tx.block_time.unwrap_or_default();
        if let OptionSerializer::Some(logs) = meta.log_messages {
            for log in logs {
                match try_parse_log(&log) {
                    Ok(Some(event)) => {
                        records.push(HistoryRecord::from_event(event, &signature, timestamp))
                    }
                    Ok(None) => {}
                    Err(err) => {
                        warn!(target: LOG_TARGET, "bad event payload in {signature}: {err}");
                        return Err(err);
                    }
                }
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_log(disc: [u8; 8], body: &[u8]) -> String {
        let mut payload = disc.to_vec();
        payload.extend_from_slice(body);
        format!("{PROGRAM_DATA}{}", base64::encode(payload))
    }

    fn init_body(
        escrow: &Pubkey,
        maker: &Pubkey,
        unique_id: u64,
        input_mint: &Pubkey,
        output_mint: &Pubkey,
        making: u64,
        taking: u64,
        expired_at: i64,
    ) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(escrow.as_ref());
        body.extend_from_slice(maker.as_ref());
        body.extend_from_slice(&unique_id.to_le_bytes());
        body.extend_from_slice(input_mint.as_ref());
        body.extend_from_slice(output_mint.as_ref());
        body.push(9); // input decimals
        body.push(6); // output decimals
        body.extend_from_slice(&making.to_le_bytes());
        body.extend_from_slice(&taking.to_le_bytes());
        body.extend_from_slice(&expired_at.to_le_bytes());
        body
    }

    #[test]
    fn unrelated_lines_are_skipped() {
        for line in [
            "Program 4LhEEtzAhM6wEXJR2YQHPEs79UEx8e6HncmeHbqbW1w1 invoke [1]",
            "Program log: Instruction: InitializeOrder",
            "Program log: not base64 at all!!!",
            "Program consumption: 180000 units remaining",
        ] {
            assert_eq!(try_parse_log(line).unwrap(), None);
        }
    }

    #[test]
    fn unknown_discriminator_is_not_an_error() {
        let line = encode_log([1, 2, 3, 4, 5, 6, 7, 8], &[0u8; 64]);
        assert_eq!(try_parse_log(&line).unwrap(), None);
    }

    #[test]
    fn decodes_initialized() {
        let escrow = Pubkey::new_unique();
        let maker = Pubkey::new_unique();
        let input_mint = Pubkey::new_unique();
        let output_mint = Pubkey::new_unique();
        let body = init_body(
            &escrow,
            &maker,
            42,
            &input_mint,
            &output_mint,
            1_000_000,
            2_000_000,
            0,
        );
        let line = encode_log(ORDER_INITIALIZED_DISCRIMINATOR, &body);

        let event = try_parse_log(&line).unwrap().unwrap();
        assert_eq!(
            event,
            OrderEvent::Initialized {
                escrow_address: escrow,
                maker,
                unique_id: 42,
                input_mint,
                output_mint,
                input_mint_decimals: 9,
                output_mint_decimals: 6,
                making_amount: 1_000_000,
                taking_amount: 2_000_000,
                expired_at: 0,
            }
        );
    }

    #[test]
    fn decodes_cancelled_and_expire_flag() {
        let escrow = Pubkey::new_unique();
        let maker = Pubkey::new_unique();
        let keeper = Pubkey::new_unique();
        let input_mint = Pubkey::new_unique();
        let output_mint = Pubkey::new_unique();

        for (flag, expect_kind) in [(0u8, HistoryKind::Cancel), (1u8, HistoryKind::Expire)] {
            let mut body = Vec::new();
            body.extend_from_slice(escrow.as_ref());
            body.extend_from_slice(maker.as_ref());
            body.extend_from_slice(&7u64.to_le_bytes());
            body.extend_from_slice(input_mint.as_ref());
            body.extend_from_slice(output_mint.as_ref());
            body.extend_from_slice(&500u64.to_le_bytes());
            body.extend_from_slice(&900u64.to_le_bytes());
            body.push(flag);
            body.extend_from_slice(keeper.as_ref());
            body.extend_from_slice(&1_700_000_000i64.to_le_bytes());

            let line = encode_log(ORDER_CANCELLED_DISCRIMINATOR, &body);
            let event = try_parse_log(&line).unwrap().unwrap();
            match &event {
                OrderEvent::Cancelled {
                    is_expired,
                    cancelled_by,
                    ..
                } => {
                    assert_eq!(*is_expired, flag == 1);
                    assert_eq!(*cancelled_by, keeper);
                }
                other => panic!("expected Cancelled, got {other:?}"),
            }
            let record = HistoryRecord::from_event(event, "sig", 1_700_000_000);
            assert_eq!(record.kind, expect_kind);
        }
    }

    #[test]
    fn fill_kind_collapses() {
        let mut body = Vec::new();
        for _ in 0..4 {
            body.extend_from_slice(Pubkey::new_unique().as_ref());
        }
        body.extend_from_slice(&9u64.to_le_bytes()); // unique_id
        body.extend_from_slice(&250u64.to_le_bytes()); // in
        body.extend_from_slice(&400u64.to_le_bytes()); // out
        body.extend_from_slice(&5u16.to_le_bytes()); // fee bps
        body.push(1); // partial

        let line = encode_log(FILL_DISCRIMINATOR, &body);
        let event = try_parse_log(&line).unwrap().unwrap();
        let record = HistoryRecord::from_event(event, "sig", 0);
        assert_eq!(record.kind, HistoryKind::PartialFill);
        assert_eq!(record.making_amount, 250);
        assert_eq!(record.taking_amount, 400);
        assert_eq!(record.kind.as_str(), "partial fill");
    }

    #[test]
    fn truncated_body_after_discriminator_is_an_error() {
        for disc in [
            ORDER_INITIALIZED_DISCRIMINATOR,
            ORDER_CANCELLED_DISCRIMINATOR,
            ORDER_UPDATE_DISCRIMINATOR,
            FILL_DISCRIMINATOR,
        ] {
            let line = encode_log(disc, &[0u8; 40]);
            assert!(matches!(try_parse_log(&line), Err(SdkError::InvalidEvent)));
        }
    }

    #[test]
    fn update_event_normalizes() {
        let body = init_body(
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            1,
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            10,
            20,
            123,
        );
        let line = encode_log(ORDER_UPDATE_DISCRIMINATOR, &body);
        let event = try_parse_log(&line).unwrap().unwrap();
        let record = HistoryRecord::from_event(event, "abc", 55);
        assert_eq!(record.kind, HistoryKind::Update);
        assert_eq!(record.signature, "abc");
        assert_eq!(record.timestamp, 55);
    }

    /// Canned transaction feed keyed by signature
    struct MockRpc {
        txs: Vec<(Signature, EncodedConfirmedTransactionWithStatusMeta)>,
    }

    impl EventRpcProvider for MockRpc {
        fn get_tx_signatures(
            &self,
            _account: Pubkey,
            limit: Option<usize>,
        ) -> BoxFuture<SdkResult<Vec<String>>> {
            let sigs: Vec<String> = self
                .txs
                .iter()
                .take(limit.unwrap_or(usize::MAX))
                .map(|(sig, _)| sig.to_string())
                .collect();
            async move { Ok(sigs) }.boxed()
        }
        fn get_tx(
            &self,
            signature: Signature,
        ) -> BoxFuture<SdkResult<EncodedConfirmedTransactionWithStatusMeta>> {
            let found = self
                .txs
                .iter()
                .find(|(sig, _)| *sig == signature)
                // EncodedConfirmedTransactionWithStatusMeta has no Clone impl in
                // solana-transaction-status 1.x; copy it via its serde representation.
                .map(|(_, tx)| {
                    serde_json::from_value(serde_json::to_value(tx).unwrap()).unwrap()
                });
            async move { found.ok_or(SdkError::Deserializing) }.boxed()
        }
    }

    fn encoded_tx(
        program: Pubkey,
        logs: Vec<String>,
        failed: bool,
        block_time: i64,
    ) -> EncodedConfirmedTransactionWithStatusMeta {
        use solana_sdk::{instruction::Instruction, transaction::Transaction};
        use solana_transaction_status::{
            EncodedTransaction, EncodedTransactionWithStatusMeta, TransactionBinaryEncoding,
            UiTransactionStatusMeta,
        };

        let payer = Pubkey::new_unique();
        let ix = Instruction {
            program_id: program,
            accounts: vec![],
            data: vec![],
        };
        let tx = VersionedTransaction::from(Transaction::new_with_payer(&[ix], Some(&payer)));
        let serialized = bincode::serialize(&tx).unwrap();

        let err = failed.then_some(solana_sdk::transaction::TransactionError::AccountNotFound);
        let meta = UiTransactionStatusMeta {
            err: err.clone(),
            status: match err {
                Some(err) => Err(err),
                None => Ok(()),
            },
            fee: 5_000,
            pre_balances: vec![],
            post_balances: vec![],
            inner_instructions: OptionSerializer::None,
            log_messages: OptionSerializer::Some(logs),
            pre_token_balances: OptionSerializer::None,
            post_token_balances: OptionSerializer::None,
            rewards: OptionSerializer::None,
            loaded_addresses: OptionSerializer::None,
            return_data: OptionSerializer::None,
            compute_units_consumed: OptionSerializer::None,
        };

        EncodedConfirmedTransactionWithStatusMeta {
            slot: 1,
            transaction: EncodedTransactionWithStatusMeta {
                transaction: EncodedTransaction::Binary(
                    base64::encode(serialized),
                    TransactionBinaryEncoding::Base64,
                ),
                meta: Some(meta),
                version: None,
            },
            block_time: Some(block_time),
        }
    }

    #[tokio::test]
    async fn history_skips_failed_and_foreign_txs() {
        let maker = Pubkey::new_unique();
        let event_log = encode_log(
            ORDER_INITIALIZED_DISCRIMINATOR,
            &init_body(
                &Pubkey::new_unique(),
                &maker,
                42,
                &Pubkey::new_unique(),
                &Pubkey::new_unique(),
                1_000,
                2_000,
                0,
            ),
        );

        let good_sig = Signature::new_unique();
        let provider = MockRpc {
            txs: vec![
                // failed tx: same event log, err set
                (
                    Signature::new_unique(),
                    encoded_tx(PROGRAM_ID, vec![event_log.clone()], true, 10),
                ),
                // tx never touching the order program
                (
                    Signature::new_unique(),
                    encoded_tx(Pubkey::new_unique(), vec![event_log.clone()], false, 20),
                ),
                (
                    good_sig,
                    encoded_tx(PROGRAM_ID, vec![event_log], false, 1_700_000_042),
                ),
            ],
        };

        let records = fetch_history(&provider, maker, 10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, HistoryKind::Init);
        assert_eq!(records[0].signature, good_sig.to_string());
        assert_eq!(records[0].timestamp, 1_700_000_042);
    }

    #[tokio::test]
    async fn history_respects_the_scan_limit() {
        let maker = Pubkey::new_unique();
        let event_log = encode_log(
            ORDER_INITIALIZED_DISCRIMINATOR,
            &init_body(
                &Pubkey::new_unique(),
                &maker,
                1,
                &Pubkey::new_unique(),
                &Pubkey::new_unique(),
                1,
                1,
                0,
            ),
        );
        let provider = MockRpc {
            txs: (0..4)
                .map(|i| {
                    (
                        Signature::new_unique(),
                        encoded_tx(PROGRAM_ID, vec![event_log.clone()], false, i),
                    )
                })
                .collect(),
        };

        let records = fetch_history(&provider, maker, 2).await.unwrap();
        assert_eq!(records.len(), 2);
    }
}
