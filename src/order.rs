//! Fixed-layout codec for the compressed order record.
//!
//! The record is not self-describing: every field sits at an exact byte
//! offset, little-endian. The record does not store its own address; it is
//! re-derived from `(maker, unique_id)` after decoding so identity stays a
//! pure function of those two fields.

use solana_sdk::pubkey::Pubkey;

use crate::{
    address::derive_order_address,
    types::{SdkError, SdkResult},
};

/// Minimum encoded size of an order record:
/// 32 + 8 + 4*32 + 4*8 + 3*8 + 2*2
pub const ORDER_RECORD_LEN: usize = 228;

/// One open limit order, as stored in the state tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderRecord {
    /// derived, not part of the encoded buffer
    pub address: Pubkey,
    pub maker: Pubkey,
    pub unique_id: u64,
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub input_token_program: Pubkey,
    pub output_token_program: Pubkey,
    /// immutable baseline set at init
    pub ori_making_amount: u64,
    pub ori_taking_amount: u64,
    /// remaining amounts, shrink on partial fills and amendments
    pub making_amount: u64,
    pub taking_amount: u64,
    /// epoch seconds, 0 = never
    pub expired_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub slippage_bps: u16,
    pub fee_bps: u16,
}

impl OrderRecord {
    /// Decode a record from its raw account buffer.
    ///
    /// All-or-nothing: buffers shorter than [`ORDER_RECORD_LEN`] fail with
    /// `TooShort`, nothing is partially decoded.
    pub fn decode(buf: &[u8]) -> SdkResult<Self> {
        if buf.len() < ORDER_RECORD_LEN {
            return Err(SdkError::TooShort {
                len: buf.len(),
                min: ORDER_RECORD_LEN,
            });
        }

        let maker = read_pubkey(buf, 0);
        let unique_id = read_u64_le(buf, 32);

        Ok(Self {
            address: derive_order_address(&maker, unique_id),
            maker,
            unique_id,
            input_mint: read_pubkey(buf, 40),
            output_mint: read_pubkey(buf, 72),
            input_token_program: read_pubkey(buf, 104),
            output_token_program: read_pubkey(buf, 136),
            ori_making_amount: read_u64_le(buf, 168),
            ori_taking_amount: read_u64_le(buf, 176),
            making_amount: read_u64_le(buf, 184),
            taking_amount: read_u64_le(buf, 192),
            expired_at: read_i64_le(buf, 200),
            created_at: read_i64_le(buf, 208),
            updated_at: read_i64_le(buf, 216),
            slippage_bps: read_u16_le(buf, 224),
            fee_bps: read_u16_le(buf, 226),
        })
    }

    /// True if the order's expiry has passed `now` (epoch seconds)
    pub fn is_expired(&self, now: i64) -> bool {
        self.expired_at != 0 && self.expired_at <= now
    }
}

// offset readers; callers guarantee `buf` covers the slice
fn read_pubkey(buf: &[u8], offset: usize) -> Pubkey {
    Pubkey::try_from(&buf[offset..offset + 32]).expect("32 byte slice")
}

fn read_u64_le(buf: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes(buf[offset..offset + 8].try_into().expect("8 byte slice"))
}

fn read_i64_le(buf: &[u8], offset: usize) -> i64 {
    i64::from_le_bytes(buf[offset..offset + 8].try_into().expect("8 byte slice"))
}

fn read_u16_le(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes(buf[offset..offset + 2].try_into().expect("2 byte slice"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Inverse of `decode`, test-only; the live path never re-serializes a
    /// full record (instructions carry individual fields)
    pub(crate) fn encode(record: &OrderRecord) -> Vec<u8> {
        let mut buf = Vec::with_capacity(ORDER_RECORD_LEN);
        buf.extend_from_slice(record.maker.as_ref());
        buf.extend_from_slice(&record.unique_id.to_le_bytes());
        buf.extend_from_slice(record.input_mint.as_ref());
        buf.extend_from_slice(record.output_mint.as_ref());
        buf.extend_from_slice(record.input_token_program.as_ref());
        buf.extend_from_slice(record.output_token_program.as_ref());
        buf.extend_from_slice(&record.ori_making_amount.to_le_bytes());
        buf.extend_from_slice(&record.ori_taking_amount.to_le_bytes());
        buf.extend_from_slice(&record.making_amount.to_le_bytes());
        buf.extend_from_slice(&record.taking_amount.to_le_bytes());
        buf.extend_from_slice(&record.expired_at.to_le_bytes());
        buf.extend_from_slice(&record.created_at.to_le_bytes());
        buf.extend_from_slice(&record.updated_at.to_le_bytes());
        buf.extend_from_slice(&record.slippage_bps.to_le_bytes());
        buf.extend_from_slice(&record.fee_bps.to_le_bytes());
        buf
    }

    pub(crate) fn sample_record(maker: Pubkey, unique_id: u64) -> OrderRecord {
        OrderRecord {
            address: derive_order_address(&maker, unique_id),
            maker,
            unique_id,
            input_mint: Pubkey::new_unique(),
            output_mint: Pubkey::new_unique(),
            input_token_program: spl_token::ID,
            output_token_program: spl_token::ID,
            ori_making_amount: 1_000_000,
            ori_taking_amount: 2_000_000,
            making_amount: 750_000,
            taking_amount: 1_500_000,
            expired_at: 0,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_500,
            slippage_bps: 50,
            fee_bps: 5,
        }
    }

    #[test]
    fn round_trip() {
        let record = sample_record(Pubkey::new_unique(), 0xdead_beef_cafe_f00d);
        let buf = encode(&record);
        assert_eq!(buf.len(), ORDER_RECORD_LEN);
        assert_eq!(OrderRecord::decode(&buf).unwrap(), record);
    }

    #[test]
    fn round_trip_extreme_values() {
        let mut record = sample_record(Pubkey::new_unique(), u64::MAX);
        record.ori_making_amount = u64::MAX;
        record.making_amount = u64::MAX;
        record.expired_at = i64::MIN;
        record.slippage_bps = 10_000;
        record.fee_bps = u16::MAX;
        assert_eq!(OrderRecord::decode(&encode(&record)).unwrap(), record);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let record = sample_record(Pubkey::new_unique(), 7);
        let buf = encode(&record);
        for len in [0, 1, 100, ORDER_RECORD_LEN - 1] {
            match OrderRecord::decode(&buf[..len]) {
                Err(SdkError::TooShort { len: l, min }) => {
                    assert_eq!(l, len);
                    assert_eq!(min, ORDER_RECORD_LEN);
                }
                other => panic!("expected TooShort, got {other:?}"),
            }
        }
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let record = sample_record(Pubkey::new_unique(), 7);
        let mut buf = encode(&record);
        buf.extend_from_slice(&[0xaa; 16]);
        assert_eq!(OrderRecord::decode(&buf).unwrap(), record);
    }

    #[test]
    fn decoded_address_matches_derivation() {
        let maker = Pubkey::new_unique();
        let record = sample_record(maker, 42);
        let decoded = OrderRecord::decode(&encode(&record)).unwrap();
        assert_eq!(decoded.address, derive_order_address(&maker, 42));
    }

    #[test]
    fn expiry_check() {
        let mut record = sample_record(Pubkey::new_unique(), 1);
        assert!(!record.is_expired(i64::MAX)); // 0 = never
        record.expired_at = 100;
        assert!(record.is_expired(100));
        assert!(!record.is_expired(99));
    }
}
