//! Adapter to the compression indexer/prover (Photon JSON-RPC).
//!
//! Validity proofs are never computed locally: every read or write of an
//! order goes through this service. The service is trusted for correctness;
//! a missing proof or account is a hard failure for the calling operation.

use borsh::BorshSerialize;
use futures_util::{future::BoxFuture, FutureExt};
use log::debug;
use serde::{de::DeserializeOwned, Deserialize};
use solana_sdk::pubkey::Pubkey;

use crate::{
    constants::{ADDRESS_QUEUE, ADDRESS_TREE, STATE_QUEUE, STATE_TREE},
    types::{SdkError, SdkResult},
};

const LOG_TARGET: &str = "photon";

/// Groth16 witness triple, opaque to this crate
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize)]
pub struct CompressedProof {
    pub a: [u8; 32],
    pub b: [u8; 64],
    pub c: [u8; 32],
}

/// A proof plus the root indices it was produced against.
///
/// Root indices must be threaded unchanged into the consuming instruction;
/// the proof is single-use and bound to the merkle root at acquisition time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofWithContext {
    pub proof: CompressedProof,
    pub root_indices: Vec<u16>,
}

impl ProofWithContext {
    /// Root index for the i-th proven item. A reply missing the index for a
    /// proven item is an incomplete proof.
    pub fn root_index(&self, i: usize) -> SdkResult<u16> {
        self.root_indices
            .get(i)
            .copied()
            .ok_or(SdkError::ProofUnavailable)
    }
}

/// One compressed account as reported by the indexer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressedAccount {
    /// content hash identifying the current leaf
    pub hash: [u8; 32],
    pub leaf_index: u32,
    pub data: Vec<u8>,
}

/// Indexer surface required for order reads and proof acquisition
pub trait CompressionProvider: Send + Sync + 'static {
    /// Fetch a compressed account by its derived address
    fn get_compressed_account(
        &self,
        address: Pubkey,
    ) -> BoxFuture<SdkResult<Option<CompressedAccount>>>;
    /// Request a validity proof: existence of `hashes` in the state tree
    /// and/or non-existence of `new_addresses` in the address tree
    fn get_validity_proof(
        &self,
        hashes: Vec<[u8; 32]>,
        new_addresses: Vec<Pubkey>,
    ) -> BoxFuture<SdkResult<ProofWithContext>>;
    /// Fetch raw account buffers owned by `program`, filtered to `maker`
    /// (the record stores the maker in its leading 32 bytes)
    fn get_compressed_accounts_by_owner(
        &self,
        program: Pubkey,
        maker: Pubkey,
    ) -> BoxFuture<SdkResult<Vec<Vec<u8>>>>;
}

/// JSON-RPC client for a Photon-compatible indexer endpoint
pub struct PhotonClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PhotonClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    async fn request<R: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> SdkResult<R> {
        debug!(target: LOG_TARGET, "{method}");
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": "1",
            "method": method,
            "params": params,
        });
        let response: RpcEnvelope<R> = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(SdkError::Indexer(err.message));
        }
        response.result.ok_or(SdkError::Deserializing)
    }

    async fn get_compressed_account_impl(
        &self,
        address: Pubkey,
    ) -> SdkResult<Option<CompressedAccount>> {
        let result: ValueOf<Option<CompressedAccountResponse>> = self
            .request(
                "getCompressedAccount",
                serde_json::json!({ "address": address.to_string() }),
            )
            .await?;

        let Some(account) = result.value else {
            return Ok(None);
        };
        let data = match account.data {
            Some(d) => base64::decode(&d.data).map_err(|_| SdkError::Deserializing)?,
            None => Vec::new(),
        };
        Ok(Some(CompressedAccount {
            hash: decode_hash(&account.hash)?,
            leaf_index: account.leaf_index,
            data,
        }))
    }

    async fn get_validity_proof_impl(
        &self,
        hashes: Vec<[u8; 32]>,
        new_addresses: Vec<Pubkey>,
    ) -> SdkResult<ProofWithContext> {
        let hashes: Vec<serde_json::Value> = hashes
            .iter()
            .map(|h| {
                serde_json::json!({
                    "hash": bs58::encode(h).into_string(),
                    "tree": STATE_TREE.to_string(),
                    "queue": STATE_QUEUE.to_string(),
                })
            })
            .collect();
        let new_addresses: Vec<serde_json::Value> = new_addresses
            .iter()
            .map(|a| {
                serde_json::json!({
                    "address": a.to_string(),
                    "tree": ADDRESS_TREE.to_string(),
                    "queue": ADDRESS_QUEUE.to_string(),
                })
            })
            .collect();

        let result: ValueOf<Option<ValidityProofResponse>> = self
            .request(
                "getValidityProofV0",
                serde_json::json!({
                    "hashes": hashes,
                    "newAddressesWithTrees": new_addresses,
                }),
            )
            .await?;

        let value = result.value.ok_or(SdkError::ProofUnavailable)?;
        let proof = value.compressed_proof.ok_or(SdkError::ProofUnavailable)?;
        Ok(ProofWithContext {
            proof: CompressedProof {
                a: proof.a.try_into().map_err(|_| SdkError::Deserializing)?,
                b: proof.b.try_into().map_err(|_| SdkError::Deserializing)?,
                c: proof.c.try_into().map_err(|_| SdkError::Deserializing)?,
            },
            root_indices: value.root_indices,
        })
    }

    async fn get_by_owner_impl(
        &self,
        program: Pubkey,
        maker: Pubkey,
    ) -> SdkResult<Vec<Vec<u8>>> {
        let result: ValueOf<ItemsResponse> = self
            .request(
                "getCompressedAccountsByOwner",
                serde_json::json!({
                    "owner": program.to_string(),
                    "filters": [{
                        "memcmp": {
                            "offset": 0,
                            "bytes": maker.to_string(),
                        }
                    }],
                }),
            )
            .await?;

        result
            .value
            .items
            .into_iter()
            .filter_map(|item| item.data)
            .map(|d| base64::decode(&d.data).map_err(|_| SdkError::Deserializing))
            .collect()
    }
}

impl CompressionProvider for PhotonClient {
    fn get_compressed_account(
        &self,
        address: Pubkey,
    ) -> BoxFuture<SdkResult<Option<CompressedAccount>>> {
        self.get_compressed_account_impl(address).boxed()
    }
    fn get_validity_proof(
        &self,
        hashes: Vec<[u8; 32]>,
        new_addresses: Vec<Pubkey>,
    ) -> BoxFuture<SdkResult<ProofWithContext>> {
        self.get_validity_proof_impl(hashes, new_addresses).boxed()
    }
    fn get_compressed_accounts_by_owner(
        &self,
        program: Pubkey,
        maker: Pubkey,
    ) -> BoxFuture<SdkResult<Vec<Vec<u8>>>> {
        self.get_by_owner_impl(program, maker).boxed()
    }
}

fn decode_hash(encoded: &str) -> SdkResult<[u8; 32]> {
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|_| SdkError::Deserializing)?;
    bytes.try_into().map_err(|_| SdkError::Deserializing)
}

// wire shapes

#[derive(Deserialize)]
struct RpcEnvelope<R> {
    result: Option<R>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct ValueOf<T> {
    value: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompressedAccountResponse {
    hash: String,
    leaf_index: u32,
    data: Option<AccountData>,
}

#[derive(Deserialize)]
struct AccountData {
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidityProofResponse {
    compressed_proof: Option<WireProof>,
    root_indices: Vec<u16>,
}

#[derive(Deserialize)]
struct WireProof {
    a: Vec<u8>,
    b: Vec<u8>,
    c: Vec<u8>,
}

#[derive(Deserialize)]
struct ItemsResponse {
    items: Vec<OwnedItem>,
}

#[derive(Deserialize)]
struct OwnedItem {
    data: Option<AccountData>,
}
