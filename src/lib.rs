//! Elara SDK
//!
//! Client SDK for the Elara compressed limit-order program. Orders live as
//! compressed accounts (merkle leaves) rather than regular on-chain accounts;
//! reads and validity proofs go through a Photon-compatible indexer while
//! transactions go through a standard RPC node.
//!
//! [`ElaraClient`] is the main entrypoint: it reads open orders, reconstructs
//! order history from event logs, and assembles unsigned v0 transactions for
//! placing, amending, and cancelling orders. Signing stays with the caller's
//! [`Wallet`].

use log::debug;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    hash::Hash,
    message::VersionedMessage,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::VersionedTransaction,
};

pub mod address;
pub mod builder;
pub mod constants;
pub mod events;
pub mod instructions;
pub mod jup;
pub mod order;
pub mod photon;
pub mod types;

use crate::{
    address::{derive_order_address, random_unique_id},
    builder::{init_compute_budget, mutate_compute_budget},
    constants::PROGRAM_ID,
    photon::{CompressedAccount, CompressionProvider, PhotonClient, ProofWithContext},
};
pub use crate::{
    builder::TransactionBuilder,
    events::{HistoryKind, HistoryRecord, OrderEvent},
    jup::QuoteClient,
    order::OrderRecord,
    types::{InitOrder, NewOrder, OrderChanges, SdkError, SdkResult},
};

const LOG_TARGET: &str = "elara";

struct ClientBackend<T> {
    rpc: RpcClient,
    indexer: T,
}

/// Primary client for order reads and transaction assembly.
///
/// Cheap to copy; the backend is leaked once at construction and shared for
/// the process lifetime.
pub struct ElaraClient<T: CompressionProvider = PhotonClient> {
    backend: &'static ClientBackend<T>,
}

impl<T: CompressionProvider> Clone for ElaraClient<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: CompressionProvider> Copy for ElaraClient<T> {}

impl ElaraClient<PhotonClient> {
    /// Connect to an RPC node and a Photon-compatible indexer endpoint
    pub fn new(rpc_url: &str, indexer_url: &str) -> Self {
        Self::with_provider(
            RpcClient::new(rpc_url.to_string()),
            PhotonClient::new(indexer_url),
        )
    }
}

impl<T: CompressionProvider> ElaraClient<T> {
    pub fn with_provider(rpc: RpcClient, indexer: T) -> Self {
        let backend = Box::leak(Box::new(ClientBackend { rpc, indexer }));
        Self { backend }
    }

    /// All open orders of `maker`, decoded
    pub async fn open_orders(&self, maker: &Pubkey) -> SdkResult<Vec<OrderRecord>> {
        let buffers = self
            .backend
            .indexer
            .get_compressed_accounts_by_owner(PROGRAM_ID, *maker)
            .await?;
        debug!(target: LOG_TARGET, "{} open orders for {maker}", buffers.len());
        buffers.iter().map(|buf| OrderRecord::decode(buf)).collect()
    }

    /// Look up one order by its derived address
    pub async fn order_by_address(&self, address: &Pubkey) -> SdkResult<OrderRecord> {
        let account = self.fetch_order_account(address).await?;
        OrderRecord::decode(&account.data)
    }

    /// Look up one order by the pair that determines its address
    pub async fn order_by_id(&self, maker: &Pubkey, unique_id: u64) -> SdkResult<OrderRecord> {
        self.order_by_address(&derive_order_address(maker, unique_id))
            .await
    }

    /// Reconstruct `maker`'s recent order activity from event logs, scanning
    /// at most `limit` transactions
    pub async fn order_history(
        &self,
        maker: &Pubkey,
        limit: usize,
    ) -> SdkResult<Vec<HistoryRecord>> {
        events::fetch_history(&self.backend.rpc, *maker, limit).await
    }

    /// Assemble an unsigned order-placement transaction.
    ///
    /// A fresh `unique_id` is drawn and the order address derived locally;
    /// the indexer supplies a non-inclusion proof for that address. The
    /// returned [`InitOrder`] carries the address so callers can track the
    /// order before the transaction lands.
    pub async fn build_init(&self, maker: &Pubkey, order: &NewOrder) -> SdkResult<InitOrder> {
        order.validate()?;
        let unique_id = random_unique_id();
        let order_address = derive_order_address(maker, unique_id);
        debug!(target: LOG_TARGET, "init order {order_address} (id {unique_id})");

        let proof = self
            .backend
            .indexer
            .get_validity_proof(vec![], vec![order_address])
            .await?;
        let blockhash = self.backend.rpc.get_latest_blockhash().await?;

        let root_index = proof.root_index(0)?;
        let tx = init_compute_budget(*maker)
            .initialize_order(maker, order, unique_id, proof.proof, root_index)
            .build(blockhash)?;

        Ok(InitOrder {
            tx,
            order_address,
            unique_id,
        })
    }

    /// Assemble an unsigned amendment transaction for the order at `address`.
    /// The maker pays and must sign.
    pub async fn build_update(
        &self,
        address: &Pubkey,
        changes: &OrderChanges,
    ) -> SdkResult<VersionedMessage> {
        changes.validate()?;
        let account = self.fetch_order_account(address).await?;
        let record = OrderRecord::decode(&account.data)?;
        let (proof, blockhash) = self.prove_leaf(&account).await?;

        let root_index = proof.root_index(0)?;
        mutate_compute_budget(record.maker)
            .update_order(&record, changes, proof.proof, root_index, account.leaf_index)
            .build(blockhash)
    }

    /// Assemble an unsigned cancel transaction for the order at `address`.
    ///
    /// `canceller` pays and signs. The program accepts any canceller for an
    /// expired order and only the maker otherwise; no maker check is applied
    /// here.
    pub async fn build_cancel(
        &self,
        canceller: &Pubkey,
        address: &Pubkey,
    ) -> SdkResult<VersionedMessage> {
        let account = self.fetch_order_account(address).await?;
        let record = OrderRecord::decode(&account.data)?;
        let (proof, blockhash) = self.prove_leaf(&account).await?;

        let root_index = proof.root_index(0)?;
        mutate_compute_budget(*canceller)
            .cancel_order(canceller, &record, proof.proof, root_index, account.leaf_index)
            .build(blockhash)
    }

    pub async fn build_cancel_by_id(
        &self,
        canceller: &Pubkey,
        maker: &Pubkey,
        unique_id: u64,
    ) -> SdkResult<VersionedMessage> {
        self.build_cancel(canceller, &derive_order_address(maker, unique_id))
            .await
    }

    /// Sign `message` with `wallet` under a fresh blockhash and submit it
    pub async fn sign_and_send(
        &self,
        wallet: &Wallet,
        message: VersionedMessage,
    ) -> SdkResult<Signature> {
        let blockhash = self.backend.rpc.get_latest_blockhash().await?;
        let tx = wallet.sign_tx(message, blockhash)?;
        let signature = self.backend.rpc.send_transaction(&tx).await?;
        Ok(signature)
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.backend.rpc
    }

    async fn fetch_order_account(&self, address: &Pubkey) -> SdkResult<CompressedAccount> {
        self.backend
            .indexer
            .get_compressed_account(*address)
            .await?
            .ok_or(SdkError::OrderNotFound)
    }

    /// Proof of inclusion for an existing leaf, plus a blockhash to build with
    async fn prove_leaf(
        &self,
        account: &CompressedAccount,
    ) -> SdkResult<(ProofWithContext, Hash)> {
        let proof = self
            .backend
            .indexer
            .get_validity_proof(vec![account.hash], vec![])
            .await?;
        let blockhash = self.backend.rpc.get_latest_blockhash().await?;
        Ok((proof, blockhash))
    }
}

/// Holds the signing keypair. The SDK never signs implicitly; every
/// transaction passes through here exactly once.
pub struct Wallet {
    signer: Keypair,
}

impl Wallet {
    pub fn new(signer: Keypair) -> Self {
        Self { signer }
    }

    /// Load from a base58-encoded 64-byte keypair string
    pub fn from_seed_bs58(seed: &str) -> SdkResult<Self> {
        let bytes = bs58::decode(seed)
            .into_vec()
            .map_err(|_| SdkError::Deserializing)?;
        let signer = Keypair::from_bytes(&bytes).map_err(|_| SdkError::Deserializing)?;
        Ok(Self { signer })
    }

    pub fn authority(&self) -> Pubkey {
        self.signer.pubkey()
    }

    /// Stamp `recent_blockhash` into the message and sign it
    pub fn sign_tx(
        &self,
        mut message: VersionedMessage,
        recent_blockhash: Hash,
    ) -> SdkResult<VersionedTransaction> {
        message.set_recent_blockhash(recent_blockhash);
        let tx = VersionedTransaction::try_new(message, &[&self.signer])?;
        Ok(tx)
    }
}

impl From<Keypair> for Wallet {
    fn from(signer: Keypair) -> Self {
        Self::new(signer)
    }
}
