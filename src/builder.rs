//! Compose order transactions.
//!
//! `TransactionBuilder` is pure: proofs, decoded records, and the blockhash
//! are supplied by the caller, so every instruction-ordering rule here is
//! checkable offline. Native SOL legs get a wrap/unwrap bracket around the
//! program instruction; the wrapped-SOL ATA is created idempotently and
//! closed in the same transaction.

use solana_sdk::{
    compute_budget::ComputeBudgetInstruction,
    instruction::Instruction,
    message::{v0, VersionedMessage},
    pubkey::Pubkey,
    system_instruction,
};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id,
    instruction::create_associated_token_account_idempotent,
};

use crate::{
    constants::{INIT_COMPUTE_UNITS, MUTATE_COMPUTE_UNITS},
    instructions::{
        self, AccountParams, CancelOrderParams, InitializeOrderParams, LightArgs,
        PackedStateTreeInfo, UpdateOrderArgs, ValidityProofArg, MUTATE_OUTPUT_TREE_INDEX,
    },
    order::OrderRecord,
    photon::CompressedProof,
    types::{AssetKind, NewOrder, OrderChanges, SdkError, SdkResult},
};

/// Accumulates instructions for one order transaction, first to last.
///
/// Methods consume and return `self` for chaining. The compute budget
/// instruction must come first; callers set it before the payload.
pub struct TransactionBuilder {
    payer: Pubkey,
    ixs: Vec<Instruction>,
}

impl TransactionBuilder {
    pub fn new(payer: Pubkey) -> Self {
        Self {
            payer,
            ixs: Vec::new(),
        }
    }

    /// Cap the transaction's compute units. Always the first instruction.
    pub fn compute_budget(mut self, units: u32) -> Self {
        self.ixs
            .insert(0, ComputeBudgetInstruction::set_compute_unit_limit(units));
        self
    }

    /// Append the order-initialization instruction, wrapping `making_amount`
    /// lamports first when the input side is native SOL
    pub fn initialize_order(
        mut self,
        maker: &Pubkey,
        order: &NewOrder,
        unique_id: u64,
        proof: CompressedProof,
        root_index: u16,
    ) -> Self {
        let native_input = AssetKind::of(&order.input_mint).is_native();
        if native_input {
            self.push_wrap(maker, Some(order.making_amount));
        }

        let params = InitializeOrderParams {
            unique_id,
            making_amount: order.making_amount,
            taking_amount: order.taking_amount,
            expired_at: (order.expired_at != 0).then_some(order.expired_at),
        };
        self.ixs.push(instructions::initialize_order(
            maker,
            &order.input_mint,
            &order.output_mint,
            &order.input_token_program,
            &order.output_token_program,
            params,
            LightArgs::for_init(proof, root_index),
        ));

        if native_input {
            self.push_unwrap(maker);
        }
        self
    }

    /// Append the order-update instruction. When the input side is native and
    /// the making amount grows, only the shortfall is wrapped; shrinking
    /// orders are refunded by the program and unwrapped by the closing
    /// bracket.
    pub fn update_order(
        mut self,
        record: &OrderRecord,
        changes: &OrderChanges,
        proof: CompressedProof,
        root_index: u16,
        leaf_index: u32,
    ) -> Self {
        let native_input = AssetKind::of(&record.input_mint).is_native();
        if native_input {
            let top_up = changes
                .making_amount
                .map(|new| new.saturating_sub(record.making_amount))
                .filter(|delta| *delta > 0);
            self.push_wrap(&record.maker, top_up);
        }

        let args = UpdateOrderArgs {
            escrow_account: AccountParams::from(record),
            proof: ValidityProofArg(Some(proof)),
            tree_info: PackedStateTreeInfo::for_mutation(root_index, leaf_index),
            output_state_tree_index: MUTATE_OUTPUT_TREE_INDEX,
            making_amount: changes.making_amount,
            taking_amount: changes.taking_amount,
            expired_at: changes.expired_at,
        };
        self.ixs.push(instructions::update_order(record, args));

        if native_input {
            self.push_unwrap(&record.maker);
        }
        self
    }

    /// Append the order-cancel instruction. Refunded native SOL is unwrapped
    /// only when the canceller is the maker; closing the maker's wrapped-SOL
    /// account requires the maker's signature, which a third-party keeper
    /// cancelling an expired order does not carry.
    pub fn cancel_order(
        mut self,
        canceller: &Pubkey,
        record: &OrderRecord,
        proof: CompressedProof,
        root_index: u16,
        leaf_index: u32,
    ) -> Self {
        let unwrap = AssetKind::of(&record.input_mint).is_native() && *canceller == record.maker;
        if unwrap {
            self.push_wrap(&record.maker, None);
        }

        let params = CancelOrderParams {
            escrow_account: AccountParams::from(record),
            proof: ValidityProofArg(Some(proof)),
            tree_info: PackedStateTreeInfo::for_mutation(root_index, leaf_index),
            output_state_tree_index: MUTATE_OUTPUT_TREE_INDEX,
        };
        self.ixs
            .push(instructions::cancel_order(canceller, record, params));

        if unwrap {
            self.push_unwrap(&record.maker);
        }
        self
    }

    /// Compile into a v0 message with `payer` as fee payer
    pub fn build(self, recent_blockhash: solana_sdk::hash::Hash) -> SdkResult<VersionedMessage> {
        let message = v0::Message::try_compile(&self.payer, &self.ixs, &[], recent_blockhash)
            .map_err(|err| {
                log::warn!(target: "elara", "message compile failed: {err:?}");
                SdkError::TxCompile
            })?;
        Ok(VersionedMessage::V0(message))
    }

    /// Ensure the wallet's wrapped-SOL ATA exists, optionally funding it with
    /// `lamports` and syncing the balance
    fn push_wrap(&mut self, wallet: &Pubkey, lamports: Option<u64>) {
        let mint = spl_token::native_mint::ID;
        self.ixs.push(create_associated_token_account_idempotent(
            &self.payer,
            wallet,
            &mint,
            &spl_token::ID,
        ));
        if let Some(lamports) = lamports {
            let ata = get_associated_token_address_with_program_id(wallet, &mint, &spl_token::ID);
            self.ixs
                .push(system_instruction::transfer(wallet, &ata, lamports));
            self.ixs.push(sync_native(&ata));
        }
    }

    /// Close the wallet's wrapped-SOL ATA, returning lamports to the wallet
    fn push_unwrap(&mut self, wallet: &Pubkey) {
        let ata = get_associated_token_address_with_program_id(
            wallet,
            &spl_token::native_mint::ID,
            &spl_token::ID,
        );
        self.ixs.push(close_account(&ata, wallet));
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.ixs
    }
}

// the spl_token constructors only fail on a mismatched program id; ours is
// the crate constant
fn sync_native(ata: &Pubkey) -> Instruction {
    spl_token::instruction::sync_native(&spl_token::ID, ata).expect("valid token program id")
}

fn close_account(ata: &Pubkey, owner: &Pubkey) -> Instruction {
    spl_token::instruction::close_account(&spl_token::ID, ata, owner, owner, &[])
        .expect("valid token program id")
}

pub(crate) fn init_compute_budget(payer: Pubkey) -> TransactionBuilder {
    TransactionBuilder::new(payer).compute_budget(INIT_COMPUTE_UNITS)
}

pub(crate) fn mutate_compute_budget(payer: Pubkey) -> TransactionBuilder {
    TransactionBuilder::new(payer).compute_budget(MUTATE_COMPUTE_UNITS)
}
