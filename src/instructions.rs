//! Wire format of the order program's instructions.
//!
//! Anchor conventions: 8-byte instruction discriminator followed by
//! borsh-encoded args. Account ordering is fixed by the program's IDL,
//! with the light system stack appended as remaining accounts.

use borsh::BorshSerialize;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};
use spl_associated_token_account::get_associated_token_address_with_program_id;

use crate::{
    constants::{
        cpi_authority, protocol_vault, ACCOUNT_COMPRESSION_AUTHORITY, ADDRESS_QUEUE, ADDRESS_TREE,
        COMPRESSION_PROGRAM, LIGHT_SYSTEM_PROGRAM, NOOP_PROGRAM, PROGRAM_ID,
        REGISTERED_PROGRAM_PDA, STATE_QUEUE, STATE_TREE,
    },
    order::OrderRecord,
    photon::CompressedProof,
};

pub const INITIALIZE_ORDER_DISCRIMINATOR: [u8; 8] = [133, 110, 74, 175, 112, 159, 245, 159];
pub const UPDATE_ORDER_DISCRIMINATOR: [u8; 8] = [54, 8, 208, 207, 34, 134, 239, 168];
pub const CANCEL_ORDER_DISCRIMINATOR: [u8; 8] = [95, 129, 237, 240, 8, 49, 223, 132];

// positions of the tree/queue accounts within the remaining-accounts lists
const INIT_ADDRESS_TREE_INDEX: u8 = 0;
const INIT_ADDRESS_QUEUE_INDEX: u8 = 2;
const INIT_OUTPUT_STATE_TREE_INDEX: u8 = 1;
const MUTATE_STATE_TREE_INDEX: u8 = 0;
const MUTATE_STATE_QUEUE_INDEX: u8 = 1;
pub(crate) const MUTATE_OUTPUT_TREE_INDEX: u8 = 0;

#[derive(BorshSerialize)]
pub struct Amount {
    pub ori_making_amount: u64,
    pub ori_taking_amount: u64,
    pub making_amount: u64,
    pub taking_amount: u64,
}

/// Current record fields echoed back so the program can re-hash the leaf
#[derive(BorshSerialize)]
pub struct AccountParams {
    pub unique_id: u64,
    pub amount: Amount,
    pub fee_bps: u16,
    pub expired_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&OrderRecord> for AccountParams {
    fn from(record: &OrderRecord) -> Self {
        Self {
            unique_id: record.unique_id,
            amount: Amount {
                ori_making_amount: record.ori_making_amount,
                ori_taking_amount: record.ori_taking_amount,
                making_amount: record.making_amount,
                taking_amount: record.taking_amount,
            },
            fee_bps: record.fee_bps,
            expired_at: record.expired_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(BorshSerialize)]
pub struct ValidityProofArg(pub Option<CompressedProof>);

#[derive(BorshSerialize)]
pub struct PackedAddressTreeInfo {
    pub address_merkle_tree_pubkey_index: u8,
    pub address_queue_pubkey_index: u8,
    pub root_index: u16,
}

#[derive(BorshSerialize)]
pub struct PackedStateTreeInfo {
    pub root_index: u16,
    pub prove_by_index: bool,
    pub merkle_tree_pubkey_index: u8,
    pub queue_pubkey_index: u8,
    pub leaf_index: u32,
}

#[derive(BorshSerialize)]
pub struct LightArgs {
    pub proof: ValidityProofArg,
    pub address_tree_info: PackedAddressTreeInfo,
    pub output_state_tree_index: u8,
}

#[derive(BorshSerialize)]
pub struct InitializeOrderParams {
    pub unique_id: u64,
    pub making_amount: u64,
    pub taking_amount: u64,
    pub expired_at: Option<i64>,
}

#[derive(BorshSerialize)]
pub struct UpdateOrderArgs {
    pub escrow_account: AccountParams,
    pub proof: ValidityProofArg,
    pub tree_info: PackedStateTreeInfo,
    pub output_state_tree_index: u8,
    pub making_amount: Option<u64>,
    pub taking_amount: Option<u64>,
    pub expired_at: Option<i64>,
}

#[derive(BorshSerialize)]
pub struct CancelOrderParams {
    pub escrow_account: AccountParams,
    pub proof: ValidityProofArg,
    pub tree_info: PackedStateTreeInfo,
    pub output_state_tree_index: u8,
}

impl LightArgs {
    /// Address-tree args for creating a new order leaf
    pub fn for_init(proof: CompressedProof, root_index: u16) -> Self {
        Self {
            proof: ValidityProofArg(Some(proof)),
            address_tree_info: PackedAddressTreeInfo {
                address_merkle_tree_pubkey_index: INIT_ADDRESS_TREE_INDEX,
                address_queue_pubkey_index: INIT_ADDRESS_QUEUE_INDEX,
                root_index,
            },
            output_state_tree_index: INIT_OUTPUT_STATE_TREE_INDEX,
        }
    }
}

impl PackedStateTreeInfo {
    /// State-tree position of an existing leaf being mutated
    pub fn for_mutation(root_index: u16, leaf_index: u32) -> Self {
        Self {
            root_index,
            prove_by_index: false,
            merkle_tree_pubkey_index: MUTATE_STATE_TREE_INDEX,
            queue_pubkey_index: MUTATE_STATE_QUEUE_INDEX,
            leaf_index,
        }
    }
}

fn anchor_data(discriminator: [u8; 8], args: &impl BorshSerialize) -> Vec<u8> {
    let mut data = discriminator.to_vec();
    args.serialize(&mut data).expect("in-memory serialize");
    data
}

fn ata(wallet: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(wallet, mint, token_program)
}

/// Light system stack appended to the init instruction; the address tree,
/// state tree and address queue are writable (a new leaf is inserted)
fn init_remaining_accounts() -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(LIGHT_SYSTEM_PROGRAM, false),
        AccountMeta::new_readonly(*cpi_authority(), false),
        AccountMeta::new_readonly(REGISTERED_PROGRAM_PDA, false),
        AccountMeta::new_readonly(NOOP_PROGRAM, false),
        AccountMeta::new_readonly(ACCOUNT_COMPRESSION_AUTHORITY, false),
        AccountMeta::new_readonly(COMPRESSION_PROGRAM, false),
        AccountMeta::new_readonly(PROGRAM_ID, false),
        AccountMeta::new_readonly(system_program::ID, false),
        AccountMeta::new(ADDRESS_TREE, false),
        AccountMeta::new(STATE_TREE, false),
        AccountMeta::new(ADDRESS_QUEUE, false),
    ]
}

/// Light system stack for update/cancel; only the state tree/queue change
fn mutate_remaining_accounts() -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(LIGHT_SYSTEM_PROGRAM, false),
        AccountMeta::new_readonly(*cpi_authority(), false),
        AccountMeta::new_readonly(REGISTERED_PROGRAM_PDA, false),
        AccountMeta::new_readonly(NOOP_PROGRAM, false),
        AccountMeta::new_readonly(ACCOUNT_COMPRESSION_AUTHORITY, false),
        AccountMeta::new_readonly(COMPRESSION_PROGRAM, false),
        AccountMeta::new_readonly(PROGRAM_ID, false),
        AccountMeta::new_readonly(system_program::ID, false),
        AccountMeta::new(STATE_TREE, false),
        AccountMeta::new(STATE_QUEUE, false),
    ]
}

/// Build the order-initialization instruction. `maker` signs and pays.
#[allow(clippy::too_many_arguments)]
pub fn initialize_order(
    maker: &Pubkey,
    input_mint: &Pubkey,
    output_mint: &Pubkey,
    input_token_program: &Pubkey,
    output_token_program: &Pubkey,
    params: InitializeOrderParams,
    light_args: LightArgs,
) -> Instruction {
    let vault = protocol_vault();
    let mut accounts = vec![
        AccountMeta::new(*maker, true), // payer
        AccountMeta::new_readonly(*maker, true),
        AccountMeta::new_readonly(*input_mint, false),
        AccountMeta::new(ata(maker, input_mint, input_token_program), false),
        AccountMeta::new_readonly(*output_mint, false),
        AccountMeta::new(ata(maker, output_mint, output_token_program), false),
        AccountMeta::new_readonly(*vault, false),
        AccountMeta::new(ata(vault, input_mint, input_token_program), false),
        AccountMeta::new(ata(vault, output_mint, output_token_program), false),
        AccountMeta::new_readonly(*input_token_program, false),
        AccountMeta::new_readonly(*output_token_program, false),
        AccountMeta::new_readonly(system_program::ID, false),
        AccountMeta::new_readonly(spl_associated_token_account::ID, false),
    ];
    accounts.extend(init_remaining_accounts());

    let mut data = anchor_data(INITIALIZE_ORDER_DISCRIMINATOR, &params);
    light_args
        .serialize(&mut data)
        .expect("in-memory serialize");

    Instruction {
        program_id: PROGRAM_ID,
        accounts,
        data,
    }
}

/// Build the order-update instruction; unchanged fields are echoed from the
/// decoded `record`. The maker both signs and pays.
pub fn update_order(record: &OrderRecord, args: UpdateOrderArgs) -> Instruction {
    let maker = &record.maker;
    let vault = protocol_vault();
    let mut accounts = vec![
        AccountMeta::new(*maker, true), // payer
        AccountMeta::new_readonly(*maker, true),
        AccountMeta::new_readonly(record.input_mint, false),
        AccountMeta::new(
            ata(maker, &record.input_mint, &record.input_token_program),
            false,
        ),
        AccountMeta::new_readonly(record.output_mint, false),
        AccountMeta::new(
            ata(maker, &record.output_mint, &record.output_token_program),
            false,
        ),
        AccountMeta::new_readonly(*vault, false),
        AccountMeta::new(
            ata(vault, &record.input_mint, &record.input_token_program),
            false,
        ),
        AccountMeta::new_readonly(record.input_token_program, false),
        AccountMeta::new_readonly(record.output_token_program, false),
        AccountMeta::new_readonly(system_program::ID, false),
        AccountMeta::new_readonly(spl_associated_token_account::ID, false),
    ];
    accounts.extend(mutate_remaining_accounts());

    Instruction {
        program_id: PROGRAM_ID,
        accounts,
        data: anchor_data(UPDATE_ORDER_DISCRIMINATOR, &args),
    }
}

/// Build the order-cancel instruction.
///
/// `canceller` pays; the maker need not sign — the program allows anyone to
/// cancel an order whose expiry has passed, and enforces maker-only
/// cancellation otherwise.
pub fn cancel_order(
    canceller: &Pubkey,
    record: &OrderRecord,
    params: CancelOrderParams,
) -> Instruction {
    let maker = &record.maker;
    let vault = protocol_vault();
    let mut accounts = vec![
        AccountMeta::new(*canceller, true), // payer
        AccountMeta::new_readonly(*maker, false),
        AccountMeta::new_readonly(record.input_mint, false),
        AccountMeta::new_readonly(record.output_mint, false),
        AccountMeta::new(
            ata(maker, &record.input_mint, &record.input_token_program),
            false,
        ),
        AccountMeta::new_readonly(*vault, false),
        AccountMeta::new(
            ata(vault, &record.input_mint, &record.input_token_program),
            false,
        ),
        AccountMeta::new_readonly(record.input_token_program, false),
        AccountMeta::new_readonly(record.output_token_program, false),
        AccountMeta::new_readonly(system_program::ID, false),
        AccountMeta::new_readonly(spl_associated_token_account::ID, false),
    ];
    accounts.extend(mutate_remaining_accounts());

    Instruction {
        program_id: PROGRAM_ID,
        accounts,
        data: anchor_data(CANCEL_ORDER_DISCRIMINATOR, &params),
    }
}
