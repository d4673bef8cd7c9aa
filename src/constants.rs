use std::sync::OnceLock;

use solana_sdk::pubkey::Pubkey;
use substreams_solana_macro::b58;

/// The elara limit-order program
pub const PROGRAM_ID: Pubkey =
    Pubkey::new_from_array(b58!("4LhEEtzAhM6wEXJR2YQHPEs79UEx8e6HncmeHbqbW1w1"));

// Light protocol system stack
pub const LIGHT_SYSTEM_PROGRAM: Pubkey =
    Pubkey::new_from_array(b58!("SySTEM1eSU2p4BGQfQpimFEWWSC1XDFeun3Nqzz3rT7"));
pub const COMPRESSION_PROGRAM: Pubkey =
    Pubkey::new_from_array(b58!("compr6CUsB5m2jS4Y3831ztGSTnDpnKJTKS95d64XVq"));
pub const REGISTERED_PROGRAM_PDA: Pubkey =
    Pubkey::new_from_array(b58!("35hkDgaAKwMCaxRz2ocSZ6NaUrtKkyNqU6c4RV3tYJRh"));
pub const ACCOUNT_COMPRESSION_AUTHORITY: Pubkey =
    Pubkey::new_from_array(b58!("HwXnGK3tPkkVY6P439H2p68AxpeuWXd5PcrAxFpbmfbA"));
pub const NOOP_PROGRAM: Pubkey =
    Pubkey::new_from_array(b58!("noopb9bkMVfRPU8AsbpTUg8AQkHtKwMYZiFUjNRtMmV"));

// The single well-known tree/queue set all orders live in.
// These are protocol constants shared with the on-chain program; changing any
// of them breaks address compatibility for every existing order.
pub const STATE_TREE: Pubkey =
    Pubkey::new_from_array(b58!("smt6ukQDSPPYHSshQovmiRUjG9jGFq2hW9vgrDFk5Yz"));
pub const STATE_QUEUE: Pubkey =
    Pubkey::new_from_array(b58!("nfq6uzaNZ5n3EWF4t64M93AWzLGt5dXTikEA9fFRktv"));
pub const ADDRESS_TREE: Pubkey =
    Pubkey::new_from_array(b58!("amt1Ayt45jfbdw5YSo7iz6WZxUmnZsQTYXy82hVwyC2"));
pub const ADDRESS_QUEUE: Pubkey =
    Pubkey::new_from_array(b58!("aq1S9z4reTSQAdgWHGD2zDaS39sjGrAxbR31vxJ2F4F"));

/// Compute unit limit for order initialization
pub const INIT_COMPUTE_UNITS: u32 = 400_000;
/// Compute unit limit for update/cancel; update writes more fields than
/// cancel but both fit comfortably here
pub const MUTATE_COMPUTE_UNITS: u32 = 300_000;

static CPI_AUTHORITY: OnceLock<Pubkey> = OnceLock::new();
static PROTOCOL_VAULT: OnceLock<Pubkey> = OnceLock::new();

/// The program's CPI signer towards the light system program
pub fn cpi_authority() -> &'static Pubkey {
    CPI_AUTHORITY.get_or_init(|| {
        let (authority, _bump) =
            Pubkey::find_program_address(&[&b"cpi_authority"[..]], &PROGRAM_ID);
        authority
    })
}

/// Vault PDA holding maker deposits while orders are open
pub fn protocol_vault() -> &'static Pubkey {
    PROTOCOL_VAULT.get_or_init(|| {
        let (vault, _bump) =
            Pubkey::find_program_address(&[&b"protocol_vault"[..]], &PROGRAM_ID);
        vault
    })
}
