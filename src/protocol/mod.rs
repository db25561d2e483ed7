//! Wire formats spoken with masters and game servers.
//!
//! Everything here is a pure function of its input: building the alias
//! request strings, decoding the binary discovery reply and scraping the two
//! text replies. No I/O happens in this module.

pub mod alias;
pub mod info;
pub mod master_reply;
pub mod roster;

pub use alias::{alias_request, AliasType};
pub use info::{parse_server_info, ServerDetails};
pub use master_reply::{decode_candidates, decode_records, DEFAULT_RESERVED_NETWORK, RECORD_SIZE};
pub use roster::{parse_roster, Roster};

/// Single-byte-per-character decoding with null padding removed.
pub(crate) fn decode_latin1(data: &[u8]) -> String {
    data.iter().filter(|&&b| b != 0).map(|&b| char::from(b)).collect()
}
