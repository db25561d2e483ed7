// src/protocol/roster.rs
use crate::protocol::alias::AliasType;
use crate::protocol::decode_latin1;

const SOUL_PREFIX: &str = "SOUL";

/// Player tokens from a roster reply. Only tokens that look like player ids
/// are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub players: Vec<String>,
}

impl Roster {
    pub fn count(&self) -> usize {
        self.players.len()
    }
}

/// A token counts as a player when it is a non-empty hex id or a `SOUL` id.
pub fn is_player_token(token: &str) -> bool {
    !token.is_empty()
        && (token.chars().all(|c| c.is_ascii_hexdigit()) || token.starts_with(SOUL_PREFIX))
}

pub fn parse_roster(data: &[u8]) -> Roster {
    let text = decode_latin1(data);
    let body = text.strip_prefix(AliasType::Roster.as_char()).unwrap_or(&text);

    let players = body
        .split(',')
        .filter(|token| is_player_token(token))
        .map(str::to_string)
        .collect();

    Roster { players }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_hex_and_soul_tokens() {
        let roster = parse_roster(b"1A2B3C,zzzz,SOULxyz,");

        assert_eq!(roster.count(), 2);
        assert_eq!(roster.players, vec!["1A2B3C", "SOULxyz"]);
    }

    #[test]
    fn strips_single_echoed_alias() {
        assert_eq!(parse_roster(b"Qab12,CD34").players, vec!["ab12", "CD34"]);
        // Only one echo is removed; `Q` is not a hex digit.
        assert_eq!(parse_roster(b"QQab12").count(), 0);
    }

    #[test]
    fn empty_or_padded_reply_counts_zero() {
        assert_eq!(parse_roster(b"").count(), 0);
        assert_eq!(parse_roster(b"Q").count(), 0);
        assert_eq!(parse_roster(b"Q\0\0\0").count(), 0);
    }

    #[test]
    fn token_validity() {
        assert!(is_player_token("deadBEEF"));
        assert!(is_player_token("SOUL"));
        assert!(!is_player_token("soul1"));
        assert!(!is_player_token(""));
        assert!(!is_player_token("12 34"));
    }
}
