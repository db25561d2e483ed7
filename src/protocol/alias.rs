// src/protocol/alias.rs

/// Leading character selecting what an alias request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasType {
    /// `?` - list registered servers (sent to a master).
    Discovery,
    /// `P` - server name, world and rules.
    Info,
    /// `Q` - connected player roster.
    Roster,
}

impl AliasType {
    pub fn as_char(self) -> char {
        match self {
            Self::Discovery => '?',
            Self::Info => 'P',
            Self::Roster => 'Q',
        }
    }
}

// Identity fields are fixed; servers only look at the prefix.
const ALIAS_PAYLOAD: &str =
    "alias=fetch,name=TestName,email=test@example.com,loc=TestLocation,sernum=123456,HHMM=0000,d=data1,v=data2,w=data3";

pub fn alias_request(alias: AliasType) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + ALIAS_PAYLOAD.len());
    out.push(alias.as_char() as u8);
    out.extend_from_slice(ALIAS_PAYLOAD.as_bytes());
    out
}
