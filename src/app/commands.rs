//! Inbound commands from the host link.
//!
//! The host sends one command per line.  Matching is exact and
//! case-sensitive against a fixed token table; anything else is not a
//! command and is dropped without reply.

/// Commands the host can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Step through every solenoid once, then release them all.
    Reset,
    /// Energise the pump drive line.
    PumpOn,
    /// De-energise both pump lines.
    PumpOff,
    /// Switch the pump to its release line.
    PumpRelease,
}

impl Command {
    /// Token table: `(wire token, command)`.
    pub const TOKENS: [(&'static str, Command); 4] = [
        ("RESET", Command::Reset),
        ("PUMP ON", Command::PumpOn),
        ("PUMP OFF", Command::PumpOff),
        ("PUMP RELEASE", Command::PumpRelease),
    ];

    /// Look up an already framed and trimmed line.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::TOKENS
            .iter()
            .find(|(t, _)| *t == token)
            .map(|&(_, cmd)| cmd)
    }

    /// The wire spelling of this command.
    pub fn token(self) -> &'static str {
        match self {
            Self::Reset => "RESET",
            Self::PumpOn => "PUMP ON",
            Self::PumpOff => "PUMP OFF",
            Self::PumpRelease => "PUMP RELEASE",
        }
    }
}
