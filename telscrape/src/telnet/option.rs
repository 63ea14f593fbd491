//! Telnet negotiation units (RFC 854/855).

use std::fmt;
use std::hash::{Hash, Hasher};

/// IAC - Interpret As Command.
pub const IAC: u8 = 0xFF;

/// Subnegotiation begin.
pub const SB: u8 = 0xFA;
/// Sender wants to enable an option.
pub const WILL: u8 = 0xFB;
/// Sender refuses to enable an option.
pub const WONT: u8 = 0xFC;
/// Sender asks the receiver to enable an option.
pub const DO: u8 = 0xFD;
/// Sender asks the receiver to disable an option.
pub const DONT: u8 = 0xFE;

/// The negotiation action following an IAC byte.
///
/// Equality and hashing go by wire value, so `Verb::Command(WILL)` equals
/// `Verb::Will`. [`Verb::from_byte`] never produces `Command` for one of the
/// five verb bytes.
#[derive(Debug, Clone, Copy)]
pub enum Verb {
    Will,
    Wont,
    Do,
    Dont,
    /// Only the first parameter byte of a subnegotiation is captured.
    Subnegotiation,
    /// Any other byte found after IAC (GA, NOP, an escaped 0xFF...).
    Command(u8),
}

impl Verb {
    /// Classify the byte that follows IAC.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            WILL => Verb::Will,
            WONT => Verb::Wont,
            DO => Verb::Do,
            DONT => Verb::Dont,
            SB => Verb::Subnegotiation,
            other => Verb::Command(other),
        }
    }

    /// Wire value of this verb.
    pub fn to_byte(self) -> u8 {
        match self {
            Verb::Will => WILL,
            Verb::Wont => WONT,
            Verb::Do => DO,
            Verb::Dont => DONT,
            Verb::Subnegotiation => SB,
            Verb::Command(byte) => byte,
        }
    }

    fn name(self) -> &'static str {
        match Verb::from_byte(self.to_byte()) {
            Verb::Will => "Will",
            Verb::Wont => "Won't",
            Verb::Do => "Do",
            Verb::Dont => "Don't",
            Verb::Subnegotiation => "Subnegotiation",
            Verb::Command(_) => "Command",
        }
    }
}

impl PartialEq for Verb {
    fn eq(&self, other: &Self) -> bool {
        self.to_byte() == other.to_byte()
    }
}

impl Eq for Verb {}

impl Hash for Verb {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_byte().hash(state);
    }
}

/// One decoded `IAC <verb> <code>` unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TelnetOption {
    verb: Verb,
    code: u8,
}

impl TelnetOption {
    /// Create an option from a verb and an option code.
    pub fn new(verb: Verb, code: u8) -> Self {
        Self { verb, code }
    }

    /// Build an option from the two bytes following IAC.
    pub fn from_pair(verb: u8, code: u8) -> Self {
        Self::new(Verb::from_byte(verb), code)
    }

    /// Parse a 3-byte wire unit. Returns `None` unless it starts with IAC.
    pub fn from_bytes(bytes: [u8; 3]) -> Option<Self> {
        match bytes {
            [IAC, verb, code] => Some(Self::from_pair(verb, code)),
            _ => None,
        }
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    /// The 3-byte wire form.
    pub fn to_bytes(&self) -> [u8; 3] {
        [IAC, self.verb.to_byte(), self.code]
    }

    /// Concatenate the wire forms of `options`, in order.
    pub fn encode_all(options: &[TelnetOption]) -> Vec<u8> {
        options.iter().flat_map(|o| o.to_bytes()).collect()
    }

    /// True for DO: the remote asks us to enable the option.
    pub fn is_request(&self) -> bool {
        self.verb == Verb::Do
    }

    /// True for WILL: the remote offers to enable the option.
    pub fn is_offer(&self) -> bool {
        self.verb == Verb::Will
    }

    /// Human-readable option name, if the code is a well-known one.
    pub fn name(&self) -> Option<&'static str> {
        option_name(self.code)
    }
}

impl fmt::Display for TelnetOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) {}({})",
            self.verb.name(),
            self.verb.to_byte(),
            self.name().unwrap_or("Unknown"),
            self.code
        )
    }
}

/// Name of a well-known option code.
pub fn option_name(code: u8) -> Option<&'static str> {
    let name = match code {
        0 => "Binary Transmission",
        1 => "Echo",
        3 => "Suppress Go Ahead",
        5 => "Status",
        6 => "Timing Mark",
        10 => "Output Carriage-Return Disposition",
        11 => "Output Horizontal Tab Stops",
        12 => "Output Horizontal Tab Stop Disposition",
        13 => "Output Formfeed Disposition",
        14 => "Output Vertical Tabstops",
        15 => "Output Vertical Tab Disposition",
        16 => "Output Linefeed Disposition",
        17 => "Extended ASCII",
        24 => "Terminal Type",
        31 => "Negotiate About Window Size",
        32 => "Terminal Speed",
        33 => "Remote Flow Control",
        34 => "Linemode",
        36 => "Environment Variables",
        39 => "New Environment",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_round_trip_all_codes() {
        for verb in [Verb::Will, Verb::Wont, Verb::Do, Verb::Dont] {
            for code in 0..=u8::MAX {
                let option = TelnetOption::new(verb, code);
                let decoded = TelnetOption::from_bytes(option.to_bytes()).unwrap();
                assert_eq!(decoded, option);
                assert_eq!(decoded.verb(), verb);
                assert_eq!(decoded.code(), code);
            }
        }
    }

    #[test]
    fn test_wire_values() {
        let wont_echo = TelnetOption::new(Verb::Wont, 1);
        assert_eq!(wont_echo.to_bytes(), [0xFF, 0xFC, 0x01]);
        assert_eq!(Verb::from_byte(0xFA), Verb::Subnegotiation);
        assert_eq!(Verb::from_byte(0xF9), Verb::Command(0xF9));
        assert_eq!(Verb::Command(0xF9).to_byte(), 0xF9);
    }

    #[test]
    fn test_command_holding_verb_byte() {
        use std::collections::HashSet;

        let option = TelnetOption::new(Verb::Command(WILL), 1);
        let decoded = TelnetOption::from_bytes(option.to_bytes()).unwrap();
        assert_eq!(decoded, option);
        assert!(matches!(decoded.verb(), Verb::Will));
        assert!(option.is_offer());

        let set: HashSet<Verb> = [Verb::Do, Verb::Command(DO)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_from_bytes_requires_iac() {
        assert!(TelnetOption::from_bytes([0x00, DO, 1]).is_none());
    }

    #[test]
    fn test_encode_all_preserves_order() {
        let options = [
            TelnetOption::new(Verb::Wont, 1),
            TelnetOption::new(Verb::Dont, 3),
        ];
        assert_eq!(
            TelnetOption::encode_all(&options),
            vec![0xFF, 0xFC, 0x01, 0xFF, 0xFE, 0x03]
        );
        assert!(TelnetOption::encode_all(&[]).is_empty());
    }

    #[test]
    fn test_display() {
        let option = TelnetOption::new(Verb::Do, 1);
        assert_eq!(option.to_string(), "Do(253) Echo(1)");

        let option = TelnetOption::new(Verb::Will, 200);
        assert_eq!(option.to_string(), "Will(251) Unknown(200)");
    }
}
