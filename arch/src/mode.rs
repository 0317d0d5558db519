use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::Word;

/// The eight operand addressing modes, numbered as they appear in bits 3-5
/// of an operand field.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AddrMode {
    /// `Rn`
    #[default]
    Register = 0,
    /// `(Rn)` or `@Rn`
    RegisterDeferred = 1,
    /// `(Rn)+`, and `#n` when the register is PC
    AutoIncrement = 2,
    /// `@(Rn)+`, and `@#n` when the register is PC
    AutoIncrementDeferred = 3,
    /// `-(Rn)`
    AutoDecrement = 4,
    /// `@-(Rn)`
    AutoDecrementDeferred = 5,
    /// `X(Rn)`
    Index = 6,
    /// `@X(Rn)`
    IndexDeferred = 7,
}

impl AddrMode {
    /// Indexed modes carry their offset in an extra word.
    pub fn is_indexed(self) -> bool {
        matches!(self, AddrMode::Index | AddrMode::IndexDeferred)
    }

    pub fn bits(self) -> Word {
        u8::from(self) as Word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_modes() {
        assert!(AddrMode::Index.is_indexed());
        assert!(AddrMode::IndexDeferred.is_indexed());
        assert!(!AddrMode::AutoIncrement.is_indexed());
        assert!(!AddrMode::Register.is_indexed());
    }

    #[test]
    fn names_are_snake_case() {
        assert_eq!(
            "auto_increment_deferred".parse::<AddrMode>(),
            Ok(AddrMode::AutoIncrementDeferred)
        );
        assert_eq!(AddrMode::IndexDeferred.to_string(), "index_deferred");
    }

    #[test]
    fn bits_match_mode_number() {
        assert_eq!(AddrMode::Register.bits(), 0);
        assert_eq!(AddrMode::AutoDecrementDeferred.bits(), 5);
        assert_eq!(AddrMode::try_from(6u8).ok(), Some(AddrMode::Index));
    }
}
