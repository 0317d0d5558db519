use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::Word;

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
pub enum Reg {
    #[default]
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    /// Stack pointer
    #[strum(to_string = "R6", serialize = "SP")]
    #[serde(alias = "SP")]
    R6,
    /// Program counter
    #[strum(to_string = "R7", serialize = "PC")]
    #[serde(alias = "PC")]
    R7,
}

impl Reg {
    pub const SP: Reg = Reg::R6;
    pub const PC: Reg = Reg::R7;

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_uppercase().parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Unknown reg name: {s}")),
        }
    }

    /// Register number as the low three bits of an operand field.
    pub fn bits(self) -> Word {
        u8::from(self) as Word
    }
}
