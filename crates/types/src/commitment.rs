//! Hash commitments for the commit-reveal randomness beacon.
//!
//! A participant commits to a secret value by publishing
//! `hash(salt_hex || "|" || value)` with a fresh 256-bit salt, and later
//! reveals `(value, salt)`. Anyone holding the commitment can check that the
//! reveal reproduces it.

use crate::hash::hex_bytes;
use crate::Hash;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Random salt blinding a committed value.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Salt(#[serde(with = "hex_bytes")] [u8; 32]);

impl Salt {
    /// Draw a fresh salt.
    pub fn random(rng: &mut impl RngCore) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Salt(bytes)
    }

    /// Build a salt from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Salt(bytes)
    }

    /// Hex form, as hashed into the commitment.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({}..)", &self.to_hex()[..8])
    }
}

/// Hiding commitment to a random value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commitment(pub Hash);

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opening of a commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    /// The committed value.
    pub value: u32,
    /// The salt used when committing.
    pub salt: Salt,
}

impl Reveal {
    /// Compute the commitment this reveal opens.
    pub fn commitment(&self) -> Commitment {
        let value = self.value.to_string();
        Commitment(Hash::from_parts(&[
            self.salt.to_hex().as_bytes(),
            b"|",
            value.as_bytes(),
        ]))
    }

    /// Check that this reveal reproduces `commitment`.
    pub fn opens(&self, commitment: &Commitment) -> bool {
        self.commitment() == *commitment
    }
}

/// Commit to `value` with a fresh salt drawn from `rng`.
pub fn commit(value: u32, rng: &mut impl RngCore) -> (Commitment, Reveal) {
    let reveal = Reveal {
        value,
        salt: Salt::random(rng),
    };
    (reveal.commitment(), reveal)
}
