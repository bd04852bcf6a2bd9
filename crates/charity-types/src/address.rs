use crate::error::TypesError;
use bech32::{Bech32m, Hrp};
use std::fmt;
use std::str::FromStr;

/// Human-readable part of the Bech32m text form.
const HRP: &str = "char";

/// Identity of a contributor, voter or beneficiary.
///
/// The host runtime owns identity: it hands the treasury 20 opaque bytes and
/// the treasury only compares, orders and hashes them. Text form is Bech32m
/// (`char1...`); `0x`-prefixed hex is accepted on input.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero principal, used as the default treasury account.
    pub const ZERO: Self = Self([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, TypesError> {
        let bytes: [u8; 20] = slice
            .try_into()
            .map_err(|_| TypesError::InvalidAddressLength(slice.len()))?;
        Ok(Self(bytes))
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    fn parse_bech32(s: &str) -> Result<Self, TypesError> {
        let (hrp, data) =
            bech32::decode(s).map_err(|e| TypesError::Bech32Error(e.to_string()))?;
        if hrp.as_str() != HRP {
            return Err(TypesError::InvalidAddressFormat(format!(
                "expected prefix '{HRP}', got '{hrp}'"
            )));
        }
        Self::from_slice(&data)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hrp = Hrp::parse_unchecked(HRP);
        let text = bech32::encode::<Bech32m>(hrp, &self.0).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return Self::from_slice(&hex::decode(digits)?);
        }
        if s.starts_with(HRP) {
            return Self::parse_bech32(s);
        }
        Err(TypesError::InvalidAddressFormat(s.to_string()))
    }
}
