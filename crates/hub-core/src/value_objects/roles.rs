//! Member role flags
//!
//! Stored as an INTEGER bitfield, exposed in JSON as a list of role names.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Roles: u32 {
        /// Every registered member
        const USER  = 1 << 0;
        /// Access to the admin API
        const ADMIN = 1 << 1;
    }
}

impl Roles {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.contains(Roles::ADMIN)
    }

    /// USER is always retained, whatever was requested
    pub fn normalized(self) -> Self {
        self | Roles::USER
    }

    #[inline]
    pub fn to_i32(self) -> i32 {
        self.bits() as i32
    }

    #[inline]
    pub fn from_i32(bits: i32) -> Self {
        Roles::from_bits_truncate(bits as u32)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }

    /// Parse a role name; unknown names yield `None`
    pub fn parse_name(name: &str) -> Option<Self> {
        Roles::from_name(&name.trim().to_ascii_uppercase())
    }
}

impl Default for Roles {
    fn default() -> Self {
        Roles::USER
    }
}

impl Serialize for Roles {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.names().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Roles {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names.iter().try_fold(Roles::empty(), |acc, name| {
            Roles::parse_name(name)
                .map(|role| acc | role)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown role: {name}")))
        })
    }
}
