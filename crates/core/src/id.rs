// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-size inline id buffers and the [`define_id!`] newtype generator.
//!
//! Ids in this crate are never heap strings: every generated id type stores
//! its bytes inline in an [`IdBuf`], avoiding an allocation per bot, outcome,
//! or dead-letter entry.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Longest id this crate ever produces: a 3-4 byte prefix plus a 19-byte
/// nanoid alphabet suffix, rounded up.
pub const ID_MAX_LEN: usize = 23;

/// Fixed-capacity inline byte buffer for an id string.
///
/// Ids never exceed [`ID_MAX_LEN`] bytes, so storing them inline avoids a
/// heap allocation per id. Always valid UTF-8 because it is only ever
/// constructed from `&str`.
#[derive(Clone, Copy)]
pub struct IdBuf {
    bytes: [u8; ID_MAX_LEN],
    len: u8,
}

impl IdBuf {
    /// Construct from a string slice, truncating to `ID_MAX_LEN` bytes.
    ///
    /// Truncation only happens for malformed/oversized input (e.g. ids
    /// deserialized from an untrusted source); well-formed ids from
    /// [`define_id!`] never reach the limit.
    pub fn new(s: &str) -> Self {
        let mut bytes = [0u8; ID_MAX_LEN];
        let take = s.len().min(ID_MAX_LEN);
        bytes[..take].copy_from_slice(&s.as_bytes()[..take]);
        Self {
            bytes,
            len: take as u8,
        }
    }

    pub fn as_str(&self) -> &str {
        // Safety is not needed: we only ever write valid UTF-8 prefixes,
        // but a mid-codepoint truncation could in theory break that.
        // In practice ids are ASCII (alphanumerics + '-' + '_').
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or("")
    }

    /// The last `n` characters, or the whole id if shorter.
    pub fn short(&self, n: usize) -> &str {
        let s = self.as_str();
        let start = s.len().saturating_sub(n);
        &s[start..]
    }
}

impl fmt::Debug for IdBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for IdBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for IdBuf {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}
impl Eq for IdBuf {}

impl std::hash::Hash for IdBuf {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

/// Generate a newtype id wrapping an [`IdBuf`], with a `new()` constructor
/// that mints a fresh `{prefix}{nanoid}` value and a `from_string()` that
/// accepts an existing id verbatim (for deserialization / lookups).
///
/// ```ignore
/// crate::define_id!(BotId, "bot-");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $prefix:expr) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name($crate::id::IdBuf);

        impl $name {
            /// Mint a fresh id: `{prefix}` followed by a 19-character nanoid suffix.
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                let suffix = nanoid::nanoid!(19);
                Self($crate::id::IdBuf::new(&format!("{}{}", $prefix, suffix)))
            }

            /// Wrap an existing id string verbatim (no validation of the prefix).
            pub fn from_string(s: impl AsRef<str>) -> Self {
                Self($crate::id::IdBuf::new(s.as_ref()))
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// The nanoid suffix with the prefix stripped, or the whole id
            /// if it does not start with the expected prefix.
            pub fn suffix(&self) -> &str {
                self.0.as_str().strip_prefix($prefix).unwrap_or(self.0.as_str())
            }

            /// Last `n` characters, for compact logging.
            pub fn short(&self, n: usize) -> &str {
                self.0.short(n)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Debug::fmt(&self.0, f)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                self.0.as_str()
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::from_string(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::from_string(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.0.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from_string(s))
            }
        }
    };
}

/// Shared [`Deref`]/[`Borrow`] surface documentation anchor; the macro above
/// implements both directly on each generated type.
pub trait IdLike: Deref<Target = str> + Borrow<str> {}
impl<T: Deref<Target = str> + Borrow<str>> IdLike for T {}
