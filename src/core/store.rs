//! Purpose: Model the MuPDF resource-store budget passed at context creation.
//! Exports: `StoreBudget`, `STORE_UNLIMITED`, `STORE_DEFAULT`.
//! Role: Typed replacement for the raw `max_store` argument of `fz_new_context`.
//! Invariants: `Bytes` is never zero; raw `0` is reserved for `Unlimited`.
//! Invariants: `Display` output parses back to the same budget.
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::core::error::{Error, ErrorKind};

/// Raw value MuPDF reads as "no ceiling" (`FZ_STORE_UNLIMITED`).
pub const STORE_UNLIMITED: usize = 0;
/// MuPDF's stock budget (`FZ_STORE_DEFAULT`).
pub const STORE_DEFAULT: usize = 256 << 20;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StoreBudget {
    #[default]
    Unlimited,
    Default,
    Bytes(NonZeroUsize),
}

impl StoreBudget {
    pub fn as_raw(self) -> usize {
        match self {
            StoreBudget::Unlimited => STORE_UNLIMITED,
            StoreBudget::Default => STORE_DEFAULT,
            StoreBudget::Bytes(bytes) => bytes.get(),
        }
    }
}

impl fmt::Display for StoreBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBudget::Unlimited => f.write_str("unlimited"),
            StoreBudget::Default => f.write_str("default"),
            StoreBudget::Bytes(bytes) => write!(f, "{bytes}"),
        }
    }
}

impl FromStr for StoreBudget {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => return Err(budget_error(input, "budget is empty")),
            "unlimited" => return Ok(StoreBudget::Unlimited),
            "default" => return Ok(StoreBudget::Default),
            _ => {}
        }

        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, suffix) = trimmed.split_at(split);
        if digits.is_empty() {
            return Err(budget_error(input, "expected a byte count"));
        }
        let count: usize = digits
            .parse()
            .map_err(|err| budget_error(input, "byte count out of range").with_source(err))?;
        let multiplier = suffix_multiplier(suffix.trim())
            .ok_or_else(|| budget_error(input, format!("unknown size suffix `{}`", suffix.trim())))?;
        let bytes = count
            .checked_mul(multiplier)
            .ok_or_else(|| budget_error(input, "byte count out of range"))?;
        NonZeroUsize::new(bytes)
            .map(StoreBudget::Bytes)
            .ok_or_else(|| budget_error(input, "budget must be positive"))
    }
}

fn suffix_multiplier(suffix: &str) -> Option<usize> {
    match suffix.to_ascii_lowercase().as_str() {
        "" | "b" => Some(1),
        "k" | "kb" | "kib" => Some(1 << 10),
        "m" | "mb" | "mib" => Some(1 << 20),
        "g" | "gb" | "gib" => Some(1 << 30),
        _ => None,
    }
}

fn budget_error(input: &str, message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Usage)
        .with_message(format!("invalid store budget `{input}`: {}", message.into()))
        .with_hint("Use `unlimited`, `default`, or a positive size such as `64MiB`.")
}
