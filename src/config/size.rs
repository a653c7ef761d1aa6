//! Human readable file sizes (`100MB`, `1.5 GiB`, `4096`).
//!
//! Decimal suffixes (`KB`, `MB`, ...) are powers of 1000 and binary suffixes
//! (`KiB`, `MiB`, ...) powers of 1024. A bare number is a byte count.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SizeError {
    #[error("empty size")]
    Empty,

    #[error("invalid number in size '{0}'")]
    InvalidNumber(String),

    #[error("unknown size unit '{0}'")]
    UnknownUnit(String),
}

pub fn parse_size(input: &str) -> Result<u64, SizeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SizeError::Empty);
    }

    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    let number: f64 = number
        .parse()
        .map_err(|_| SizeError::InvalidNumber(input.to_string()))?;

    let multiplier: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" | "byte" | "bytes" => 1,
        "k" | "kb" => 1000,
        "m" | "mb" => 1000_u64.pow(2),
        "g" | "gb" => 1000_u64.pow(3),
        "t" | "tb" => 1000_u64.pow(4),
        "p" | "pb" => 1000_u64.pow(5),
        "kib" => 1 << 10,
        "mib" => 1 << 20,
        "gib" => 1 << 30,
        "tib" => 1 << 40,
        "pib" => 1 << 50,
        other => return Err(SizeError::UnknownUnit(other.to_string())),
    };

    Ok((number * multiplier as f64) as u64)
}
