//! Argument checks run by every workflow before it touches the admin gateway.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{IcError, Result};

pub const MIN_PASSWORD_LEN: usize = 4;
pub const MIN_PORT: i64 = 1024;
pub const MAX_PORT: i64 = 65535;

static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)(\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)){3}$")
        .expect("static IPv4 pattern")
});

static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$")
        .expect("static hostname pattern")
});

pub fn require_in_range(value: Option<i64>, lo: i64, hi: i64, name: &str) -> Result<i64> {
    let value = value.ok_or_else(|| IcError::validation(format!("The {name} cannot be null.")))?;
    if value < lo || value > hi {
        return Err(IcError::validation(format!(
            "The {name} needs to be between {lo} and {hi}."
        )));
    }
    Ok(value)
}

pub fn require_non_empty<'a>(value: &'a str, name: &str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(IcError::validation(format!("The {name} cannot be empty.")));
    }
    Ok(value)
}

pub fn require_password<'a>(value: &'a str, min_len: usize, name: &str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(IcError::validation(format!(
            "The {name} cannot be null or empty."
        )));
    }
    if value.chars().count() < min_len {
        return Err(IcError::validation(format!(
            "The {name} minimum length has to be {min_len}."
        )));
    }
    Ok(value)
}

/// TCP port of a non-sandbox instance.
pub fn require_port(value: i64, name: &str) -> Result<u16> {
    if !(MIN_PORT..=MAX_PORT).contains(&value) {
        return Err(IcError::validation(format!(
            "Invalid {name} value. Please use a valid TCP port number >= {MIN_PORT} and <= {MAX_PORT}."
        )));
    }
    // In range, so the conversion cannot fail.
    u16::try_from(value).map_err(|e| IcError::validation(e.to_string()))
}

/// Non-empty and either a dotted-quad IPv4 address or a domain name.
pub fn require_host<'a>(value: &'a str, name: &str) -> Result<&'a str> {
    require_non_empty(value, name)?;
    if !is_valid_ipv4(value) && !is_valid_hostname(value) {
        return Err(IcError::validation(format!(
            "The {name} given is not a valid IP address nor domain name."
        )));
    }
    Ok(value)
}

pub fn is_valid_ipv4(s: &str) -> bool {
    IPV4_RE.is_match(s)
}

pub fn is_valid_hostname(s: &str) -> bool {
    s.len() <= 253 && HOSTNAME_RE.is_match(s)
}
