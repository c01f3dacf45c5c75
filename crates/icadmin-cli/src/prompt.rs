//! Resolution of missing command arguments by asking the user.

use anyhow::{Context, Result};
use icadmin_core::IcError;
use std::io::{self, BufRead, Write};

/// Print `prompt` and read one line. An empty answer yields `default`, if any.
fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    default: Option<&str>,
) -> io::Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    Ok(match (answer.is_empty(), default) {
        (true, Some(d)) => d.to_string(),
        _ => answer.to_string(),
    })
}

/// Ask for a new password until two entries match.
fn confirm_with<F, W>(mut read: F, output: &mut W, prompt: &str, repeat: &str) -> io::Result<String>
where
    F: FnMut(&str) -> io::Result<String>,
    W: Write,
{
    let first = read(prompt)?;
    loop {
        if read(repeat)? == first {
            return Ok(first);
        }
        writeln!(output, "The passwords do not match. Please try again.")?;
    }
}

fn ask(prompt: &str, default: Option<&str>) -> Result<String> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    read_answer(&mut stdin.lock(), &mut stdout, prompt, default).context("failed to read input")
}

pub fn text(value: Option<String>, prompt: &str, default: Option<&str>) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => ask(prompt, default),
    }
}

/// Parse a command-line or typed integer argument.
pub fn integer(value: &str, name: &str) -> Result<i64> {
    value.trim().parse::<i64>().map_err(|_| {
        anyhow::Error::from(IcError::validation(format!(
            "The {name} given is not an integer."
        )))
    })
}

pub fn number(value: Option<String>, prompt: &str, default: i64, name: &str) -> Result<i64> {
    let answer = match value {
        Some(v) => v,
        None => ask(prompt, Some(&default.to_string()))?,
    };
    integer(&answer, name)
}

pub fn password(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => rpassword::prompt_password_stdout(prompt).context("failed to read password"),
    }
}

/// Like [`password`], but a prompted password has to be entered twice.
pub fn new_password(value: Option<String>, prompt: &str, repeat: &str) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    confirm_with(rpassword::prompt_password_stdout, &mut io::stdout(), prompt, repeat)
        .context("failed to read password")
}
