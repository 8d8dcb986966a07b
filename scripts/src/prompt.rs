//! Interactive prompts for values the deployment records cannot provide

use std::{
    io::{self, BufRead, Write},
    str::FromStr,
};

use alloy::primitives::Address;

use crate::errors::ScriptError;

/// Prompt on stdin until the operator enters a valid address
pub fn prompt_for_address(prompt: &str) -> Result<Address, ScriptError> {
    let stdin = io::stdin();
    read_address(prompt, &mut stdin.lock(), &mut io::stdout())
}

/// Write `prompt` and read one trimmed line
fn read_input(
    prompt: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<String, ScriptError> {
    write!(output, "{}: ", prompt).map_err(|e| ScriptError::Prompt(e.to_string()))?;
    output.flush().map_err(|e| ScriptError::Prompt(e.to_string()))?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| ScriptError::Prompt(e.to_string()))?;
    if read == 0 {
        return Err(ScriptError::Prompt("input closed".to_string()));
    }

    Ok(line.trim().to_string())
}

/// Read lines until one parses as an address
fn read_address(
    prompt: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Address, ScriptError> {
    loop {
        let line = read_input(prompt, input, output)?;
        match Address::from_str(&line) {
            Ok(address) => return Ok(address),
            Err(_) => {
                writeln!(
                    output,
                    "Invalid address. Please enter a valid address (0x followed by 40 hex characters)."
                )
                .map_err(|e| ScriptError::Prompt(e.to_string()))?;
            }
        }
    }
}
