//! Parser for the one-line instance format.

use std::num::ParseIntError;

use thiserror::Error;

use super::Machine;
use super::MachineError;

#[derive(Debug, Error)]
pub enum ParseMachineError {
    #[error("the line is empty")]
    EmptyLine,
    #[error("expected a parenthesised button token, got '{0}'")]
    MalformedButton(String),
    #[error("expected a bracketed indicator token, got '{0}'")]
    MalformedIndicator(String),
    #[error("expected a brace-delimited target token, got '{0}'")]
    MalformedTargets(String),
    #[error("the line has no button tokens")]
    MissingButtons,
    #[error("invalid integer '{token}': {source}")]
    InvalidInteger {
        token: String,
        source: ParseIntError,
    },
    #[error("indicator token has {lights} lights but the target vector has {targets} entries")]
    IndicatorMismatch { lights: usize, targets: usize },
    #[error(transparent)]
    Machine(#[from] MachineError),
}

/// Parses one instance line: an optional `[...]` indicator token, one `(...)`
/// token per button, and a final `{...}` target token.
pub(crate) fn parse_machine(line: &str) -> Result<Machine, ParseMachineError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&last, rest)) = tokens.split_last() else {
        return Err(ParseMachineError::EmptyLine);
    };

    // The indicator lights belong to a related puzzle variant; the token is
    // accepted and checked for shape, but otherwise ignored.
    let (indicator_lights, button_tokens) = match rest.split_first() {
        Some((&first, tail)) if first.starts_with('[') => {
            let lights = first
                .strip_prefix('[')
                .and_then(|token| token.strip_suffix(']'))
                .ok_or_else(|| ParseMachineError::MalformedIndicator(first.to_owned()))?;
            (Some(lights.chars().count()), tail)
        }
        _ => (None, rest),
    };

    let targets = last
        .strip_prefix('{')
        .and_then(|token| token.strip_suffix('}'))
        .ok_or_else(|| ParseMachineError::MalformedTargets(last.to_owned()))?;
    let targets = parse_integers::<u32>(targets)?;

    if let Some(lights) = indicator_lights {
        if lights != targets.len() {
            return Err(ParseMachineError::IndicatorMismatch {
                lights,
                targets: targets.len(),
            });
        }
    }

    if button_tokens.is_empty() {
        return Err(ParseMachineError::MissingButtons);
    }

    let mut buttons = Vec::with_capacity(button_tokens.len());
    for &token in button_tokens {
        let indices = token
            .strip_prefix('(')
            .and_then(|inner| inner.strip_suffix(')'))
            .ok_or_else(|| ParseMachineError::MalformedButton(token.to_owned()))?;
        buttons.push(parse_integers::<usize>(indices)?);
    }

    Ok(Machine::new(buttons, targets)?)
}

fn parse_integers<T: std::str::FromStr<Err = ParseIntError>>(
    list: &str,
) -> Result<Vec<T>, ParseMachineError> {
    list.split(',')
        .map(|token| {
            token
                .parse::<T>()
                .map_err(|source| ParseMachineError::InvalidInteger {
                    token: token.to_owned(),
                    source,
                })
        })
        .collect()
}
