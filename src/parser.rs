//! Line oriented reader for the cQASM 1.0 subset the simulator accepts.
//!
//! Parsing only checks the shape of each line. Gate names, operand counts and
//! qubit ranges are checked when the statements are turned into circuits.

use crate::config::constants::MAX_QUBITS;
use crate::config::{BitIdx, QubitIdx, Real};
use crate::error::LoadError;

pub const DEFAULT_SUBCIRCUIT: &str = "default";

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Qubits(Vec<QubitIdx>),
    Bits(Vec<BitIdx>),
    Number(Real),
}

/// One operation as written, e.g. `cnot q[0], q[1]`. The name is lower case.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub line: usize,
    pub name: String,
    pub operands: Vec<Operand>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subcircuit {
    pub name: String,
    pub iterations: usize,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub num_qubits: usize,
    pub subcircuits: Vec<Subcircuit>,
}

fn syntax_error(line: usize, message: impl Into<String>) -> LoadError {
    LoadError::Syntax {
        line,
        message: message.into(),
    }
}

/// Splits on `separator` outside of square brackets.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn parse_index(line: usize, text: &str) -> Result<usize, LoadError> {
    text.trim()
        .parse::<usize>()
        .map_err(|_| syntax_error(line, format!("invalid index '{}'", text.trim())))
}

/// Contents of `q[...]` or `b[...]`: comma separated indices and inclusive ranges.
fn parse_index_list(line: usize, text: &str) -> Result<Vec<usize>, LoadError> {
    let mut indices = Vec::new();
    for item in text.split(',') {
        match item.split_once(':') {
            Some((from, to)) => {
                let (from, to) = (parse_index(line, from)?, parse_index(line, to)?);
                if from > to {
                    return Err(syntax_error(line, format!("empty range {}:{}", from, to)));
                }
                indices.extend(from..=to);
            }
            None => indices.push(parse_index(line, item)?),
        }
    }
    Ok(indices)
}

fn parse_operand(line: usize, text: &str) -> Result<Operand, LoadError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(syntax_error(line, "empty operand"));
    }

    let register = |prefix: char| {
        let rest = text.strip_prefix(prefix)?.trim_start();
        rest.strip_prefix('[')?.strip_suffix(']')
    };

    if let Some(inner) = register('q') {
        Ok(Operand::Qubits(parse_index_list(line, inner)?))
    } else if let Some(inner) = register('b') {
        Ok(Operand::Bits(parse_index_list(line, inner)?))
    } else {
        text.parse::<Real>()
            .map(Operand::Number)
            .map_err(|_| syntax_error(line, format!("invalid operand '{}'", text)))
    }
}

fn parse_statement(line: usize, text: &str) -> Result<Statement, LoadError> {
    let text = text.trim();
    let (name, rest) = match text.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (text, ""),
    };

    if name.is_empty() {
        return Err(syntax_error(line, "empty operation"));
    }

    let operands = if rest.is_empty() {
        vec![]
    } else {
        split_top_level(rest, ',')
            .into_iter()
            .map(|operand| parse_operand(line, operand))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(Statement {
        line,
        name: name.to_lowercase(),
        operands,
    })
}

/// `.name` or `.name(k)`.
fn parse_subcircuit_header(line: usize, text: &str) -> Result<Subcircuit, LoadError> {
    let header = text.trim_start_matches('.').trim();
    let (name, iterations) = match header.split_once('(') {
        Some((name, count)) => {
            let count = count
                .strip_suffix(')')
                .ok_or_else(|| syntax_error(line, "unterminated iteration count"))?;
            let iterations = parse_index(line, count)?;
            if iterations == 0 {
                return Err(syntax_error(line, "iteration count must be positive"));
            }
            (name.trim(), iterations)
        }
        None => (header, 1),
    };

    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(syntax_error(line, format!("invalid subcircuit name '{}'", name)));
    }

    Ok(Subcircuit {
        name: name.to_string(),
        iterations,
        statements: vec![],
    })
}

fn parse_qubit_count(line: usize, rest: &str) -> Result<usize, LoadError> {
    let count = parse_index(line, rest)?;
    if count == 0 || count > MAX_QUBITS {
        return Err(LoadError::InvalidQubitCount {
            line,
            count,
            max: MAX_QUBITS,
        });
    }
    Ok(count)
}

pub fn parse_program(source: &str) -> Result<Program, LoadError> {
    let mut num_qubits = None;
    let mut subcircuits: Vec<Subcircuit> = vec![];

    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let text = match raw.split_once('#') {
            Some((code, _)) => code.trim(),
            None => raw.trim(),
        };
        if text.is_empty() {
            continue;
        }

        let first = text.split_whitespace().next().unwrap_or_default();
        let keyword = first.to_lowercase();
        let rest = text[first.len()..].trim();

        match keyword.as_str() {
            "version" => continue,
            "qubits" => {
                if num_qubits.is_some() {
                    return Err(syntax_error(line, "qubit count given twice"));
                }
                num_qubits = Some(parse_qubit_count(line, rest)?);
                continue;
            }
            "error_model" | "display" | "display_binary" | "load_state" | "wait" | "skip"
            | "barrier" => {
                return Err(LoadError::UnsupportedStatement {
                    line,
                    statement: keyword,
                });
            }
            _ => {}
        }

        if text.starts_with('.') {
            subcircuits.push(parse_subcircuit_header(line, text)?);
            continue;
        }

        if num_qubits.is_none() {
            return Err(LoadError::MissingQubitCount);
        }

        let statements = match text.strip_prefix('{') {
            Some(bundle) => {
                let inner = bundle
                    .strip_suffix('}')
                    .ok_or_else(|| syntax_error(line, "unterminated bundle"))?;
                split_top_level(inner, '|')
                    .into_iter()
                    .map(|op| parse_statement(line, op))
                    .collect::<Result<Vec<_>, _>>()?
            }
            None => vec![parse_statement(line, text)?],
        };

        if subcircuits.is_empty() {
            subcircuits.push(Subcircuit {
                name: DEFAULT_SUBCIRCUIT.to_string(),
                iterations: 1,
                statements: vec![],
            });
        }
        if let Some(current) = subcircuits.last_mut() {
            current.statements.extend(statements);
        }
    }

    let num_qubits = num_qubits.ok_or(LoadError::MissingQubitCount)?;
    log::debug!(
        "parsed {} subcircuits on {} qubits",
        subcircuits.len(),
        num_qubits
    );

    Ok(Program {
        num_qubits,
        subcircuits,
    })
}
