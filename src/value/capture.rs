//! Interactive value capture
//!
//! Boolean grammar, case-insensitive:
//!
//! | input                          | value |
//! |--------------------------------|-------|
//! | `1`, `t`, `true`, `y`, `yes`   | true  |
//! | `0`, `f`, `false`, `n`, `no`   | false |
//! | any other integer              | true if non-zero |
//!
//! Anything else is rejected.

use std::io::{BufRead, Write};

use crate::console::{Console, ConsoleError, ConsoleResult};
use crate::schema::DataType;

use super::Value;

/// Prompt for and parse one value of `data_type`
pub fn capture_value<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    data_type: DataType,
) -> ConsoleResult<Value> {
    match data_type {
        DataType::Int => console.ask_i64("Integer: ").map(Value::Int),
        DataType::Float => console.ask_f64("Decimal: ").map(Value::Float),
        DataType::Text => console.ask_text("Text: ").map(Value::Text),
        DataType::Bool => {
            let token = console.ask("Boolean: ")?;
            parse_bool(&token).map(Value::Bool)
        }
    }
}

/// Parse a boolean token
pub fn parse_bool(token: &str) -> ConsoleResult<bool> {
    match token.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "y" | "yes" => Ok(true),
        "0" | "f" | "false" | "n" | "no" => Ok(false),
        other => other
            .parse::<i64>()
            .map(|n| n != 0)
            .map_err(|_| ConsoleError::InvalidBool(token.to_string())),
    }
}
