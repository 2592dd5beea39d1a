//! Immediate-execution four-function calculator.
//!
//! Operators apply left to right as they are pressed (`2 + 3 × 4` is 20), the
//! same way a pocket calculator behaves. The display is kept as text so that
//! partially typed input such as `0.` survives between key presses.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::{WidgetError, WidgetResult};
use crate::units::parse_leading_float;

const EXPONENT_THRESHOLD: f64 = 1e9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn parse(input: &str) -> WidgetResult<Self> {
        match input.trim() {
            "+" => Ok(Self::Add),
            "-" | "−" => Ok(Self::Subtract),
            "*" | "x" | "×" => Ok(Self::Multiply),
            "/" | "÷" => Ok(Self::Divide),
            other => Err(WidgetError::unsupported("operator", other)),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorSnapshot {
    pub display: String,
    pub formatted: String,
    pub expression: Option<String>,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    display: String,
    previous: Option<f64>,
    operation: Option<Operator>,
    waiting_for_operand: bool,
    warning: Option<String>,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display: "0".into(),
            previous: None,
            operation: None,
            waiting_for_operand: false,
            warning: None,
        }
    }
}

impl CalculatorState {
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn input_digit(&mut self, digit: char) -> WidgetResult<()> {
        if !digit.is_ascii_digit() {
            return Err(WidgetError::invalid("digit", digit.to_string()));
        }
        self.warning = None;
        if self.waiting_for_operand {
            self.display = digit.to_string();
            self.waiting_for_operand = false;
        } else if self.display == "0" {
            self.display = digit.to_string();
        } else {
            self.display.push(digit);
        }
        Ok(())
    }

    pub fn input_decimal(&mut self) {
        self.warning = None;
        if self.waiting_for_operand {
            self.display = "0.".into();
            self.waiting_for_operand = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn backspace(&mut self) {
        self.warning = None;
        if self.display.chars().count() > 1 {
            self.display.pop();
        } else {
            self.display = "0".into();
        }
    }

    pub fn perform_operation(&mut self, next: Operator) {
        self.warning = None;
        let input = parse_display(&self.display);
        match (self.previous, self.operation) {
            (None, _) => self.previous = Some(input),
            (Some(previous), Some(pending)) => {
                let value = self.calculate(previous, input, pending);
                self.display = js_number_string(value);
                self.previous = Some(value);
            }
            (Some(_), None) => self.previous = Some(input),
        }
        self.waiting_for_operand = true;
        self.operation = Some(next);
    }

    pub fn equals(&mut self) {
        let (Some(previous), Some(pending)) = (self.previous, self.operation) else {
            return;
        };
        self.warning = None;
        let input = parse_display(&self.display);
        let value = self.calculate(previous, input, pending);
        self.display = js_number_string(value);
        self.previous = None;
        self.operation = None;
        self.waiting_for_operand = true;
    }

    fn calculate(&mut self, first: f64, second: f64, op: Operator) -> f64 {
        match op {
            Operator::Add => first + second,
            Operator::Subtract => first - second,
            Operator::Multiply => first * second,
            Operator::Divide if second == 0.0 => {
                log::warn!("calculator: division by zero, keeping {first}");
                self.warning = Some("Cannot divide by zero".into());
                first
            }
            Operator::Divide => first / second,
        }
    }

    pub fn snapshot(&self) -> CalculatorSnapshot {
        let expression = match (self.previous, self.operation) {
            (Some(previous), Some(op)) => Some(format!(
                "{} {}",
                format_display(&js_number_string(previous)),
                op.symbol()
            )),
            _ => None,
        };
        CalculatorSnapshot {
            display: self.display.clone(),
            formatted: format_display(&self.display),
            expression,
            warning: self.warning.clone(),
        }
    }
}

fn parse_display(display: &str) -> f64 {
    match display.trim() {
        "Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        other => parse_leading_float(other).unwrap_or(f64::NAN),
    }
}

/// Prints a number the way the page's number-to-string conversion does:
/// shortest round-trip digits, exponent notation outside 1e-7..1e21.
pub fn js_number_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if value == 0.0 {
        return "0".into();
    }
    let magnitude = value.abs();
    if (1e-7..1e21).contains(&magnitude) {
        return format!("{value}");
    }
    with_signed_exponent(&format!("{value:e}"))
}

fn with_signed_exponent(formatted: &str) -> String {
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => formatted.to_string(),
    }
}

/// Display formatting: thousands separators on the integer part, or six-digit
/// exponent notation once the magnitude reaches one billion.
pub fn format_display(value: &str) -> String {
    let num = parse_display(value);
    if num.is_nan() {
        return "0".into();
    }
    if num.abs() >= EXPONENT_THRESHOLD {
        if num.is_infinite() {
            return js_number_string(num);
        }
        return with_signed_exponent(&format!("{num:.6e}"));
    }
    match value.split_once('.') {
        Some((int_part, fraction)) => format!("{}.{fraction}", group_thousands(int_part)),
        None => group_thousands(value),
    }
}

fn group_thousands(int_part: &str) -> String {
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return int_part.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{sign}{out}")
}

/// Stateful calculator handle exported to the page.
#[wasm_bindgen]
#[derive(Default)]
pub struct Calculator {
    state: CalculatorState,
}

#[wasm_bindgen]
impl Calculator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Calculator {
        Calculator::default()
    }

    pub fn digit(&mut self, digit: &str) -> Result<JsValue, JsValue> {
        let mut chars = digit.chars();
        let ch = match (chars.next(), chars.next()) {
            (Some(ch), None) => ch,
            _ => return Err(WidgetError::invalid("digit", digit).into()),
        };
        self.state.input_digit(ch)?;
        self.snapshot()
    }

    pub fn decimal(&mut self) -> Result<JsValue, JsValue> {
        self.state.input_decimal();
        self.snapshot()
    }

    pub fn operation(&mut self, op: &str) -> Result<JsValue, JsValue> {
        self.state.perform_operation(Operator::parse(op)?);
        self.snapshot()
    }

    pub fn equals(&mut self) -> Result<JsValue, JsValue> {
        self.state.equals();
        self.snapshot()
    }

    pub fn backspace(&mut self) -> Result<JsValue, JsValue> {
        self.state.backspace();
        self.snapshot()
    }

    pub fn clear(&mut self) -> Result<JsValue, JsValue> {
        self.state.clear();
        self.snapshot()
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state.snapshot())
            .map_err(|err| WidgetError::from(err).into())
    }
}
