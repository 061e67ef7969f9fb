use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An RGB colour with components nominally in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation towards `other`; `t` is not clamped.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        Color::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    pub fn clamped(self) -> Color {
        Color::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }

    /// Parses `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Color> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .ok()
                .map(|v| v as f64 / 255.0)
        };
        Some(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// A property value held by a node instance.
///
/// Shader-producing nodes pass GLSL expressions around as `Value::Shader`;
/// everything else is a plain scalar, colour or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    Null,
    Number(f64),
    Bool(bool),
    Color(Color),
    Text(String),
    Shader(String),
}

// Manual implementation to handle f64
impl Eq for Value {}

// Manual implementation to handle f64 by hashing its bits
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Number(n) => n.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Color(c) => {
                c.r.to_bits().hash(state);
                c.g.to_bits().hash(state);
                c.b.to_bits().hash(state);
            }
            Value::Text(s) | Value::Shader(s) => s.hash(state),
            Value::Null => {}
        }
    }
}

impl Value {
    /// Name of the variant, as shown in `TypeMismatch` errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Number(_) => "Number",
            Value::Bool(_) => "Bool",
            Value::Color(_) => "Color",
            Value::Text(_) => "Text",
            Value::Shader(_) => "Shader",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value as a GLSL expression.
    pub fn to_shader_expr(&self) -> String {
        match self {
            Value::Null => "0.0".to_string(),
            Value::Number(n) => glsl_float(*n),
            Value::Bool(b) => (if *b { "1.0" } else { "0.0" }).to_string(),
            Value::Color(c) => format!(
                "vec3({}, {}, {})",
                glsl_float(c.r),
                glsl_float(c.g),
                glsl_float(c.b)
            ),
            Value::Text(s) | Value::Shader(s) => s.clone(),
        }
    }

    /// Parses the textual form typed into an input widget.
    ///
    /// Finite numbers, `true`/`false` and `#rrggbb` colours are recognised;
    /// anything else becomes `Value::Text`.
    pub fn parse_input(raw: &str) -> Value {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return Value::Number(n);
            }
        }
        match trimmed {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            "null" => return Value::Null,
            _ => {}
        }
        if let Some(color) = Color::from_hex(trimmed) {
            return Value::Color(color);
        }
        Value::Text(trimmed.to_string())
    }
}

/// GLSL float literal for `n`. NaN becomes `0.0` and values outside the
/// `float` range saturate.
fn glsl_float(n: f64) -> String {
    if n.is_nan() {
        return "0.0".to_string();
    }
    let n = n.clamp(f32::MIN as f64, f32::MAX as f64);
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.1}", n)
    } else if n.abs() >= 1e15 {
        format!("{:e}", n)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Color(c) => write!(
                f,
                "#{:02x}{:02x}{:02x}",
                (c.r.clamp(0.0, 1.0) * 255.0).round() as u8,
                (c.g.clamp(0.0, 1.0) * 255.0).round() as u8,
                (c.b.clamp(0.0, 1.0) * 255.0).round() as u8
            ),
            Value::Text(s) => write!(f, "\"{}\"", s),
            Value::Shader(s) => write!(f, "{}", s),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Color> for Value {
    fn from(c: Color) -> Self {
        Value::Color(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}
