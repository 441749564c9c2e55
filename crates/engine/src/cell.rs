use serde::{Deserialize, Serialize};

/// A single value in the sales report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Interpret raw text the way a spreadsheet cell would: blanks are empty,
    /// numbers (with optional thousands separators) are numeric, the rest is text.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        if let Ok(num) = trimmed.parse::<f64>() {
            if num.is_finite() {
                return CellValue::Number(num);
            }
        }

        let without_commas: String = trimmed.chars().filter(|c| *c != ',').collect();
        if without_commas != trimmed {
            if let Ok(num) = without_commas.parse::<f64>() {
                if num.is_finite() {
                    return CellValue::Number(num);
                }
            }
        }

        CellValue::Text(trimmed.to_string())
    }

    /// Numeric value, if the cell holds one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Contribution of this cell to a sum. Non-numeric cells count as zero.
    pub fn summand(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// JSON rendering used by the answer formatter.
    ///
    /// Integral numbers render without a fractional part so `1200` does not
    /// come out as `1200.0`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Empty => serde_json::Value::Null,
            CellValue::Text(s) => serde_json::Value::String(s.clone()),
            CellValue::Number(n) => number_to_json(*n),
        }
    }

    pub fn raw_display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }
}

/// Render an f64 as a JSON number, integral values as integers.
pub fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}
