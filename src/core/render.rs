//! numpy-style text rendering of operands.
//!
//! Integer arrays are right-aligned to the widest element
//! (`[[ 7 10]\n [15 22]]`). Float arrays are aligned on the decimal point
//! and integral values keep a trailing dot (`[[ 7. 10.]]`); their cells are
//! rounded to 8 fraction digits. Scalars print bare with the shortest
//! round-trip form.

use crate::core::linalg::{Operand, Tensor};
use ndarray::{Array1, Array2};
use std::fmt;

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Int(Tensor::Scalar(v)) => write!(f, "{}", v),
            Operand::Float(Tensor::Scalar(v)) => f.write_str(&float_scalar(*v)),
            Operand::Int(Tensor::Vector(v)) => f.write_str(&render_vector(v, int_cells)),
            Operand::Float(Tensor::Vector(v)) => f.write_str(&render_vector(v, float_cells)),
            Operand::Int(Tensor::Matrix(m)) => f.write_str(&render_matrix(m, int_cells)),
            Operand::Float(Tensor::Matrix(m)) => f.write_str(&render_matrix(m, float_cells)),
        }
    }
}

fn render_vector<T: Copy>(v: &Array1<T>, cells: fn(&[T]) -> Vec<String>) -> String {
    let values: Vec<T> = v.iter().copied().collect();
    format!("[{}]", cells(&values).join(" "))
}

fn render_matrix<T: Copy>(m: &Array2<T>, cells: fn(&[T]) -> Vec<String>) -> String {
    if m.is_empty() {
        return "[]".to_string();
    }

    // 整個矩陣共用同一欄寬
    let values: Vec<T> = m.iter().copied().collect();
    let formatted = cells(&values);

    let rows: Vec<String> = formatted
        .chunks(m.ncols())
        .map(|row| format!("[{}]", row.join(" ")))
        .collect();

    format!("[{}]", rows.join("\n "))
}

fn int_cells(values: &[i64]) -> Vec<String> {
    let texts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    let width = texts.iter().map(|t| t.len()).max().unwrap_or(0);
    texts
        .into_iter()
        .map(|t| format!("{:>width$}", t, width = width))
        .collect()
}

fn float_cells(values: &[f64]) -> Vec<String> {
    let parts: Vec<(String, Option<String>)> = values.iter().map(|v| split_float(*v)).collect();

    let int_width = parts.iter().map(|(i, _)| i.len()).max().unwrap_or(0);
    let frac_width = parts
        .iter()
        .filter_map(|(_, frac)| frac.as_ref().map(|f| f.len()))
        .max()
        .unwrap_or(0);

    parts
        .into_iter()
        .map(|(int_part, frac)| match frac {
            Some(frac) => format!(
                "{:>iw$}.{:<fw$}",
                int_part,
                frac,
                iw = int_width,
                fw = frac_width
            ),
            // nan / inf 沒有小數點，靠右對齊到整體寬度
            None => format!(
                "{:>w$}",
                int_part,
                w = int_width + 1 + frac_width
            ),
        })
        .collect()
}

/// Fraction digits kept in float arrays, as in numpy's default print options.
const FLOAT_PRECISION: usize = 8;

/// Rounds `v` to [`FLOAT_PRECISION`] fraction digits, drops trailing zeros
/// and splits the text into integer and fraction digits. Non-finite values
/// have no fraction part.
fn split_float(v: f64) -> (String, Option<String>) {
    if !v.is_finite() {
        return (non_finite(v).to_string(), None);
    }

    let text = format!("{:.prec$}", v, prec = FLOAT_PRECISION);
    match text.split_once('.') {
        Some((int_part, frac)) => (
            int_part.to_string(),
            Some(frac.trim_end_matches('0').to_string()),
        ),
        None => (text, Some(String::new())),
    }
}

fn float_scalar(v: f64) -> String {
    if !v.is_finite() {
        return non_finite(v).to_string();
    }

    let text = v.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

fn non_finite(v: f64) -> &'static str {
    if v.is_nan() {
        "nan"
    } else if v > 0.0 {
        "inf"
    } else {
        "-inf"
    }
}
