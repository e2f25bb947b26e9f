use crate::core::parser::Literal;
use crate::utils::error::{PredictError, Result};
use ndarray::{Array1, Array2, ArrayView1};

/// A 0-D, 1-D or 2-D array.
#[derive(Debug, Clone, PartialEq)]
pub enum Tensor<T> {
    Scalar(T),
    Vector(Array1<T>),
    Matrix(Array2<T>),
}

impl<T> Tensor<T> {
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Tensor::Scalar(_) => vec![],
            Tensor::Vector(v) => vec![v.len()],
            Tensor::Matrix(m) => vec![m.nrows(), m.ncols()],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Tensor::Scalar(_) => 1,
            Tensor::Vector(v) => v.len(),
            Tensor::Matrix(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 解析後的運算元；任一元素為浮點數時整體提升為 `f64`
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Int(Tensor<i64>),
    Float(Tensor<f64>),
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

impl Operand {
    pub fn from_literal(literal: &Literal) -> Result<Self> {
        let mut leaves = Vec::new();
        collect_leaves(literal, &mut leaves)?;

        let shape = shape_of(literal)?;
        if shape.len() > 2 {
            return Err(PredictError::ShapeError {
                message: format!(
                    "{}-dimensional input {} is not supported, expected at most 2 dimensions",
                    shape.len(),
                    format_shape(&shape)
                ),
            });
        }

        // 空陣列與 numpy 一致，預設為浮點數
        let any_float = leaves.is_empty() || leaves.iter().any(|n| matches!(n, Number::Float(_)));

        if any_float {
            let values: Vec<f64> = leaves.iter().map(|n| n.as_f64()).collect();
            Ok(Operand::Float(build_tensor(&shape, values)?))
        } else {
            let values: Vec<i64> = leaves
                .iter()
                .filter_map(|n| match n {
                    Number::Int(v) => Some(*v),
                    Number::Float(_) => None,
                })
                .collect();
            Ok(Operand::Int(build_tensor(&shape, values)?))
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        match self {
            Operand::Int(t) => t.shape(),
            Operand::Float(t) => t.shape(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Operand::Int(t) => t.len(),
            Operand::Float(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dot product of the operand with itself, following numpy's `dot` rules
    /// for 0-D, 1-D and 2-D inputs.
    pub fn self_dot(&self) -> Result<Operand> {
        check_aligned(&self.shape())?;

        match self {
            Operand::Int(t) => Ok(Operand::Int(int_self_dot(t)?)),
            Operand::Float(t) => Ok(Operand::Float(float_self_dot(t))),
        }
    }
}

fn collect_leaves(literal: &Literal, out: &mut Vec<Number>) -> Result<()> {
    match literal {
        Literal::Int(v) => out.push(Number::Int(*v)),
        Literal::Float(v) => out.push(Number::Float(*v)),
        Literal::Text(text) => {
            return Err(PredictError::TypeError {
                message: format!("non-numeric element '{}'", text),
            })
        }
        Literal::Seq(items) => {
            for item in items {
                collect_leaves(item, out)?;
            }
        }
    }
    Ok(())
}

fn shape_of(literal: &Literal) -> Result<Vec<usize>> {
    match literal {
        Literal::Seq(items) => {
            let mut inner: Option<Vec<usize>> = None;
            for item in items {
                let item_shape = shape_of(item)?;
                match &inner {
                    None => inner = Some(item_shape),
                    Some(expected) if *expected != item_shape => {
                        return Err(PredictError::ShapeError {
                            message: format!(
                                "inhomogeneous shape: found elements of shape {} and {}",
                                format_shape(expected),
                                format_shape(&item_shape)
                            ),
                        })
                    }
                    Some(_) => {}
                }
            }

            let mut shape = vec![items.len()];
            shape.extend(inner.unwrap_or_default());
            Ok(shape)
        }
        _ => Ok(vec![]),
    }
}

fn build_tensor<T: Copy>(shape: &[usize], values: Vec<T>) -> Result<Tensor<T>> {
    match *shape {
        [] => values
            .first()
            .copied()
            .map(Tensor::Scalar)
            .ok_or_else(|| PredictError::ShapeError {
                message: "scalar input has no value".to_string(),
            }),
        [_] => Ok(Tensor::Vector(Array1::from(values))),
        [rows, cols] => Array2::from_shape_vec((rows, cols), values)
            .map(Tensor::Matrix)
            .map_err(|e| PredictError::ShapeError {
                message: e.to_string(),
            }),
        _ => Err(PredictError::ShapeError {
            message: format!("unsupported shape {}", format_shape(shape)),
        }),
    }
}

fn check_aligned(shape: &[usize]) -> Result<()> {
    if let [rows, cols] = *shape {
        if rows != cols {
            return Err(PredictError::ShapeError {
                message: format!(
                    "shapes {} and {} not aligned: {} (dim 1) != {} (dim 0)",
                    format_shape(shape),
                    format_shape(shape),
                    cols,
                    rows
                ),
            });
        }
    }
    Ok(())
}

fn float_self_dot(tensor: &Tensor<f64>) -> Tensor<f64> {
    match tensor {
        Tensor::Scalar(s) => Tensor::Scalar(s * s),
        Tensor::Vector(v) => Tensor::Scalar(v.dot(v)),
        Tensor::Matrix(m) => Tensor::Matrix(m.dot(m)),
    }
}

fn int_self_dot(tensor: &Tensor<i64>) -> Result<Tensor<i64>> {
    match tensor {
        Tensor::Scalar(s) => s.checked_mul(*s).map(Tensor::Scalar).ok_or_else(overflow),
        Tensor::Vector(v) => checked_dot(v.view(), v.view()).map(Tensor::Scalar),
        Tensor::Matrix(m) => {
            let mut out = Array2::<i64>::zeros((m.nrows(), m.ncols()));
            for ((i, j), cell) in out.indexed_iter_mut() {
                *cell = checked_dot(m.row(i), m.column(j))?;
            }
            Ok(Tensor::Matrix(out))
        }
    }
}

fn checked_dot(a: ArrayView1<i64>, b: ArrayView1<i64>) -> Result<i64> {
    a.iter().zip(b.iter()).try_fold(0i64, |acc, (x, y)| {
        x.checked_mul(*y)
            .and_then(|p| acc.checked_add(p))
            .ok_or_else(overflow)
    })
}

fn overflow() -> PredictError {
    PredictError::OverflowError {
        message: "integer dot product exceeds the 64-bit range".to_string(),
    }
}

pub fn format_shape(shape: &[usize]) -> String {
    match shape {
        [single] => format!("({},)", single),
        _ => format!(
            "({})",
            shape
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(",")
        ),
    }
}
