use crate::utils::error::{PredictError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// conda 環境名稱只允許英數字與 `.`、`_`、`-`
pub fn validate_env_name(field_name: &str, env_name: &str) -> Result<()> {
    validate_non_empty_string(field_name, env_name)?;

    if let Some(bad) = env_name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(PredictError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: env_name.to_string(),
            reason: format!(
                "Unsupported character '{}'. Allowed: letters, digits, '.', '_', '-'",
                bad
            ),
        });
    }

    if env_name.starts_with('-') {
        return Err(PredictError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: env_name.to_string(),
            reason: "Environment name cannot start with '-'".to_string(),
        });
    }

    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PredictError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PredictError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(PredictError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PredictError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PredictError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
