//! 配置校验模块
//!
//! 校验规则：
//! - env_var / default_base_dir / run_subdir 非空
//! - run_subdir 为单一相对路径组件
//! - extension 非空、无前导点、无路径分隔符

use std::path::{Component, Path};

use contracts::{ContractError, LoggerConfig, OutputConfig};

/// 校验 LoggerConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &LoggerConfig) -> Result<(), ContractError> {
    validate_output(&config.output)?;
    Ok(())
}

fn validate_output(output: &OutputConfig) -> Result<(), ContractError> {
    require_non_empty("output.env_var", &output.env_var)?;
    require_non_empty("output.default_base_dir", &output.default_base_dir)?;
    require_non_empty("output.run_subdir", &output.run_subdir)?;
    validate_run_subdir(&output.run_subdir)?;
    validate_extension(&output.extension)?;
    Ok(())
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ContractError> {
    if value.trim().is_empty() {
        return Err(ContractError::config_validation(field, "must not be empty"));
    }
    Ok(())
}

/// run_subdir 必须是单个普通路径组件
fn validate_run_subdir(subdir: &str) -> Result<(), ContractError> {
    let mut components = Path::new(subdir).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ContractError::config_validation(
            "output.run_subdir",
            format!("'{subdir}' must be a single relative directory name"),
        )),
    }
}

fn validate_extension(ext: &str) -> Result<(), ContractError> {
    if ext.is_empty() {
        return Err(ContractError::config_validation(
            "output.extension",
            "must not be empty",
        ));
    }
    if ext.starts_with('.') {
        return Err(ContractError::config_validation(
            "output.extension",
            format!("'{ext}' must not start with '.'"),
        ));
    }
    if ext.contains(['/', '\\']) {
        return Err(ContractError::config_validation(
            "output.extension",
            format!("'{ext}' must not contain path separators"),
        ));
    }
    Ok(())
}
