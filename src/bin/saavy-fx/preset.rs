//! TOML reverb presets
//!
//! A preset is a flat table, optionally nested under `[reverb]`:
//!
//! ```toml
//! [reverb]
//! amount = 0.4
//! diffusion = 0.7
//! reverb_time = 0.85
//! ```
//!
//! Missing keys keep their defaults.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{eyre, Result, WrapErr};
use saavy_fx::dsp::reverb::ReverbParams;
use toml::{Table, Value};

pub fn load(path: &Path) -> Result<ReverbParams> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read preset {}", path.display()))?;
    let params =
        parse(&text).wrap_err_with(|| format!("invalid preset {}", path.display()))?;
    tracing::info!(path = %path.display(), ?params, "loaded preset");
    Ok(params)
}

pub fn parse(text: &str) -> Result<ReverbParams> {
    let root: Table = text.parse()?;
    let table = match root.get("reverb") {
        Some(Value::Table(table)) => table,
        Some(_) => return Err(eyre!("`reverb` must be a table")),
        None => &root,
    };

    let mut params = ReverbParams::default();
    for (key, value) in table {
        let slot = match key.as_str() {
            "amount" => &mut params.amount,
            "diffusion" => &mut params.diffusion,
            "input_gain" => &mut params.input_gain,
            "reverb_time" => &mut params.reverb_time,
            "lp" => &mut params.lp,
            other => {
                tracing::warn!(key = other, "ignoring unknown preset key");
                continue;
            }
        };
        *slot = number(key, value)?;
    }

    Ok(params)
}

fn number(key: &str, value: &Value) -> Result<f32> {
    match value {
        Value::Float(v) => Ok(*v as f32),
        Value::Integer(v) => Ok(*v as f32),
        other => Err(eyre!("`{}` must be a number, got {}", key, other.type_str())),
    }
}
