//! Setting value validation.

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "WATERMARK_JPEG_QUALITY" => validate_int_range(value, 1, 100)?,
        "WATERMARK_FONT_PATH" => {
            let lower = value.to_lowercase();
            if ![".ttf", ".otf", ".ttc"].iter().any(|ext| lower.ends_with(ext)) {
                return Err("must point to a .ttf, .otf or .ttc file".into());
            }
        }
        "WATERMARK_TEMP_DIR" => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i32, max: i32) -> Result<(), String> {
    let v: i32 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
