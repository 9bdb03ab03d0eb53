pub type HolofoilResult<T> = Result<T, HolofoilError>;

#[derive(thiserror::Error, Debug)]
pub enum HolofoilError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("scene error: {0}")]
    Scene(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HolofoilError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_category_keeps_its_prefix() {
        let cases = [
            (HolofoilError::validation("bad layout"), "validation error:"),
            (HolofoilError::scene("no cards"), "scene error:"),
            (HolofoilError::asset("png truncated"), "asset error:"),
            (HolofoilError::render("bbox empty"), "render error:"),
        ];
        for (err, prefix) in cases {
            let text = err.to_string();
            assert!(text.starts_with(prefix), "{text} missing {prefix}");
        }
    }

    #[test]
    fn wrapped_anyhow_message_survives() {
        let err: HolofoilError = anyhow::anyhow!("disk on fire").into();
        assert_eq!(err.to_string(), "disk on fire");
    }
}
