pub type ThumbsmithResult<T> = Result<T, ThumbsmithError>;

#[derive(thiserror::Error, Debug)]
pub enum ThumbsmithError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("font error: {0}")]
    FontUnavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ThumbsmithError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn font_unavailable(msg: impl Into<String>) -> Self {
        Self::FontUnavailable(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ThumbsmithError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            ThumbsmithError::decode("x")
                .to_string()
                .contains("decode error:")
        );
        assert!(
            ThumbsmithError::font_unavailable("x")
                .to_string()
                .contains("font error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ThumbsmithError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
