use fleetcheck_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network, TLS or body decoding failure.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status. `message` is the server's
    /// own error text, suitable for showing to the user.
    #[error("{message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Rejected locally before any request was sent.
    #[error(transparent)]
    Domain(#[from] CoreError),
}

impl ClientError {
    /// HTTP status for `Api` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The text a screen should show for this error.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Domain(CoreError::Validation(msg)) => msg.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_server_text() {
        let err = ClientError::Api {
            status: 403,
            code: "FORBIDDEN".into(),
            message: "Manager role required".into(),
        };
        assert_eq!(err.to_string(), "Manager role required");
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn validation_message_is_unwrapped() {
        let err = ClientError::from(CoreError::Validation("Signatures Required".into()));
        assert_eq!(err.user_message(), "Signatures Required");
        assert_eq!(err.status(), None);
    }
}
