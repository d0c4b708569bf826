use std::time::Duration;

/// Why a cluster call failed
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClusterError {
    /// The client could not be initialized at startup
    #[error("kubernetes client is not initialized")]
    Unavailable,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    Transport(String),
}

impl ClusterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<kube::Error> for ClusterError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) => match resp.code {
                404 => Self::NotFound(resp.message),
                401 | 403 => Self::Unauthorized(resp.message),
                _ => Self::Transport(format!("{} ({})", resp.message, resp.code)),
            },
            other => Self::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "pods \"web-0\" is forbidden".to_string(),
            reason: "Forbidden".to_string(),
            code,
        })
    }

    #[test]
    fn test_api_error_mapping() {
        assert!(ClusterError::from(api_error(404)).is_not_found());
        assert!(matches!(
            ClusterError::from(api_error(403)),
            ClusterError::Unauthorized(_)
        ));
        assert!(matches!(
            ClusterError::from(api_error(401)),
            ClusterError::Unauthorized(_)
        ));
        assert!(matches!(
            ClusterError::from(api_error(500)),
            ClusterError::Transport(_)
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ClusterError::Timeout(Duration::from_secs(15)).to_string(),
            "request timed out after 15s"
        );
        assert_eq!(
            ClusterError::Transport("connection refused".to_string()).to_string(),
            "connection refused"
        );
    }
}
