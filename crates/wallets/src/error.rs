use alloy_transport::TransportError;

/// EIP-1193 error code for a request the user rejected.
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// EIP-1193 error code for an account the user has not authorized.
pub const UNAUTHORIZED: i64 = 4100;

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("no wallet provider found, install a wallet or configure an RPC URL")]
    ProviderAbsent,
    #[error("{operation} rejected by the wallet: {reason}")]
    Rejected { operation: &'static str, reason: String },
    #[error("{operation} failed")]
    Rpc {
        operation: &'static str,
        #[source]
        source: TransportError,
    },
}

impl WalletError {
    /// Classifies a transport error returned for `operation`.
    ///
    /// EIP-1193 rejections (`4001`, `4100`) become [`WalletError::Rejected`].
    pub fn from_rpc(operation: &'static str, source: TransportError) -> Self {
        if let Some(payload) = source.as_error_resp()
            && matches!(payload.code, USER_REJECTED_REQUEST | UNAUTHORIZED)
        {
            return Self::Rejected { operation, reason: payload.message.to_string() };
        }
        Self::Rpc { operation, source }
    }

    /// Returns `true` if the user declined the request.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
