use std::net::IpAddr;

use poem::Request;

use crate::types::internal::auth::AuthenticatedUser;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Contains contextual information about the current request that is needed
/// for logging and tracing across API, coordinator and store layers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Identity resolved by the access gate, if any
    pub user: Option<AuthenticatedUser>,

    /// Source of the request (API or CLI)
    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Create an anonymous context for an inbound HTTP request
    pub fn for_request(req: &Request) -> Self {
        Self {
            ip_address: Self::extract_ip_address(req),
            request_id: RequestId::new(),
            user: None,
            source: RequestSource::API,
            actor_id: "anonymous".to_owned(),
        }
    }

    /// Create a RequestContext for CLI operations
    ///
    /// # Arguments
    /// * `command_name` - Name of the CLI command being executed
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            user: None,
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
        }
    }

    /// Attach the identity resolved by the access gate
    pub fn with_user(mut self, user: AuthenticatedUser) -> Self {
        self.actor_id = user.id.clone();
        self.user = Some(user);
        self
    }

    /// Id of the authenticated user, if any
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.id.as_str())
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        // Fall back to remote address
        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::db::Role;

    #[test]
    fn test_forwarded_for_takes_first_address() {
        let req = Request::builder()
            .header("X-Forwarded-For", "10.0.0.7, 192.168.1.1")
            .finish();
        let ctx = RequestContext::for_request(&req);

        assert_eq!(ctx.ip_address, Some("10.0.0.7".parse().unwrap()));
        assert_eq!(ctx.source, RequestSource::API);
        assert!(ctx.user.is_none());
    }

    #[test]
    fn test_with_user_sets_actor() {
        let ctx = RequestContext::for_cli("create-admin").with_user(AuthenticatedUser {
            id: "u-1".to_string(),
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            role: Role::Admin,
        });

        assert_eq!(ctx.actor_id, "u-1");
        assert_eq!(ctx.user_id(), Some("u-1"));
    }
}
