use certify_backend::types::db::Role;
use certify_backend::types::internal::auth::AuthenticatedUser;
use certify_backend::types::internal::context::{RequestContext, RequestSource};
use poem::Request;

fn admin() -> AuthenticatedUser {
    AuthenticatedUser {
        id: "user-1".to_string(),
        username: "admin".to_string(),
        email: "admin@example.com".to_string(),
        role: Role::Admin,
    }
}

#[test]
fn test_request_context_for_request_is_anonymous() {
    let req = Request::builder()
        .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
        .finish();
    let ctx = RequestContext::for_request(&req);

    assert_eq!(ctx.source, RequestSource::API);
    assert_eq!(ctx.actor_id, "anonymous");
    assert_eq!(ctx.ip_address, Some("203.0.113.7".parse().unwrap()));
    assert!(ctx.user.is_none());
    assert!(ctx.user_id().is_none());
}

#[test]
fn test_request_context_for_cli() {
    let ctx = RequestContext::for_cli("create_admin");

    assert_eq!(ctx.source, RequestSource::CLI);
    assert_eq!(ctx.actor_id, "cli:create_admin");
    assert!(ctx.ip_address.is_none());
}

#[test]
fn test_with_user_sets_actor() {
    let ctx = RequestContext::for_cli("test").with_user(admin());

    assert_eq!(ctx.actor_id, "user-1");
    assert_eq!(ctx.user_id(), Some("user-1"));
    assert!(ctx.user.as_ref().is_some_and(AuthenticatedUser::is_admin));
}

#[test]
fn test_each_context_gets_its_own_request_id() {
    let first = RequestContext::for_cli("a");
    let second = RequestContext::for_cli("b");
    assert_ne!(first.request_id, second.request_id);
}
