mod acl;
mod bearer;

pub use acl::AclMiddlewareFactory;
pub use bearer::BearerAuthMiddlewareFactory;
