use stocktrace_auth::{OperationAuthorization, Permission};

/// Small helper wrapper to associate required permissions with a request.
pub struct OpAuth<R> {
    pub inner: R,
    pub required: Vec<Permission>,
}

impl<R> OperationAuthorization for OpAuth<R> {
    fn required_permissions(&self) -> &[Permission] {
        &self.required
    }
}
