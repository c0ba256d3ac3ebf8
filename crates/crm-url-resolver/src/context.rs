//! Access to the URL of the request being served.

use std::sync::{Arc, PoisonError, RwLock};

/// The active request, as seen by the host application.
pub trait RequestContext: Send + Sync {
    /// Returns the request path (with query string), if a request is active.
    fn current_request_path(&self) -> Option<String>;
}

impl<T: RequestContext + ?Sized> RequestContext for Arc<T> {
    fn current_request_path(&self) -> Option<String> {
        (**self).current_request_path()
    }
}

/// Returns the URL under evaluation, or `None` if there is no usable one.
///
/// Always reads the context afresh; an empty path counts as absent.
pub fn current_url(context: Option<&dyn RequestContext>) -> Option<String> {
    context?
        .current_request_path()
        .filter(|path| !path.is_empty())
}

/// A request context whose path is set by the host.
///
/// # Example
///
/// ```
/// use crm_url_resolver::{RequestContext, StaticRequestContext};
///
/// let context = StaticRequestContext::new();
/// assert_eq!(context.current_request_path(), None);
///
/// context.set("/crm/lead/list/");
/// assert_eq!(context.current_request_path().as_deref(), Some("/crm/lead/list/"));
/// ```
#[derive(Debug, Default)]
pub struct StaticRequestContext {
    path: RwLock<Option<String>>,
}

impl StaticRequestContext {
    /// Creates a context with no active request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with the given request path.
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: RwLock::new(Some(path.into())),
        }
    }

    /// Sets the active request path.
    pub fn set(&self, path: impl Into<String>) {
        *self.path.write().unwrap_or_else(PoisonError::into_inner) = Some(path.into());
    }

    /// Ends the active request.
    pub fn clear(&self) {
        *self.path.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl RequestContext for StaticRequestContext {
    fn current_request_path(&self) -> Option<String> {
        self.path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_context() {
        assert_eq!(current_url(None), None);
    }

    #[test]
    fn test_empty_path_is_absent() {
        let context = StaticRequestContext::with_path("");
        assert_eq!(current_url(Some(&context)), None);
    }

    #[test]
    fn test_reads_are_fresh() {
        let context = StaticRequestContext::with_path("/crm/deal/list/");
        assert_eq!(
            current_url(Some(&context)).as_deref(),
            Some("/crm/deal/list/")
        );

        context.set("/crm/lead/list/");
        assert_eq!(
            current_url(Some(&context)).as_deref(),
            Some("/crm/lead/list/")
        );

        context.clear();
        assert_eq!(current_url(Some(&context)), None);
    }
}
