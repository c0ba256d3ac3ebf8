//! Process-wide resolver handle.
//!
//! Prefer passing a [`UrlResolver`] explicitly. This handle exists for hosts
//! where call sites cannot be reached from the composition root.

use std::sync::OnceLock;

use crate::resolver::UrlResolver;

static GLOBAL: OnceLock<UrlResolver> = OnceLock::new();

/// Installs the process-wide resolver.
///
/// Only the first call succeeds; later calls hand their resolver back.
pub fn install(resolver: UrlResolver) -> Result<&'static UrlResolver, UrlResolver> {
    let mut pending = Some(resolver);
    let installed = GLOBAL.get_or_init(|| pending.take().expect("initializer runs at most once"));
    match pending {
        None => Ok(installed),
        Some(rejected) => Err(rejected),
    }
}

/// Returns the process-wide resolver, if one was installed.
pub fn global() -> Option<&'static UrlResolver> {
    GLOBAL.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_once() {
        let first = UrlResolver::builder().build().unwrap();
        let installed = install(first).unwrap();
        assert!(std::ptr::eq(installed, global().unwrap()));

        let second = UrlResolver::builder().build().unwrap();
        assert!(install(second).is_err());
        assert!(global().unwrap().is_lead_list(Some("/crm/lead/list/")));
    }
}
