// SPDX-License-Identifier: Apache-2.0

//! Interceptor Chain Registration
//!
//! Keeps exactly one instance of an interceptor at the head of a host's
//! interceptor chain. Hosts expose their chain through [`ChainHost`]; the
//! guard never reaches into host internals.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::PrintResult;

/// Member of a host interceptor chain
pub trait Interceptor: Send + Sync {
    fn name(&self) -> &str;
}

/// Capability a host provides to read and replace its interceptor chain
pub trait ChainHost: Send + Sync {
    fn list_chain_members(&self) -> PrintResult<Vec<Arc<dyn Interceptor>>>;

    fn replace_chain_members(&self, members: Vec<Arc<dyn Interceptor>>) -> PrintResult<()>;
}

/// Places `interceptor` first in the host chain, dropping any other
/// occurrence of the same instance. Other members keep their relative order.
///
/// Identity is pointer identity: a different instance of the same type is a
/// different member.
pub fn install(interceptor: &Arc<dyn Interceptor>, host: &dyn ChainHost) -> PrintResult<()> {
    let members = host.list_chain_members()?;

    let mut reordered = Vec::with_capacity(members.len() + 1);
    reordered.push(Arc::clone(interceptor));
    reordered.extend(
        members
            .into_iter()
            .filter(|member| !same_instance(member, interceptor)),
    );

    debug!(
        interceptor = interceptor.name(),
        members = reordered.len(),
        "Installed interceptor at head of chain"
    );
    host.replace_chain_members(reordered)
}

/// Installs into every host, stopping at the first failure
pub fn install_all<'a, I>(interceptor: &Arc<dyn Interceptor>, hosts: I) -> PrintResult<()>
where
    I: IntoIterator<Item = &'a dyn ChainHost>,
{
    for host in hosts {
        install(interceptor, host)?;
    }
    Ok(())
}

fn same_instance(a: &Arc<dyn Interceptor>, b: &Arc<dyn Interceptor>) -> bool {
    // Compare data pointers only; vtable pointers may differ per codegen unit.
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// In-memory interceptor chain for hosts without their own list
#[derive(Default)]
pub struct InterceptorChain {
    members: RwLock<Vec<Arc<dyn Interceptor>>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, interceptor: Arc<dyn Interceptor>) {
        self.members.write().push(interceptor);
    }

    pub fn members(&self) -> Vec<Arc<dyn Interceptor>> {
        self.members.read().clone()
    }

    /// Member names, in chain order
    pub fn names(&self) -> Vec<String> {
        self.members
            .read()
            .iter()
            .map(|m| m.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }
}

impl ChainHost for InterceptorChain {
    fn list_chain_members(&self) -> PrintResult<Vec<Arc<dyn Interceptor>>> {
        Ok(self.members())
    }

    fn replace_chain_members(&self, members: Vec<Arc<dyn Interceptor>>) -> PrintResult<()> {
        *self.members.write() = members;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrintError;

    struct Named(&'static str);

    impl Interceptor for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn named(name: &'static str) -> Arc<dyn Interceptor> {
        Arc::new(Named(name))
    }

    #[test]
    fn test_install_puts_interceptor_first() {
        let chain = InterceptorChain::new();
        chain.push(named("paging"));
        chain.push(named("tenant"));

        let printer = named("printer");
        install(&printer, &chain).unwrap();

        assert_eq!(chain.names(), vec!["printer", "paging", "tenant"]);
    }

    #[test]
    fn test_install_is_idempotent_and_moves_existing_instance() {
        let printer = named("printer");
        let chain = InterceptorChain::new();
        chain.push(named("paging"));
        chain.push(Arc::clone(&printer));
        chain.push(named("tenant"));
        chain.push(Arc::clone(&printer));

        install(&printer, &chain).unwrap();
        install(&printer, &chain).unwrap();

        assert_eq!(chain.names(), vec!["printer", "paging", "tenant"]);
    }

    #[test]
    fn test_identity_not_equality() {
        let chain = InterceptorChain::new();
        chain.push(named("printer"));

        let other_instance = named("printer");
        install(&other_instance, &chain).unwrap();

        // Same name, different instance: both stay
        assert_eq!(chain.len(), 2);
        assert!(same_instance(&chain.members()[0], &other_instance));
    }

    #[test]
    fn test_install_into_empty_chain() {
        let chain = InterceptorChain::new();
        assert!(chain.is_empty());

        install(&named("printer"), &chain).unwrap();
        assert_eq!(chain.names(), vec!["printer"]);
    }

    #[test]
    fn test_install_all_hosts() {
        let first = InterceptorChain::new();
        let second = InterceptorChain::new();
        second.push(named("cache"));

        let printer = named("printer");
        install_all(&printer, [&first as &dyn ChainHost, &second]).unwrap();

        assert_eq!(first.names(), vec!["printer"]);
        assert_eq!(second.names(), vec!["printer", "cache"]);
    }

    #[test]
    fn test_missing_chain_propagates() {
        struct Detached;

        impl ChainHost for Detached {
            fn list_chain_members(&self) -> PrintResult<Vec<Arc<dyn Interceptor>>> {
                Err(PrintError::chain_not_found("detached"))
            }

            fn replace_chain_members(&self, _members: Vec<Arc<dyn Interceptor>>) -> PrintResult<()> {
                unreachable!("list failed first")
            }
        }

        let err = install(&named("printer"), &Detached).unwrap_err();
        assert!(matches!(err, PrintError::ChainNotFound { .. }));
    }
}
