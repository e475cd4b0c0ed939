extern crate self as folio_di;

pub use folio_di_derive::Build;
pub use typemap::TypeMap;

mod macros;
mod typemap;

pub trait Provider: Sized {
    /// Instances that have already been built by this provider.
    fn cache(&mut self) -> &mut TypeMap;
}

#[diagnostic::on_unimplemented(
    message = "The type `{Self}` cannot be built using the provider `{P}`",
    note = "Add `{Self}` to the provider `{P}` or implement `Build` for `{Self}` and make sure \
            all dependencies are satisfied"
)]
pub trait Build<P: Provider>: Clone + 'static {
    fn build(provider: &mut P) -> Self;
}

pub trait Provide: Provider {
    fn provide<T: Build<Self>>(&mut self) -> T {
        T::build(self)
    }
}

impl<P: Provider> Provide for P {}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    #[derive(Debug, Clone)]
    struct Counter(Arc<AtomicUsize>);

    #[derive(Debug, Clone, Build)]
    struct Leaf {
        counter: Counter,
        #[state]
        state: Arc<AtomicUsize>,
    }

    #[derive(Debug, Clone, Build)]
    struct Root<L> {
        a: L,
        b: L,
    }

    crate::provider! {
        TestProvider { counter: Counter, }
    }

    #[test]
    fn builds_dependencies_once() {
        let counter = Counter(Arc::new(AtomicUsize::new(7)));
        let mut provider = TestProvider {
            _cache: Default::default(),
            counter: counter.clone(),
        };

        let root: Root<Leaf> = provider.provide();
        root.a.state.fetch_add(1, Ordering::Relaxed);

        assert_eq!(root.b.state.load(Ordering::Relaxed), 1);
        assert_eq!(root.a.counter.0.load(Ordering::Relaxed), 7);
        assert!(Arc::ptr_eq(&root.b.counter.0, &counter.0));
    }
}
