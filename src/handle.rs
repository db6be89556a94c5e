//! Owning wrapper that gives a generator an explicit end of life.
//!
//! Once [`Handle::deinit`] runs every operation fails with
//! [`FibonacciError::Deinitialized`]. [`Handle::scope`] returns a guard that
//! deinitializes the handle when it goes out of scope, on every exit path.

use std::ops::{Deref, DerefMut};

use log::debug;

use crate::error::{FibonacciError, Result};
use crate::generator::{Fibonacci, Term};

#[derive(Debug)]
pub struct Handle {
    inner: Option<Fibonacci>,
}

impl Handle {
    pub fn new(generator: Fibonacci) -> Self {
        Self {
            inner: Some(generator),
        }
    }

    pub fn is_deinited(&self) -> bool {
        self.inner.is_none()
    }

    /// Releases the generator. Calling it again does nothing.
    pub fn deinit(&mut self) {
        if self.inner.take().is_some() {
            debug!("Generator deinitialized");
        }
    }

    pub fn scope(&mut self) -> Scope<'_> {
        Scope { handle: self }
    }

    pub fn get(&self) -> Result<&Fibonacci> {
        self.inner.as_ref().ok_or(FibonacciError::Deinitialized)
    }

    fn get_mut(&mut self) -> Result<&mut Fibonacci> {
        self.inner.as_mut().ok_or(FibonacciError::Deinitialized)
    }

    pub fn a(&self) -> Result<u16> {
        Ok(self.get()?.a())
    }

    pub fn b(&self) -> Result<u16> {
        Ok(self.get()?.b())
    }

    pub fn set_a(&mut self, a: u16) -> Result<u16> {
        self.get_mut()?.set_a(a)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.get_mut()?.clear();
        Ok(())
    }

    pub fn generate(&self, n: u16) -> Result<Term> {
        self.get()?.generate(n)
    }

    pub fn sequence(&self, n: u16) -> Result<Vec<Term>> {
        self.get()?.sequence(n)
    }
}

impl From<Fibonacci> for Handle {
    fn from(generator: Fibonacci) -> Self {
        Self::new(generator)
    }
}

/// Borrow of a [`Handle`] that deinitializes it on drop.
pub struct Scope<'a> {
    handle: &'a mut Handle,
}

impl Deref for Scope<'_> {
    type Target = Handle;

    fn deref(&self) -> &Handle {
        self.handle
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Handle {
        self.handle
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.handle.deinit();
    }
}
