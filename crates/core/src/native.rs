//! Native symbol resolution and calls.
//!
//! This module provides a `Library` backed by the platform's dynamic symbol table.
//! It handles:
//! 1. **Resolution:** `dlsym` against the process-wide namespace or a handle opened elsewhere.
//! 2. **Marshaling:** Widening every argument to one machine word (sign-extending signed
//!    integers, pinning byte strings as NUL-terminated buffers for the call).
//! 3. **Invocation:** A trampoline that casts the symbol address to an
//!    `extern "C" fn(usize, ...) -> i32` of the right arity.
//!
//! Only integer-class parameters are supported, which covers the status-returning
//! NiFpga entry points: on the supported 64-bit Unix ABIs each one occupies a
//! general-purpose register or stack slot.

use std::ffi::{CString, c_void};
use std::fmt;
use std::sync::Arc;

use crate::args::Arg;
use crate::dispatch::{ForeignFunction, Library};
use crate::error::DispatchError;

/// Largest arity the trampoline can call.
pub const MAX_NATIVE_ARGS: usize = 10;

/// A `Library` that resolves symbols with `dlsym`.
pub struct NativeLibrary {
    name: String,
    handle: *mut c_void,
}

// SAFETY: the handle is only passed to `dlsym`, which is thread-safe, and is never
// dereferenced or closed by this type.
unsafe impl Send for NativeLibrary {}
unsafe impl Sync for NativeLibrary {}

impl NativeLibrary {
    /// Resolves against every object already loaded into the process (`RTLD_DEFAULT`).
    pub fn process() -> Self {
        Self {
            name: String::from("<process>"),
            handle: libc::RTLD_DEFAULT,
        }
    }

    /// Wraps a handle returned by `dlopen`.
    ///
    /// # Safety
    ///
    /// `handle` must be a valid `dlopen` handle (or a pseudo-handle such as
    /// `RTLD_DEFAULT`) and must stay open for as long as this library or any
    /// function it resolved is alive.
    pub unsafe fn from_handle(handle: *mut c_void, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle,
        }
    }
}

impl fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .finish()
    }
}

impl Library for NativeLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, symbol: &str) -> Result<Arc<dyn ForeignFunction>, DispatchError> {
        let not_found = || DispatchError::SymbolNotFound {
            library: self.name.clone(),
            symbol: symbol.to_owned(),
        };
        let c_symbol = CString::new(symbol).map_err(|_| not_found())?;
        // SAFETY: `c_symbol` is NUL-terminated and outlives the call; the handle
        // is valid per the constructor contracts.
        let address = unsafe { libc::dlsym(self.handle, c_symbol.as_ptr()) };
        if address.is_null() {
            return Err(not_found());
        }
        Ok(Arc::new(NativeFunction {
            symbol: symbol.to_owned(),
            address: address as usize,
        }))
    }
}

/// A symbol resolved by `NativeLibrary`.
#[derive(Debug)]
pub struct NativeFunction {
    symbol: String,
    address: usize,
}

impl NativeFunction {
    /// Symbol name this function was resolved from.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

/// Widens `arg` to one machine word. Byte strings are copied into `pinned` with a
/// trailing NUL and passed by address.
fn to_word(arg: &Arg, pinned: &mut Vec<Vec<u8>>) -> usize {
    match arg {
        Arg::Bool(v) => usize::from(*v),
        Arg::I8(v) => *v as isize as usize,
        Arg::U8(v) => *v as usize,
        Arg::I16(v) => *v as isize as usize,
        Arg::U16(v) => *v as usize,
        Arg::I32(v) => *v as isize as usize,
        Arg::U32(v) => *v as usize,
        Arg::I64(v) => *v as usize,
        Arg::U64(v) => *v as usize,
        Arg::SizeT(v) | Arg::Pointer(v) => *v,
        Arg::CharPtr(bytes) => {
            let mut buffer = Vec::with_capacity(bytes.len() + 1);
            buffer.extend_from_slice(bytes);
            buffer.push(0);
            let address = buffer.as_ptr() as usize;
            pinned.push(buffer);
            address
        }
    }
}

macro_rules! trampoline {
    (@word $index:tt) => { usize };
    ($address:expr, $words:expr; $($arity:literal => ($($index:tt),*)),+ $(,)?) => {
        match $words.len() {
            $(
                $arity => {
                    // SAFETY: the caller guarantees `$address` is a C function taking
                    // `$arity` integer-class parameters and returning `int32_t`.
                    let function = unsafe {
                        std::mem::transmute::<usize, unsafe extern "C" fn($(trampoline!(@word $index)),*) -> i32>($address)
                    };
                    // SAFETY: see above; every word is a plain integer or a pointer that
                    // stays valid for the duration of the call.
                    Some(unsafe { function($($words[$index]),*) })
                }
            )+
            _ => None,
        }
    };
}

impl ForeignFunction for NativeFunction {
    fn invoke(&self, args: &[Arg]) -> Result<i32, DispatchError> {
        if args.len() > MAX_NATIVE_ARGS {
            return Err(DispatchError::TooManyArguments {
                symbol: self.symbol.clone(),
                given: args.len(),
                max: MAX_NATIVE_ARGS,
            });
        }
        let mut pinned = Vec::new();
        let words: Vec<usize> = args.iter().map(|arg| to_word(arg, &mut pinned)).collect();

        let status = trampoline!(self.address, words;
            0 => (),
            1 => (0),
            2 => (0, 1),
            3 => (0, 1, 2),
            4 => (0, 1, 2, 3),
            5 => (0, 1, 2, 3, 4),
            6 => (0, 1, 2, 3, 4, 5),
            7 => (0, 1, 2, 3, 4, 5, 6),
            8 => (0, 1, 2, 3, 4, 5, 6, 7),
            9 => (0, 1, 2, 3, 4, 5, 6, 7, 8),
            10 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9),
        );
        drop(pinned);

        status.ok_or_else(|| DispatchError::TooManyArguments {
            symbol: self.symbol.clone(),
            given: args.len(),
            max: MAX_NATIVE_ARGS,
        })
    }
}
