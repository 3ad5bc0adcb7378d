//! Status-checked call dispatch.
//!
//! This module wraps foreign functions that return an NiFpga status. It provides:
//! 1. **Seams:** `Library` resolves symbols, `ForeignFunction` performs one positional call.
//! 2. **Schema:** `LibraryFunctionInfo` declares a function's pretty name, symbol, and
//!    named parameter types.
//! 3. **Dispatch:** `StatusCheckedLibrary` resolves every symbol once and validates,
//!    invokes, and status-checks each call.
//! 4. **Status checking:** `check_status` turns a raw status into success, a warning
//!    notice, or a `StatusError`.

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::args::{Arg, ArgumentSnapshot, NamedArgtype};
use crate::error::{Condition, DispatchError, StatusError};
use crate::notice::{Notice, NoticeSink, default_sink};

/// A resolved foreign function.
///
/// Implementations perform the call positionally and return the raw status. No
/// validation happens here; `CheckedFunction` does that before invoking.
pub trait ForeignFunction: Send + Sync {
    /// Calls the function with `args` and returns its status.
    fn invoke(&self, args: &[Arg]) -> Result<i32, DispatchError>;
}

impl<F> ForeignFunction for F
where
    F: Fn(&[Arg]) -> i32 + Send + Sync,
{
    fn invoke(&self, args: &[Arg]) -> Result<i32, DispatchError> {
        Ok(self(args))
    }
}

/// An opaque library handle that can resolve symbols by name.
pub trait Library {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Resolves `symbol` to a callable.
    fn resolve(&self, symbol: &str) -> Result<Arc<dyn ForeignFunction>, DispatchError>;
}

/// An in-process `Library` backed by a table of callables.
#[derive(Default)]
pub struct SymbolTable {
    name: String,
    symbols: HashMap<String, Arc<dyn ForeignFunction>>,
}

impl SymbolTable {
    /// Creates an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbols: HashMap::new(),
        }
    }

    /// Adds (or replaces) `symbol`.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>, function: impl ForeignFunction + 'static) -> Self {
        let _ = self.symbols.insert(symbol.into(), Arc::new(function));
        self
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut symbols: Vec<&str> = self.symbols.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        f.debug_struct("SymbolTable")
            .field("name", &self.name)
            .field("symbols", &symbols)
            .finish()
    }
}

impl Library for SymbolTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, symbol: &str) -> Result<Arc<dyn ForeignFunction>, DispatchError> {
        self.symbols
            .get(symbol)
            .cloned()
            .ok_or_else(|| DispatchError::SymbolNotFound {
                library: self.name.clone(),
                symbol: symbol.to_owned(),
            })
    }
}

/// Declaration of one checked function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryFunctionInfo {
    /// Name callers use to reach the function.
    pub pretty_name: String,
    /// Symbol exported by the library.
    pub name_in_library: String,
    /// Parameters in call order.
    pub named_argtypes: Vec<NamedArgtype>,
}

impl LibraryFunctionInfo {
    /// Declares a function.
    pub fn new(
        pretty_name: impl Into<String>,
        name_in_library: impl Into<String>,
        named_argtypes: impl IntoIterator<Item = NamedArgtype>,
    ) -> Self {
        Self {
            pretty_name: pretty_name.into(),
            name_in_library: name_in_library.into(),
            named_argtypes: named_argtypes.into_iter().collect(),
        }
    }
}

/// Applies the status contract to a raw status.
///
/// * `0` returns `Ok(())`.
/// * A positive code emits a `StatusWarning` notice to `notices` and returns `Ok(())`.
/// * A negative code returns the matching (or unknown) `StatusError`.
///
/// # Arguments
///
/// * `function_name` - Name reported in the condition's message.
/// * `args` - Arguments of the call that returned `status`.
/// * `status` - Raw status code.
/// * `notices` - Destination for warnings.
pub fn check_status(
    function_name: &str,
    args: ArgumentSnapshot,
    status: i32,
    notices: &dyn NoticeSink,
) -> Result<(), StatusError> {
    match Condition::build(status, function_name, args) {
        None => Ok(()),
        Some(Condition::Warning(warning)) => {
            notices.emit(Notice::Status(warning));
            Ok(())
        }
        Some(Condition::Error(error)) => Err(error),
    }
}

/// A declared function bound to its resolved symbol.
pub struct CheckedFunction {
    info: LibraryFunctionInfo,
    function: Arc<dyn ForeignFunction>,
    notices: Arc<dyn NoticeSink>,
}

impl CheckedFunction {
    /// Name callers use to reach the function.
    pub fn pretty_name(&self) -> &str {
        &self.info.pretty_name
    }

    /// Symbol exported by the library; used in every diagnostic.
    pub fn symbol(&self) -> &str {
        &self.info.name_in_library
    }

    /// Declared parameters in call order.
    pub fn argtypes(&self) -> &[NamedArgtype] {
        &self.info.named_argtypes
    }

    /// Validates, invokes, and status-checks one call.
    ///
    /// Arity and argument types are checked before the foreign function runs. A
    /// warning status is reported to the notice sink and the call still succeeds;
    /// an error status is returned as `DispatchError::Status`.
    ///
    /// # Arguments
    ///
    /// * `args` - Values in declaration order.
    pub fn call(&self, args: &[Arg]) -> Result<(), DispatchError> {
        let declared = &self.info.named_argtypes;
        if args.len() != declared.len() {
            return Err(DispatchError::ArgumentCount {
                symbol: self.info.name_in_library.clone(),
                expected: declared.len(),
                given: args.len(),
            });
        }
        for (position, (param, arg)) in declared.iter().zip(args).enumerate() {
            if param.native_type != arg.native_type() {
                return Err(DispatchError::ArgumentType {
                    symbol: self.info.name_in_library.clone(),
                    name: param.name.clone(),
                    position,
                    expected: param.native_type,
                    actual: arg.native_type(),
                });
            }
        }

        let status = self.function.invoke(args)?;
        debug!(symbol = %self.info.name_in_library, status, "checked call returned");
        if status == 0 {
            return Ok(());
        }

        let snapshot =
            ArgumentSnapshot::capture(declared.iter().map(|param| param.name.as_str()), args);
        check_status(&self.info.name_in_library, snapshot, status, &*self.notices)?;
        Ok(())
    }
}

impl fmt::Debug for CheckedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckedFunction")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// A set of status-checked functions resolved from one library.
///
/// Functions are reachable by pretty name through `function`, `call`, or indexing.
pub struct StatusCheckedLibrary {
    library_name: String,
    functions: HashMap<String, CheckedFunction>,
}

impl StatusCheckedLibrary {
    /// Resolves every declared function from `library`.
    ///
    /// Each symbol is resolved exactly once, here. Warnings go to the default
    /// tracing sink until `with_notices` replaces it.
    ///
    /// # Arguments
    ///
    /// * `library` - Handle that resolves symbols.
    /// * `infos` - Function declarations; a later duplicate pretty name replaces an earlier one.
    ///
    /// # Returns
    ///
    /// The dispatcher, or `DispatchError::SymbolNotFound` for the first missing symbol.
    pub fn new(
        library: &dyn Library,
        infos: impl IntoIterator<Item = LibraryFunctionInfo>,
    ) -> Result<Self, DispatchError> {
        let notices = default_sink();
        let mut functions = HashMap::new();
        for info in infos {
            let function = library.resolve(&info.name_in_library)?;
            debug!(
                library = library.name(),
                symbol = %info.name_in_library,
                pretty_name = %info.pretty_name,
                "resolved checked function"
            );
            let _ = functions.insert(
                info.pretty_name.clone(),
                CheckedFunction {
                    info,
                    function,
                    notices: Arc::clone(&notices),
                },
            );
        }
        Ok(Self {
            library_name: library.name().to_owned(),
            functions,
        })
    }

    /// Routes warnings from every function to `notices`.
    #[must_use]
    pub fn with_notices(mut self, notices: Arc<dyn NoticeSink>) -> Self {
        for function in self.functions.values_mut() {
            function.notices = Arc::clone(&notices);
        }
        self
    }

    /// Name of the library the functions came from.
    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    /// The function registered as `pretty_name`.
    pub fn function(&self, pretty_name: &str) -> Option<&CheckedFunction> {
        self.functions.get(pretty_name)
    }

    /// Calls the function registered as `pretty_name`.
    pub fn call(&self, pretty_name: &str, args: &[Arg]) -> Result<(), DispatchError> {
        self.function(pretty_name)
            .ok_or_else(|| DispatchError::UnknownFunction(pretty_name.to_owned()))?
            .call(args)
    }

    /// Registered pretty names, sorted.
    pub fn pretty_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns `true` if no functions are registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Index<&str> for StatusCheckedLibrary {
    type Output = CheckedFunction;

    /// Panics if `pretty_name` is not registered.
    fn index(&self, pretty_name: &str) -> &Self::Output {
        match self.function(pretty_name) {
            Some(function) => function,
            None => panic!("no function named '{pretty_name}' is registered"),
        }
    }
}

impl fmt::Debug for StatusCheckedLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusCheckedLibrary")
            .field("library_name", &self.library_name)
            .field("functions", &self.pretty_names())
            .finish()
    }
}
