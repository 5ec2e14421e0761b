/// Macro to return early with an error
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::Generic(format!($($arg)*)))
    };
}

/// Build a member-scoped diagnostic from a kind, the member name and message arguments.
#[macro_export]
macro_rules! member_diagnostic {
    ($kind:expr, $member:expr $(, $arg:expr)* $(,)?) => {
        $crate::diagnostics::Diagnostic::new($kind, $member)
            $(.with_arg($arg))*
    };
}
