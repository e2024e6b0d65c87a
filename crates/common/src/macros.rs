/// Prints to stdout through the global shell, without a trailing newline.
#[macro_export]
macro_rules! sh_print {
    ($($t:tt)*) => {
        $crate::shell::Shell::get().print_out(::std::format_args!($($t)*))
    };
}

/// Prints a line to stdout through the global shell.
#[macro_export]
macro_rules! sh_println {
    () => {
        $crate::sh_print!("\n")
    };
    ($($t:tt)*) => {
        $crate::shell::Shell::get()
            .print_out(::std::format_args!("{}\n", ::std::format_args!($($t)*)))
    };
}

/// Prints a progress note to stderr when the shell is verbose.
#[macro_export]
macro_rules! sh_note {
    ($($t:tt)*) => {
        $crate::shell::Shell::get().note(::std::format_args!($($t)*))
    };
}

/// Prints a warning to stderr through the global shell.
#[macro_export]
macro_rules! sh_warn {
    ($($t:tt)*) => {
        $crate::shell::Shell::get().warn(::std::format_args!($($t)*))
    };
}

/// Prints an error to stderr through the global shell.
#[macro_export]
macro_rules! sh_err {
    ($($t:tt)*) => {
        $crate::shell::Shell::get().error(::std::format_args!($($t)*))
    };
}
