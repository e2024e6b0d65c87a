mod portal;
mod shell;

pub use portal::PortalOpts;
pub use shell::ShellOptions;
