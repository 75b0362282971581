use std::io::{self, Write};

/// Line-oriented interactive input, injected into the delete flow so its
/// selection and confirmation logic runs against scripted input in tests.
pub trait Console {
    /// Print `message` without a trailing newline and read one line back,
    /// trimmed.
    fn prompt(&mut self, message: &str) -> io::Result<String>;
}

/// Console backed by the process stdin/stdout.
pub struct StdConsole;

impl Console for StdConsole {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        print!("{message}");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}
