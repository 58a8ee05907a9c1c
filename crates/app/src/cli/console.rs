//! Line-oriented console I/O.

use std::{
    fmt::Display,
    io::{BufRead, Write},
    str::FromStr,
};

use crate::cli::CliError;

/// Prompts on `output` and reads answers from `input`.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Wrap an input and an output handle.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the console, returning the output handle.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Write a line.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Io`] if the output cannot be written.
    pub fn say(&mut self, text: impl Display) -> Result<(), CliError> {
        writeln!(self.output, "{text}")?;

        Ok(())
    }

    /// Show `label` and read one line, without its line ending.
    ///
    /// # Errors
    ///
    /// - [`CliError::EndOfInput`]: the input is exhausted.
    /// - [`CliError::Io`]: reading or writing failed.
    pub fn prompt(&mut self, label: &str) -> Result<String, CliError> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();

        if self.input.read_line(&mut line)? == 0 {
            return Err(CliError::EndOfInput);
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Prompt until the answer parses as `T`, showing `invalid` after each
    /// malformed answer.
    ///
    /// # Errors
    ///
    /// Returns a [`CliError`] if the input ends or I/O fails.
    pub fn prompt_parsed<T: FromStr>(&mut self, label: &str, invalid: &str) -> Result<T, CliError> {
        loop {
            if let Ok(value) = self.prompt(label)?.trim().parse() {
                return Ok(value);
            }

            self.say(invalid)?;
        }
    }

    /// Like [`Console::prompt_parsed`], but a blank answer yields `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`CliError`] if the input ends or I/O fails.
    pub fn prompt_optional<T: FromStr>(
        &mut self,
        label: &str,
        invalid: &str,
    ) -> Result<Option<T>, CliError> {
        loop {
            let answer = self.prompt(label)?;
            let answer = answer.trim();

            if answer.is_empty() {
                return Ok(None);
            }

            if let Ok(value) = answer.parse() {
                return Ok(Some(value));
            }

            self.say(invalid)?;
        }
    }

    /// Prompt until `validate` accepts the answer, showing its error otherwise.
    ///
    /// # Errors
    ///
    /// Returns a [`CliError`] if the input ends or I/O fails.
    pub fn prompt_valid<E: Display>(
        &mut self,
        label: &str,
        validate: impl Fn(&str) -> Result<(), E>,
    ) -> Result<String, CliError> {
        loop {
            let answer = self.prompt(label)?.trim().to_string();

            match validate(&answer) {
                Ok(()) => return Ok(answer),
                Err(error) => self.say(error)?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn console(input: &str) -> Console<&[u8], Vec<u8>> {
        Console::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn prompt_strips_line_endings() -> TestResult {
        let mut console = console("hello\r\nworld\n");

        assert_eq!(console.prompt("> ")?, "hello");
        assert_eq!(console.prompt("> ")?, "world");

        Ok(())
    }

    #[test]
    fn prompt_reports_end_of_input() {
        let mut console = console("");

        assert!(
            matches!(console.prompt("> "), Err(CliError::EndOfInput)),
            "expected EndOfInput"
        );
    }

    #[test]
    fn prompt_parsed_asks_again_on_malformed_input() -> TestResult {
        let mut console = console("abc\n-1\n7\n");

        let value: u32 = console.prompt_parsed("Quantity: ", "Invalid number.")?;

        assert_eq!(value, 7);

        let output = String::from_utf8(console.into_output())?;

        assert_eq!(output.matches("Invalid number.").count(), 2);

        Ok(())
    }

    #[test]
    fn prompt_optional_treats_blank_as_none() -> TestResult {
        let mut console = console("\n12\n");

        assert_eq!(console.prompt_optional::<u32>("Stock: ", "Invalid.")?, None);
        assert_eq!(console.prompt_optional::<u32>("Stock: ", "Invalid.")?, Some(12));

        Ok(())
    }
}
