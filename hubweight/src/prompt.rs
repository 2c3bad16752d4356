use std::io::{self, BufRead, Write};

/// Line-based interactive questions.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Prompter::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Prints `question` and returns the answer without its line ending.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no answer to {question:?}"),
            ));
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Returns `preset` when configured, otherwise asks.
    pub fn ask_unless(&mut self, preset: Option<&str>, question: &str) -> io::Result<String> {
        match preset {
            Some(value) => Ok(value.to_string()),
            None => self.ask(question),
        }
    }
}
