// src/core/prompt.rs
use std::io::{self, BufRead, Write};

/// Wait for Enter.
pub fn pause<R: BufRead, W: Write>(input: &mut R, output: &mut W, program_end: bool) -> io::Result<()> {
    let msg = if program_end {
        "Press Enter key to exit . . ."
    } else {
        "Press Enter key to continue . . ."
    };
    write!(output, "{msg}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

/// Ask until `accept` likes the answer (line terminator stripped).
/// End of input is an `UnexpectedEof` error rather than an endless loop.
pub fn prompt_until<R, W, F>(input: &mut R, output: &mut W, prompt: &str, accept: F) -> io::Result<String>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> bool,
{
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        let answer = line.trim_end_matches(['\r', '\n']);
        if accept(answer) {
            return Ok(answer.to_string());
        }
        writeln!(output, "\nInvalid input, please try again")?;
    }
}

/// Default acceptor: anything but an empty line.
pub fn non_empty(s: &str) -> bool {
    !s.is_empty()
}
