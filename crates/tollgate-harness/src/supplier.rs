//! Attempt suppliers: where candidate outputs come from.
//!
//! The runner never reads input itself. It asks an [`AttemptSupplier`] for
//! the output of each attempt, so interactive pasting and file replay share
//! the same retry loop.

use std::io::{BufRead, Write};
use tollgate_core::{Task, Verdict};

use crate::HarnessError;

/// A line containing only this ends one pasted output.
pub const END_OF_OUTPUT: &str = ".";

/// What a supplier has for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Supplied {
    /// Candidate output to validate
    Output(String),

    /// Nothing recorded for this attempt number; try the next one
    Missing,

    /// End the whole run (input closed or interrupted)
    Stop,
}

/// Source of candidate outputs for the runner.
pub trait AttemptSupplier {
    /// Called once before the first attempt of each task.
    fn begin_task(&mut self, _task: &Task) -> Result<(), HarnessError> {
        Ok(())
    }

    /// Produce the output for `attempt` (1-based) of `task`.
    fn next_output(
        &mut self,
        task: &Task,
        attempt: u32,
        max_attempts: u32,
    ) -> Result<Supplied, HarnessError>;

    /// Called with the verdict of every attempt that was validated.
    fn report(&mut self, _task: &Task, _attempt: u32, _verdict: &Verdict) -> Result<(), HarnessError> {
        Ok(())
    }
}

/// Reads pasted outputs from a terminal-like input.
///
/// Prompts go to `out` (stderr in the CLI). Each output is every line up to
/// a line containing only [`END_OF_OUTPUT`], or end of input. Leading and
/// trailing newlines of the pasted text are dropped before validation.
pub struct InteractiveSupplier<R, W> {
    input: R,
    out: W,
    greeted: bool,
}

impl<R: BufRead, W: Write> InteractiveSupplier<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            out,
            greeted: false,
        }
    }

    /// Read one pasted block. `None` when input is exhausted before any line.
    fn read_block(&mut self) -> Result<Option<String>, HarnessError> {
        let mut block = String::new();
        let mut read_any = false;

        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            read_any = true;
            if line.trim_end_matches(['\r', '\n']) == END_OF_OUTPUT {
                break;
            }
            block.push_str(&line);
        }

        if !read_any {
            return Ok(None);
        }
        Ok(Some(block.trim_matches('\n').to_string()))
    }
}

impl<R: BufRead, W: Write> AttemptSupplier for InteractiveSupplier<R, W> {
    fn begin_task(&mut self, task: &Task) -> Result<(), HarnessError> {
        if !self.greeted {
            writeln!(
                self.out,
                "Manual mode: paste model outputs exactly as returned.\n\
                 Tip: if your model adds code fences, remove them before pasting.\n\
                 End each output with a line containing only '{}' (or end of input).\n",
                END_OF_OUTPUT
            )?;
            self.greeted = true;
        }

        writeln!(self.out, "{}", "=".repeat(80))?;
        writeln!(self.out, "Task {} ({}):", task.id, task.task_type())?;
        writeln!(self.out, "{}", task.prompt)?;
        Ok(())
    }

    fn next_output(
        &mut self,
        _task: &Task,
        attempt: u32,
        max_attempts: u32,
    ) -> Result<Supplied, HarnessError> {
        writeln!(
            self.out,
            "\nAttempt {}/{}. Paste output, then a line with only '{}':",
            attempt, max_attempts, END_OF_OUTPUT
        )?;
        self.out.flush()?;

        match self.read_block()? {
            Some(output) => Ok(Supplied::Output(output)),
            None => {
                writeln!(self.out, "\nInput closed.")?;
                Ok(Supplied::Stop)
            }
        }
    }

    fn report(&mut self, _task: &Task, _attempt: u32, verdict: &Verdict) -> Result<(), HarnessError> {
        writeln!(self.out, "Validator: {}", verdict)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tollgate_core::ErrorKind;

    fn task() -> Task {
        Task::baseline("B1", "What is 2+2?", "4")
    }

    #[test]
    fn test_reads_block_until_terminator() {
        let input = Cursor::new("\n{\"a\": 1,\n \"b\": 2}\n.\nnext\n");
        let mut supplier = InteractiveSupplier::new(input, Vec::new());

        let first = supplier.next_output(&task(), 1, 3).unwrap();
        assert_eq!(first, Supplied::Output("{\"a\": 1,\n \"b\": 2}".to_string()));

        let second = supplier.next_output(&task(), 2, 3).unwrap();
        assert_eq!(second, Supplied::Output("next".to_string()));

        assert_eq!(supplier.next_output(&task(), 3, 3).unwrap(), Supplied::Stop);
    }

    #[test]
    fn test_terminator_with_crlf() {
        let input = Cursor::new("42\r\n.\r\n");
        let mut supplier = InteractiveSupplier::new(input, Vec::new());
        assert_eq!(
            supplier.next_output(&task(), 1, 1).unwrap(),
            Supplied::Output("42\r".to_string())
        );
    }

    #[test]
    fn test_empty_input_stops() {
        let mut supplier = InteractiveSupplier::new(Cursor::new(""), Vec::new());
        assert_eq!(supplier.next_output(&task(), 1, 3).unwrap(), Supplied::Stop);
    }

    #[test]
    fn test_prompts_written_to_output() {
        let mut out = Vec::new();
        {
            let mut supplier = InteractiveSupplier::new(Cursor::new("5\n.\n"), &mut out);
            supplier.begin_task(&task()).unwrap();
            supplier.next_output(&task(), 1, 3).unwrap();
            supplier
                .report(
                    &task(),
                    1,
                    &Verdict::fail(ErrorKind::WrongAnswer, "Expected \"4\", got \"5\""),
                )
                .unwrap();
        }

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Manual mode"));
        assert!(text.contains("Task B1 (baseline):\nWhat is 2+2?"));
        assert!(text.contains("Attempt 1/3."));
        assert!(text.contains("Validator: FAIL (WRONG_ANSWER) - Expected \"4\", got \"5\""));
    }

    #[test]
    fn test_banner_printed_once() {
        let mut out = Vec::new();
        {
            let mut supplier = InteractiveSupplier::new(Cursor::new(""), &mut out);
            supplier.begin_task(&task()).unwrap();
            supplier.begin_task(&task()).unwrap();
        }
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Manual mode").count(), 1);
        assert_eq!(text.matches("Task B1").count(), 2);
    }
}
