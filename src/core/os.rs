// src/core/os.rs
use std::{
    ffi::OsStr,
    io,
    process::Command,
    thread,
};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Run a program and return its stdout. A non-zero exit is an error carrying
/// the status and stderr.
pub fn run_command<I, S>(program: &str, args: I) -> io::Result<Vec<u8>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args);

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }

    let out = cmd.output()?;
    if !out.status.success() {
        return Err(io::Error::other(format!(
            "`{program}` exited with {}: {}",
            out.status,
            String::from_utf8_lossy(&out.stderr).trim_end()
        )));
    }
    Ok(out.stdout)
}

/// Start `f` on its own thread and forget about it: no join, no result.
pub fn spawn_detached<F>(f: F)
where
    F: FnOnce() + Send + 'static,
{
    // Dropping the handle detaches the thread.
    let _ = thread::spawn(f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[cfg(unix)]
    #[test]
    fn captures_stdout_and_fails_on_exit_code() {
        let out = run_command("sh", ["-c", "printf hi"]).unwrap();
        assert_eq!(out, b"hi");
        assert!(run_command("sh", ["-c", "exit 3"]).is_err());
    }

    #[test]
    fn missing_program_is_an_error() {
        assert!(run_command("definitely-not-a-real-program-4821", Vec::<&str>::new()).is_err());
    }

    #[test]
    fn detached_task_runs() {
        let (tx, rx) = mpsc::channel();
        spawn_detached(move || {
            let _ = tx.send(7);
        });
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 7);
    }
}
