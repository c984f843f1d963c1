mod cmd;
mod cp;
mod env;
mod seq;
mod tidy;

use std::io::{self, Read, Write};

use unix_command::{Shell, TempDir};

/// A shell rooted in a fresh temporary directory.
fn setup() -> (Shell, TempDir) {
    let mut sh = Shell::new().unwrap();
    let dir = sh.create_temp_dir().unwrap();
    sh.set_current_dir(dir.path());
    (sh, dir)
}

/// Standard output that refuses every write.
struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Standard input that can be drained exactly once, like a pipe.
struct OneShot {
    data: io::Cursor<Vec<u8>>,
    drained: bool,
}

impl OneShot {
    fn new(data: &[u8]) -> OneShot {
        OneShot { data: io::Cursor::new(data.to_vec()), drained: false }
    }
}

impl Read for OneShot {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.drained {
            panic!("stdin read again after end of stream");
        }
        let n = self.data.read(buf)?;
        if n == 0 {
            self.drained = true;
        }
        Ok(n)
    }
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|it| it.to_string()).collect()
}
