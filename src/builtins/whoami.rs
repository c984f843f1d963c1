use std::ffi::OsString;

use crate::{
    builtins::{os_bytes, write_error, Streams, EOL},
    Shell,
};

/// Prints the name of the effective user.
///
/// Fails silently if the user has no name.
pub fn whoami(sh: &Shell, _args: &[String], io: Streams<'_>) -> i32 {
    let Some(name) = effective_user_name(sh) else {
        return 1;
    };
    let mut line = os_bytes(&name).into_owned();
    line.extend_from_slice(EOL.as_bytes());
    match io.stdout.write_all(&line) {
        Ok(()) => 0,
        Err(err) => write_error(io.stderr, "whoami", err),
    }
}

#[cfg(unix)]
fn effective_user_name(_sh: &Shell) -> Option<OsString> {
    use std::{ffi::CStr, mem::MaybeUninit, os::unix::ffi::OsStrExt, ptr};

    const MAX_BUF_LEN: usize = 1 << 20;

    let uid = unsafe { libc::geteuid() };
    let mut buf_len = match unsafe { libc::sysconf(libc::_SC_GETPW_R_SIZE_MAX) } {
        n if n > 0 => n as usize,
        _ => 1024,
    };
    loop {
        let mut buf: Vec<libc::c_char> = vec![0; buf_len];
        let mut passwd = MaybeUninit::<libc::passwd>::uninit();
        let mut result: *mut libc::passwd = ptr::null_mut();
        let rc = unsafe {
            libc::getpwuid_r(uid, passwd.as_mut_ptr(), buf.as_mut_ptr(), buf.len(), &mut result)
        };
        if rc == libc::ERANGE && buf_len < MAX_BUF_LEN {
            buf_len *= 2;
            continue;
        }
        if rc != 0 || result.is_null() {
            log::debug!("whoami: no passwd entry for uid {uid} (rc = {rc})");
            return None;
        }
        // SAFETY: `result` is non-null, so `passwd` was filled in and its
        // string fields point into `buf`, which is still alive.
        let name = unsafe {
            let passwd = passwd.assume_init();
            if passwd.pw_name.is_null() {
                return None;
            }
            CStr::from_ptr(passwd.pw_name)
        };
        let name = name.to_bytes();
        if name.is_empty() {
            return None;
        }
        return Some(std::ffi::OsStr::from_bytes(name).to_os_string());
    }
}

#[cfg(not(unix))]
fn effective_user_name(sh: &Shell) -> Option<OsString> {
    sh.env_var_os("USERNAME").filter(|it| !it.is_empty()).map(|it| it.to_os_string())
}
