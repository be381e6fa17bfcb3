cfg_if::cfg_if! {
    if #[cfg(windows)]{
        pub(crate) mod windows;
        pub(crate) use windows::*;
    }else if #[cfg(all(target_os = "linux", feature = "use-syscall"))]{
        pub(crate) mod linux_syscall;
        pub(crate) use linux_syscall::*;
    }else if #[cfg(unix)]{
        pub(crate) mod unix;
        pub(crate) use unix::*;
    }else {
        compile_error!("filemap supports only unix and windows targets");
    }
}
