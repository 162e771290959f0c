//! Platform-specific file queries used by test expressions.

use std::path::Path;

/// File predicates that depend on platform metadata.
pub(crate) trait PathExt {
    fn readable(&self) -> bool;
    fn writable(&self) -> bool;
    fn executable(&self) -> bool;

    fn exists_and_is_block_device(&self) -> bool;
    fn exists_and_is_char_device(&self) -> bool;
    fn exists_and_is_fifo(&self) -> bool;
    fn exists_and_is_socket(&self) -> bool;
    fn exists_and_is_setgid(&self) -> bool;
    fn exists_and_is_setuid(&self) -> bool;
    fn exists_and_is_sticky_bit(&self) -> bool;

    fn exists_and_owned_by_effective_user(&self) -> bool;
    fn exists_and_owned_by_effective_group(&self) -> bool;

    fn same_file_as(&self, other: &Path) -> bool;
}

#[cfg(unix)]
mod unix {
    use std::os::unix::fs::{FileTypeExt, MetadataExt};
    use std::path::Path;

    impl super::PathExt for Path {
        fn readable(&self) -> bool {
            nix::unistd::access(self, nix::unistd::AccessFlags::R_OK).is_ok()
        }

        fn writable(&self) -> bool {
            nix::unistd::access(self, nix::unistd::AccessFlags::W_OK).is_ok()
        }

        fn executable(&self) -> bool {
            nix::unistd::access(self, nix::unistd::AccessFlags::X_OK).is_ok()
        }

        fn exists_and_is_block_device(&self) -> bool {
            try_get_file_type(self).is_some_and(|ft| ft.is_block_device())
        }

        fn exists_and_is_char_device(&self) -> bool {
            try_get_file_type(self).is_some_and(|ft| ft.is_char_device())
        }

        fn exists_and_is_fifo(&self) -> bool {
            try_get_file_type(self).is_some_and(|ft| ft.is_fifo())
        }

        fn exists_and_is_socket(&self) -> bool {
            try_get_file_type(self).is_some_and(|ft| ft.is_socket())
        }

        fn exists_and_is_setgid(&self) -> bool {
            const S_ISGID: u32 = 0o2000;
            try_get_file_mode(self).is_some_and(|mode| mode & S_ISGID != 0)
        }

        fn exists_and_is_setuid(&self) -> bool {
            const S_ISUID: u32 = 0o4000;
            try_get_file_mode(self).is_some_and(|mode| mode & S_ISUID != 0)
        }

        fn exists_and_is_sticky_bit(&self) -> bool {
            const S_ISVTX: u32 = 0o1000;
            try_get_file_mode(self).is_some_and(|mode| mode & S_ISVTX != 0)
        }

        fn exists_and_owned_by_effective_user(&self) -> bool {
            self.metadata()
                .is_ok_and(|md| md.uid() == nix::unistd::geteuid().as_raw())
        }

        fn exists_and_owned_by_effective_group(&self) -> bool {
            self.metadata()
                .is_ok_and(|md| md.gid() == nix::unistd::getegid().as_raw())
        }

        fn same_file_as(&self, other: &Path) -> bool {
            match (self.metadata(), other.metadata()) {
                (Ok(left), Ok(right)) => left.dev() == right.dev() && left.ino() == right.ino(),
                _ => false,
            }
        }
    }

    fn try_get_file_type(path: &Path) -> Option<std::fs::FileType> {
        path.metadata().map(|metadata| metadata.file_type()).ok()
    }

    fn try_get_file_mode(path: &Path) -> Option<u32> {
        path.metadata().map(|metadata| metadata.mode()).ok()
    }
}

#[cfg(not(unix))]
mod stubs {
    use std::path::Path;

    impl super::PathExt for Path {
        fn readable(&self) -> bool {
            self.exists()
        }

        fn writable(&self) -> bool {
            self.metadata()
                .is_ok_and(|md| !md.permissions().readonly())
        }

        fn executable(&self) -> bool {
            self.is_file()
        }

        fn exists_and_is_block_device(&self) -> bool {
            false
        }

        fn exists_and_is_char_device(&self) -> bool {
            false
        }

        fn exists_and_is_fifo(&self) -> bool {
            false
        }

        fn exists_and_is_socket(&self) -> bool {
            false
        }

        fn exists_and_is_setgid(&self) -> bool {
            false
        }

        fn exists_and_is_setuid(&self) -> bool {
            false
        }

        fn exists_and_is_sticky_bit(&self) -> bool {
            false
        }

        fn exists_and_owned_by_effective_user(&self) -> bool {
            self.exists()
        }

        fn exists_and_owned_by_effective_group(&self) -> bool {
            self.exists()
        }

        fn same_file_as(&self, other: &Path) -> bool {
            match (self.canonicalize(), other.canonicalize()) {
                (Ok(left), Ok(right)) => left == right,
                _ => false,
            }
        }
    }
}
