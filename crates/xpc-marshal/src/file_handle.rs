use std::fs::File;
use std::io;
use std::mem::MaybeUninit;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};

/// Identity of the file behind a descriptor.
///
/// Descriptor numbers are process-local and change whenever a descriptor is
/// duplicated, so two handles refer to the same resource iff their identities
/// match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub device: u64,
    pub inode: u64,
}

/// An owned, independently closable OS descriptor.
#[derive(Debug)]
pub struct FileHandle {
    fd: OwnedFd,
}

impl FileHandle {
    pub fn new(fd: OwnedFd) -> Self {
        Self { fd }
    }

    /// Duplicates a borrowed descriptor into a new handle.
    pub fn duplicate(fd: BorrowedFd<'_>) -> io::Result<Self> {
        Ok(Self {
            fd: fd.try_clone_to_owned()?,
        })
    }

    pub fn try_clone(&self) -> io::Result<Self> {
        Self::duplicate(self.fd.as_fd())
    }

    pub fn into_owned_fd(self) -> OwnedFd {
        self.fd
    }

    #[allow(clippy::unnecessary_cast)]
    pub fn identity(&self) -> io::Result<FileIdentity> {
        let mut stat = MaybeUninit::<libc::stat>::uninit();
        // SAFETY: `self.fd` is open for the lifetime of `self` and `stat`
        // points to writable storage of the right size.
        let rc = unsafe { libc::fstat(self.fd.as_raw_fd(), stat.as_mut_ptr()) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: fstat returned success, so the struct is initialised.
        let stat = unsafe { stat.assume_init() };
        Ok(FileIdentity {
            device: stat.st_dev as u64,
            inode: stat.st_ino as u64,
        })
    }

    /// Whether both handles refer to the same device and inode.
    ///
    /// Returns `false` when either descriptor cannot be inspected.
    pub fn same_file(&self, other: &FileHandle) -> bool {
        match (self.identity(), other.identity()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl AsFd for FileHandle {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl AsRawFd for FileHandle {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl From<OwnedFd> for FileHandle {
    fn from(fd: OwnedFd) -> Self {
        Self::new(fd)
    }
}

impl From<File> for FileHandle {
    fn from(file: File) -> Self {
        Self::new(file.into())
    }
}

impl From<FileHandle> for OwnedFd {
    fn from(handle: FileHandle) -> Self {
        handle.fd
    }
}
