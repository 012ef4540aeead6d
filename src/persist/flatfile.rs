//! Flat text sink: one books file and one members file, one record per line.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{config::CatalogConfig, core::store::CatalogStore};

use super::{
    CatalogSink, LoadedRecords, PersistError, PersistResult, RecordKind, read_lines,
    write_book_lines, write_member_lines,
};

/// [`CatalogSink`] over two pipe-delimited text files.
#[derive(Debug, Clone)]
pub struct FlatFileSink {
    books_path: PathBuf,
    members_path: PathBuf,
    atomic_writes: bool,
}

impl FlatFileSink {
    /// Creates a sink over the given files. Nothing is touched until first use.
    ///
    /// Writes go through a temporary sibling file and a rename.
    pub fn new(books_path: impl Into<PathBuf>, members_path: impl Into<PathBuf>) -> Self {
        Self {
            books_path: books_path.into(),
            members_path: members_path.into(),
            atomic_writes: true,
        }
    }

    /// Creates a sink from resolved configuration.
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(&config.books_path, &config.members_path).with_atomic_writes(config.atomic_writes)
    }

    /// Toggles temp-file-and-rename writes. When off, files are truncated in place.
    pub fn with_atomic_writes(mut self, atomic: bool) -> Self {
        self.atomic_writes = atomic;
        self
    }

    /// Books file location.
    pub fn books_path(&self) -> &Path {
        &self.books_path
    }

    /// Members file location.
    pub fn members_path(&self) -> &Path {
        &self.members_path
    }

    fn read_file(&self, kind: RecordKind, path: &Path, out: &mut LoadedRecords) -> PersistResult<()> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "{kind} file missing; treating as empty");
                return Ok(());
            }
            Err(source) => {
                return Err(PersistError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        read_lines(kind, BufReader::new(file), out).map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_file<F>(&self, path: &Path, write: F) -> PersistResult<()>
    where
        F: Fn(&mut BufWriter<File>) -> io::Result<()>,
    {
        if self.atomic_writes {
            write_replacing(path, write)
        } else {
            write_in_place(path, write)
        }
    }
}

impl CatalogSink for FlatFileSink {
    fn read_records(&self) -> PersistResult<LoadedRecords> {
        let mut out = LoadedRecords::default();
        self.read_file(RecordKind::Book, &self.books_path, &mut out)?;
        self.read_file(RecordKind::Member, &self.members_path, &mut out)?;
        Ok(out)
    }

    fn write_store(&mut self, store: &CatalogStore) -> PersistResult<()> {
        let books = self.write_file(&self.books_path, |w| write_book_lines(w, store));
        if let Err(err) = &books {
            tracing::error!(%err, "failed to save books");
        }
        let members = self.write_file(&self.members_path, |w| write_member_lines(w, store));
        if let Err(err) = &members {
            tracing::error!(%err, "failed to save members");
        }
        books.and(members)
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> PersistError + '_ {
    move |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn write_in_place<F>(path: &Path, write: F) -> PersistResult<()>
where
    F: Fn(&mut BufWriter<File>) -> io::Result<()>,
{
    let file = File::create(path).map_err(io_err(path))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).map_err(io_err(path))?;
    writer.flush().map_err(io_err(path))
}

fn write_replacing<F>(path: &Path, write: F) -> PersistResult<()>
where
    F: Fn(&mut BufWriter<File>) -> io::Result<()>,
{
    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> PersistResult<()> {
        let file = File::create(&tmp_path).map_err(io_err(&tmp_path))?;
        let mut writer = BufWriter::new(file);
        write(&mut writer).map_err(io_err(&tmp_path))?;
        let file = writer
            .into_inner()
            .map_err(|e| io_err(&tmp_path)(e.into_error()))?;
        file.sync_all().map_err(io_err(&tmp_path))
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}
