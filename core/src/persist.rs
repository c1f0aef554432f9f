use crate::error::{IndexError, Result};
use crate::generation::Generation;
use crate::index::{CorpusMeta, Document, IdfTable, IndexArtifacts, InvertedIndex, Vocabulary};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, create_dir_all, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// File layout of one persisted generation.
#[derive(Debug, Clone)]
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn corpus(&self) -> PathBuf { self.root.join("corpus.json") }
    pub fn vocab(&self) -> PathBuf { self.root.join("vocab.json") }
    pub fn inverted(&self) -> PathBuf { self.root.join("inverted_index.json") }
    pub fn idf(&self) -> PathBuf { self.root.join("idf.json") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    if pretty {
        serde_json::to_writer_pretty(&mut f, value)?;
    } else {
        serde_json::to_writer(&mut f, value)?;
    }
    f.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let f = File::open(path)
        .map_err(|source| IndexError::Load { path: path.to_path_buf(), source })?;
    serde_json::from_reader(BufReader::new(f)).map_err(|source| match source.io_error_kind() {
        Some(kind) => IndexError::Load { path: path.to_path_buf(), source: kind.into() },
        None => IndexError::Malformed { path: path.to_path_buf(), source },
    })
}

pub fn load_corpus(paths: &IndexPaths) -> Result<Vec<Document>> { read_json(&paths.corpus()) }
pub fn load_vocab(paths: &IndexPaths) -> Result<Vocabulary> { read_json(&paths.vocab()) }
pub fn load_inverted(paths: &IndexPaths) -> Result<InvertedIndex> { read_json(&paths.inverted()) }
pub fn load_idf(paths: &IndexPaths) -> Result<IdfTable> { read_json(&paths.idf()) }
pub fn load_meta(paths: &IndexPaths) -> Result<CorpusMeta> { read_json(&paths.meta()) }

/// Artifact files in the order they are staged and published. `meta.json`
/// goes last so its counts describe the files already in place.
fn targets(paths: &IndexPaths) -> [PathBuf; 5] {
    [paths.corpus(), paths.vocab(), paths.inverted(), paths.idf(), paths.meta()]
}

fn stage(tmps: &[PathBuf], a: &IndexArtifacts) -> Result<()> {
    write_json(&tmps[0], &a.corpus, false)?;
    write_json(&tmps[1], &a.vocab, false)?;
    write_json(&tmps[2], &a.inverted, false)?;
    write_json(&tmps[3], &a.idf, false)?;
    write_json(&tmps[4], &a.meta, true)
}

/// Persist all five artifacts. Each is written to a `.tmp` sibling first; the
/// renames only start once every write succeeded, and a failed write removes
/// whatever was already staged.
pub fn save_artifacts(paths: &IndexPaths, a: &IndexArtifacts) -> Result<()> {
    create_dir_all(&paths.root)?;
    let targets = targets(paths);
    let tmps: Vec<PathBuf> = targets.iter().map(|p| tmp_path(p)).collect();

    if let Err(e) = stage(&tmps, a) {
        for tmp in &tmps {
            if tmp.is_file() {
                let _ = fs::remove_file(tmp);
            }
        }
        return Err(e);
    }

    for (tmp, target) in tmps.iter().zip(targets.iter()) {
        fs::rename(tmp, target)?;
    }
    tracing::debug!(root = %paths.root.display(), "saved index artifacts");
    Ok(())
}

pub fn load_artifacts(paths: &IndexPaths) -> Result<IndexArtifacts> {
    Ok(IndexArtifacts {
        corpus: load_corpus(paths)?,
        vocab: load_vocab(paths)?,
        inverted: load_inverted(paths)?,
        idf: load_idf(paths)?,
        meta: load_meta(paths)?,
    })
}

/// Load and validate one generation from disk.
pub fn load_generation(paths: &IndexPaths) -> Result<Generation> {
    Generation::new(load_artifacts(paths)?)
}
